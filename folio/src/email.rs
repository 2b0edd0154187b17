use anyhow::Context;
use folio_config::{EmailConfig, EmailTransportConfig};
use folio_email_impl::{
    EmailServiceImpl, ResendEmailService, ResendEmailServiceConfig, SmtpEmailService,
};

/// Set up the configured email transport
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    match &config.transport {
        EmailTransportConfig::Resend {
            api_key,
            endpoint_override,
        } => {
            let config = ResendEmailServiceConfig::new(api_key, endpoint_override.clone())?;
            Ok(ResendEmailService::new(config)?.into())
        }
        EmailTransportConfig::Smtp { url } => {
            let smtp = SmtpEmailService::new(url).context("Invalid smtp url")?;
            smtp.ping()
                .await
                .context("Failed to connect to SMTP server")?;
            Ok(smtp.into())
        }
    }
}

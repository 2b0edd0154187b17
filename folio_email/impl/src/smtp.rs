use anyhow::Context;
use folio_email_contracts::{ContentType, Email, EmailAck, EmailSendError, EmailService};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::Apply;
use lettre::{
    message::{header, MessageBuilder},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)
            .context("Invalid smtp url")?
            .build();

        Ok(Self { transport })
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .context("Failed to ping smtp server")
    }
}

impl EmailService for SmtpEmailService {
    async fn send(&self, email: Email) -> Result<EmailAck, EmailSendError> {
        let message = Message::builder()
            .from(email.from.0)
            .to(email.recipient.0)
            .apply_map(
                email.reply_to.map(EmailAddressWithName::from),
                |builder: MessageBuilder, reply_to| builder.reply_to(reply_to.0),
            )
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)
            .context("Failed to build email message")?;

        let response = match self.transport.send(message).await {
            Ok(response) => response,
            Err(err) if err.is_permanent() => {
                return Err(EmailSendError::Rejected(err.to_string()));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context("Failed to send email via smtp")
                    .into())
            }
        };

        if !response.is_positive() {
            return Err(EmailSendError::Rejected(format!(
                "smtp server replied with {}",
                response.code()
            )));
        }

        Ok(EmailAck { id: None })
    }
}

use folio_email_contracts::{Email, EmailAck, EmailSendError, EmailService};

pub use crate::{
    resend::{ResendEmailService, ResendEmailServiceConfig},
    smtp::SmtpEmailService,
};

mod http;
pub mod resend;
pub mod smtp;

/// Email service backed by the transport selected in the configuration.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl {
    Resend(ResendEmailService),
    Smtp(SmtpEmailService),
}

impl From<ResendEmailService> for EmailServiceImpl {
    fn from(value: ResendEmailService) -> Self {
        Self::Resend(value)
    }
}

impl From<SmtpEmailService> for EmailServiceImpl {
    fn from(value: SmtpEmailService) -> Self {
        Self::Smtp(value)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> Result<EmailAck, EmailSendError> {
        match self {
            Self::Resend(resend) => resend.send(email).await,
            Self::Smtp(smtp) => smtp.send(email).await,
        }
    }
}

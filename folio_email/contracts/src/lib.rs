use std::future::Future;

use folio_models::email_address::{EmailAddress, EmailAddressWithName};
use thiserror::Error;

/// Outbound email delivery. A single call is a single attempt; failures are
/// not retried.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    fn send(&self, email: Email) -> impl Future<Output = Result<EmailAck, EmailSendError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: EmailAddressWithName,
    pub recipient: EmailAddressWithName,
    pub reply_to: Option<EmailAddress>,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

/// Acknowledgement of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailAck {
    /// Message id assigned by the provider, if it reports one.
    pub id: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    #[error("Email provider rejected the message: {0}")]
    Rejected(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<EmailAck, EmailSendError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

use std::future::Future;

use folio_models::contact::{ContactCandidate, FieldErrors};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validate a contact form submission and forward it to the site owner.
    ///
    /// The candidate is treated as untrusted input and checked against the
    /// same rules the form applies.
    fn submit(
        &self,
        candidate: ContactCandidate,
    ) -> impl Future<Output = Result<(), ContactSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Invalid form data")]
    Validation(FieldErrors),
    #[error("Spam detected")]
    Spam,
    #[error("Failed to send email")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(
        mut self,
        candidate: ContactCandidate,
        result: Result<(), ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(candidate))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}

//! State and submission logic of the interactive contact form.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use anyhow::Context;
use folio_models::contact::{self, ContactCandidate, ContactField, ContactFormDraft, FieldErrors};
use folio_utils::folio_version;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I will get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug)]
pub struct ContactForm {
    endpoint: Url,
    client: reqwest::Client,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

#[derive(Debug, Default)]
struct FormState {
    draft: ContactFormDraft,
    errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft did not pass validation. Nothing was sent.
    Invalid,
    /// Another submission is still in flight.
    Busy,
    Toast(Toast),
}

/// Notification shown to the visitor after a submission settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

impl ContactForm {
    /// Create a form that posts to `endpoint`, the full url of the contact
    /// route.
    pub fn new(endpoint: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("Folio Contact Form (Version {})", folio_version()))
            .build()
            .context("Failed to create http client")?;

        Ok(Self {
            endpoint,
            client,
            state: Default::default(),
            submitting: AtomicBool::new(false),
        })
    }

    pub fn set_field(&self, field: ContactField, value: impl Into<String>) {
        self.state().draft.set(field, value);
    }

    pub fn draft(&self) -> ContactFormDraft {
        self.state().draft.clone()
    }

    /// Inline errors currently shown next to the fields.
    pub fn errors(&self) -> FieldErrors {
        self.state().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validate a single field after it lost focus.
    pub fn blur(&self, field: ContactField) {
        let mut state = self.state();
        let candidate = ContactCandidate::from(&state.draft);
        let messages = contact::validate_field(&candidate, field).err().unwrap_or_default();
        state.errors.set(field, messages);
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = SubmittingGuard::acquire(&self.submitting) else {
            return SubmitOutcome::Busy;
        };

        let submission = {
            let mut state = self.state();
            match contact::validate(&ContactCandidate::from(&state.draft)) {
                Ok(submission) => {
                    state.errors = FieldErrors::default();
                    submission
                }
                Err(errors) => {
                    debug!(%errors, "contact form is invalid");
                    state.errors = errors;
                    return SubmitOutcome::Invalid;
                }
            }
        };

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(&submission)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!("Failed to send contact form: {err}");
                return SubmitOutcome::Toast(Toast::Error(TRANSPORT_FAILURE_MESSAGE.into()));
            }
        };

        if response.status().is_success() {
            *self.state() = FormState::default();
            return SubmitOutcome::Toast(Toast::Success(SUCCESS_MESSAGE.into()));
        }

        let status = response.status();
        let body = response.json::<ErrorResponse>().await.unwrap_or_else(|err| {
            debug!("Failed to decode error response: {err}");
            ErrorResponse::default()
        });
        debug!(%status, ?body, "contact form was rejected");

        if let Some(errors) = body.errors {
            self.state().errors = errors;
        }

        SubmitOutcome::Toast(Toast::Error(
            body.message.unwrap_or_else(|| FAILURE_MESSAGE.into()),
        ))
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    errors: Option<FieldErrors>,
}

/// Holds the submitting flag until dropped.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

use std::sync::Arc;

use folio_core_contact_contracts::{ContactService, ContactSubmitError};
use folio_email_contracts::{ContentType, Email, EmailService};
use folio_models::{
    contact::{self, ContactCandidate},
    email_address::EmailAddressWithName,
};
use folio_templates_contracts::{ContactNotificationTemplate, TemplateService};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Sender of the notification. Never taken from the submission.
    pub sender: Arc<EmailAddressWithName>,
    pub recipient: Arc<EmailAddressWithName>,
    pub subject_prefix: Arc<str>,
}

impl<EmailS, TemplateS> ContactServiceImpl<EmailS, TemplateS> {
    pub fn new(email: EmailS, template: TemplateS, config: ContactFeatureConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, TemplateS> ContactService for ContactServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn submit(&self, candidate: ContactCandidate) -> Result<(), ContactSubmitError> {
        let submission = contact::validate(&candidate).map_err(|errors| {
            debug!(%errors, "rejecting invalid contact form submission");
            ContactSubmitError::Validation(errors)
        })?;

        if submission.is_spam() {
            info!("honeypot field filled in, dropping contact form submission");
            return Err(ContactSubmitError::Spam);
        }

        let body = self
            .template
            .render(&ContactNotificationTemplate::from(&submission))?;

        let email = Email {
            from: (*self.config.sender).clone(),
            recipient: (*self.config.recipient).clone(),
            reply_to: Some(submission.email),
            subject: format!("{} {}", self.config.subject_prefix, *submission.subject),
            body,
            content_type: ContentType::Html,
        };

        match self.email.send(email).await {
            Ok(ack) => {
                info!(id = ?ack.id, "contact notification sent");
                Ok(())
            }
            Err(err) => {
                error!("failed to send contact notification: {err}");
                Err(ContactSubmitError::Send)
            }
        }
    }
}

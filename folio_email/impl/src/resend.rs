//! Delivery through the [Resend](https://resend.com/docs/api-reference/emails/send-email) HTTP API.

use std::sync::Arc;

use anyhow::Context;
use folio_email_contracts::{ContentType, Email, EmailAck, EmailSendError, EmailService};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

const API_ENDPOINT: &str = "https://api.resend.com/";

#[derive(Debug, Clone)]
pub struct ResendEmailService {
    config: ResendEmailServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ResendEmailServiceConfig {
    emails_endpoint: Arc<Url>,
    api_key: Arc<str>,
}

impl ResendEmailServiceConfig {
    pub fn new(api_key: &str, endpoint_override: Option<Url>) -> anyhow::Result<Self> {
        let endpoint = match endpoint_override {
            Some(endpoint) => endpoint,
            None => API_ENDPOINT.parse()?,
        };

        Ok(Self {
            emails_endpoint: endpoint
                .join("emails")
                .context("Invalid resend api endpoint")?
                .into(),
            api_key: api_key.into(),
        })
    }
}

impl ResendEmailService {
    pub fn new(config: ResendEmailServiceConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            client: HttpClient::new().context("Failed to create http client")?,
        })
    }
}

impl EmailService for ResendEmailService {
    async fn send(&self, email: Email) -> Result<EmailAck, EmailSendError> {
        let from = email.from.to_string();
        let to = [email.recipient.to_string()];
        let (html, text) = match email.content_type {
            ContentType::Html => (Some(email.body.as_str()), None),
            ContentType::Text => (None, Some(email.body.as_str())),
        };

        let response = self
            .client
            .post((*self.config.emails_endpoint).clone())
            .bearer_auth(&self.config.api_key)
            .json(&SendEmailRequest {
                from: &from,
                to: &to,
                reply_to: email.reply_to.as_ref().map(|reply_to| reply_to.as_str()),
                subject: &email.subject,
                html,
                text,
            })
            .send()
            .await
            .context("Failed to reach resend api")?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorResponse>().await {
                Ok(ErrorResponse { name, message }) => format!("{status} {name}: {message}"),
                Err(_) => status.to_string(),
            };
            return Err(EmailSendError::Rejected(detail));
        }

        let SendEmailResponse { id } = response
            .json()
            .await
            .context("Failed to parse resend api response")?;
        debug!(%id, "resend accepted email");

        Ok(EmailAck { id: Some(id) })
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

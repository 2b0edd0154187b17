use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Response,
    routing, Router,
};
use folio_core_contact_contracts::{ContactService, ContactSubmitError};
use folio_models::contact::ContactCandidate;
use serde_json::Value;
use tracing::debug;

use super::{internal_server_error, message, validation_error};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactService>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    // A body that cannot be read or is not JSON is validated like an empty form.
    let candidate = match body {
        Ok(body) => match serde_json::from_slice::<Value>(&body) {
            Ok(value) => ContactCandidate::from_json(&value),
            Err(err) => {
                debug!("contact request body is not valid json: {err}");
                ContactCandidate::default()
            }
        },
        Err(err) => {
            debug!("failed to read contact request body: {err}");
            ContactCandidate::default()
        }
    };

    match service.submit(candidate).await {
        Ok(()) => message(StatusCode::OK, "Email sent successfully"),
        Err(ContactSubmitError::Validation(errors)) => validation_error(&errors),
        Err(ContactSubmitError::Spam) => message(StatusCode::BAD_REQUEST, "Spam detected"),
        Err(ContactSubmitError::Send) => {
            message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email")
        }
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use folio_core_contact_contracts::MockContactService;
    use folio_models::contact::{ContactField, FieldErrors, FieldValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    async fn call(service: MockContactService, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::post("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();

        let response = router(service.into()).oneshot(request).await.unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn candidate() -> ContactCandidate {
        ContactCandidate {
            name: "Ana Lopez".into(),
            email: "ana@example.com".into(),
            subject: "Project inquiry".into(),
            message: "Hi,\nI'd like to discuss a project.".into(),
            budget: FieldValue::Missing,
            honeypot: "".into(),
        }
    }

    fn body() -> String {
        json!({
            "name": "Ana Lopez",
            "email": "ana@example.com",
            "subject": "Project inquiry",
            "message": "Hi,\nI'd like to discuss a project.",
            "honeypot": "",
        })
        .to_string()
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let service = MockContactService::new().with_submit(candidate(), Ok(()));

        // Act
        let (status, body) = call(service, body()).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Email sent successfully" }));
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let mut errors = FieldErrors::default();
        errors.push(ContactField::Name, "Name is required");
        errors.push(ContactField::Email, "Invalid email address");

        let service = MockContactService::new()
            .with_submit(candidate(), Err(ContactSubmitError::Validation(errors)));

        // Act
        let (status, body) = call(service, body()).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Invalid form data",
                "errors": {
                    "name": ["Name is required"],
                    "email": ["Invalid email address"],
                },
            })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_an_empty_form() {
        let service = MockContactService::new().with_submit(
            ContactCandidate::default(),
            Err(ContactSubmitError::Validation(FieldErrors::default())),
        );

        let (status, body) = call(service, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid form data");
    }

    #[tokio::test]
    async fn oversized_body_is_an_empty_form() {
        // Arrange
        let mut errors = FieldErrors::default();
        errors.push(ContactField::Name, "Name is required");

        let service = MockContactService::new().with_submit(
            ContactCandidate::default(),
            Err(ContactSubmitError::Validation(errors)),
        );
        let body = json!({
            "name": "Ana Lopez",
            "email": "ana@example.com",
            "subject": "Project inquiry",
            "message": "a".repeat(3 * 1024 * 1024),
        })
        .to_string();

        // Act
        let (status, body) = call(service, body).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "message": "Invalid form data",
                "errors": { "name": ["Name is required"] },
            })
        );
    }

    #[tokio::test]
    async fn spam() {
        let service =
            MockContactService::new().with_submit(candidate(), Err(ContactSubmitError::Spam));

        let (status, body) = call(service, body()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Spam detected" }));
    }

    #[tokio::test]
    async fn send_error() {
        let service =
            MockContactService::new().with_submit(candidate(), Err(ContactSubmitError::Send));

        let (status, body) = call(service, body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Failed to send email" }));
    }

    #[tokio::test]
    async fn other_error_is_not_leaked() {
        let service = MockContactService::new().with_submit(
            candidate(),
            Err(ContactSubmitError::Other(anyhow::anyhow!(
                "template contact_notification failed"
            ))),
        );

        let (status, body) = call(service, body()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_models::contact::FieldErrors;

use crate::models::ApiMessage;

pub mod contact;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn message(code: StatusCode, message: &str) -> Response {
    (
        code,
        Json(ApiMessage {
            message,
            errors: None,
        }),
    )
        .into_response()
}

fn validation_error(errors: &FieldErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiMessage {
            message: "Invalid form data",
            errors: Some(errors),
        }),
    )
        .into_response()
}

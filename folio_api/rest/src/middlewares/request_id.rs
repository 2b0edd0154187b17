//! Tag each request with an `X-Request-Id` and echo it in the response

use axum::{
    http::{HeaderName, HeaderValue, Request},
    Router,
};
use base64::{display::Base64Display, engine::general_purpose::STANDARD_NO_PAD};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeUuidV7))
}

/// Time ordered uuid, base64 encoded without padding.
#[derive(Debug, Clone, Copy)]
struct MakeUuidV7;

impl MakeRequestId for MakeUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Base64Display::new(Uuid::now_v7().as_bytes(), &STANDARD_NO_PAD).to_string();
        HeaderValue::try_from(id).ok().map(RequestId::new)
    }
}

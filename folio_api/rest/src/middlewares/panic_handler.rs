use std::any::Any;

use anyhow::anyhow;
use axum::{response::Response, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::routes::internal_server_error;

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(CatchPanicLayer::custom(on_panic))
}

fn on_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    internal_server_error(anyhow!("request handler panicked: {detail}"))
}

//! Request spans.
//!
//! Each request gets one span carrying the request ID and an empty field per
//! custom metric name, so middleware further down can record into it.

use axum::http::Request;
use tracing::Span;

use crate::http::request::X_REQUEST_ID;

/// Build the span for an incoming request.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
        view_func_module = tracing::field::Empty,
        code_owner = tracing::field::Empty,
        code_owner_mapping_error = tracing::field::Empty,
    )
}

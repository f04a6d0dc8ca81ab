//! Request identification and request metrics.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept; otherwise a UUID v4 is generated
//! - The ID is echoed on the response

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::observability::metrics;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Record method, status and latency of every request.
pub async fn record_request_metrics(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

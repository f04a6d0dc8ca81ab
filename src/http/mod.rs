//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, request metrics)
//!     → observability::tracing (request span)
//!     → monitoring::middleware (code owner custom metrics, routed requests only)
//!     → views (LMS handlers)
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

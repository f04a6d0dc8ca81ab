//! LMS request monitoring and waffle switches.
//!
//! - `monitoring`: tags each routed request with the code owner of its view module
//! - `waffle`: operator-toggled boolean switches
//! - `course_detail`: course details workflow gated by a waffle switch

pub mod admin;
pub mod config;
pub mod course_detail;
pub mod http;
pub mod lifecycle;
pub mod monitoring;
pub mod observability;
pub mod views;
pub mod waffle;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

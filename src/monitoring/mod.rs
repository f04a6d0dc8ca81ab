//! Request monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! code_owner_mappings setting
//!     → code_owner.rs (flatten to prefix table, record shape errors)
//!     → ArcSwap<CodeOwnerMappings> (replaced on reload)
//!
//! Routed request
//!     → middleware.rs (matched path → view module → code owner)
//!     → custom_metrics.rs (span fields / recording sink)
//!     → observability::metrics (per-owner counters)
//! ```

pub mod code_owner;
pub mod custom_metrics;
pub mod middleware;

pub use code_owner::{CodeOwnerMappings, MappingError};
pub use custom_metrics::{CustomMetricSink, RecordingMetricSink, TracingMetricSink};
pub use middleware::{code_owner_middleware, CodeOwnerMetricMiddleware, CodeOwnerState};

//! Per-request custom metrics.
//!
//! A custom metric is a named value attached to the unit of work currently
//! being handled. The server's trace layer declares the known names as span
//! fields, so recording onto the current span ties them to the request.

use std::sync::Mutex;

use tracing::Span;

/// Module path of the view that handled the request.
pub const VIEW_FUNC_MODULE: &str = "view_func_module";
/// Team owning the view's module.
pub const CODE_OWNER: &str = "code_owner";
/// Description of a malformed `code_owner_mappings` setting.
pub const CODE_OWNER_MAPPING_ERROR: &str = "code_owner_mapping_error";

/// Every custom metric name the request span reserves a field for.
pub const CUSTOM_METRIC_NAMES: &[&str] = &[VIEW_FUNC_MODULE, CODE_OWNER, CODE_OWNER_MAPPING_ERROR];

/// Destination for custom metrics.
pub trait CustomMetricSink: Send + Sync {
    fn set_custom_metric(&self, name: &str, value: &str);
}

/// Records custom metrics on the current tracing span.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetricSink;

impl CustomMetricSink for TracingMetricSink {
    fn set_custom_metric(&self, name: &str, value: &str) {
        Span::current().record(name, value);
        tracing::debug!(metric = name, value = value, "Custom metric set");
    }
}

/// Keeps every call in order. Used by tests and local debugging.
#[derive(Debug, Default)]
pub struct RecordingMetricSink {
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingMetricSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded `(name, value)` pairs.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Value of the last call for `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

impl CustomMetricSink for RecordingMetricSink {
    fn set_custom_metric(&self, name: &str, value: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((name.to_string(), value.to_string()));
        }
    }
}

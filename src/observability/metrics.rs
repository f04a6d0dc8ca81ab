//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lms_requests_total` (counter): requests by method, status
//! - `lms_request_duration_seconds` (histogram): latency distribution
//! - `code_owner_requests_total` (counter): routed requests by code owner
//! - `code_owner_mapping_errors_total` (counter): requests seen with a bad mapping setting
//! - `waffle_switch_checks_total` (counter): switch reads by switch, result
//!
//! # Design Decisions
//! - `metrics` facade everywhere; recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own HTTP listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let status = status.to_string();
    counter!("lms_requests_total", "method" => method.to_string(), "status" => status.clone())
        .increment(1);
    histogram!("lms_request_duration_seconds", "method" => method.to_string(), "status" => status)
        .record(start_time.elapsed().as_secs_f64());
}

/// Count a request attributed to `owner`.
pub fn record_code_owner(owner: &str) {
    counter!("code_owner_requests_total", "code_owner" => owner.to_string()).increment(1);
}

/// Count a request that ran against a malformed mapping setting.
pub fn record_code_owner_mapping_error() {
    counter!("code_owner_mapping_errors_total").increment(1);
}

/// Count a waffle switch read.
pub fn record_switch_check(switch: &str, enabled: bool) {
    counter!(
        "waffle_switch_checks_total",
        "switch" => switch.to_string(),
        "enabled" => if enabled { "true" } else { "false" }
    )
    .increment(1);
}

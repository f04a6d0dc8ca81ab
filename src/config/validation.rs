//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and enumerated values
//! - Check admin credentials when the admin API is enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - `code_owner_mappings` is never rejected here; its shape is reported
//!   at request time by the code owner middleware

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: `{value}` is not one of {allowed:?}")]
    UnknownValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("admin.api_key must not be empty when the admin API is enabled")]
    EmptyApiKey,

    #[error("waffle.switches: switch names must not be empty")]
    EmptySwitchName,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let obs = &config.observability;
    check_one_of(&mut errors, "observability.log_level", &obs.log_level, LOG_LEVELS);
    check_one_of(&mut errors, "observability.log_format", &obs.log_format, LOG_FORMATS);
    if obs.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &obs.metrics_address);
    }

    if config.admin.enabled {
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.trim().is_empty() {
            errors.push(ValidationError::EmptyApiKey);
        }
    }

    if config.waffle.switches.keys().any(|name| name.trim().is_empty()) {
        errors.push(ValidationError::EmptySwitchName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_one_of(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) {
    if !allowed.contains(&value) {
        errors.push(ValidationError::UnknownValue {
            field,
            value: value.to_string(),
            allowed,
        });
    }
}

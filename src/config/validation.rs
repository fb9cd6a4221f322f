//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, window non-empty)
//! - Validate addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::MonitorConfig;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    Address { field: &'static str, value: String },

    #[error("detector.phi_threshold must be a positive number, got {0}")]
    Threshold(f64),

    #[error("probe.command must not be empty")]
    EmptyCommand,

    #[error("host names must not be empty")]
    EmptyHost,
}

pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let non_zero = [
        ("polling.interval_ms", config.polling.interval_ms),
        ("polling.probe_timeout_ms", config.polling.probe_timeout_ms),
        ("polling.min_check_interval_ms", config.polling.min_check_interval_ms),
        ("detector.window_size", config.detector.window_size as u64),
        ("detector.report_interval_ms", config.detector.report_interval_ms),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let threshold = config.detector.phi_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        errors.push(ValidationError::Threshold(threshold));
    }

    if config.probe.command.trim().is_empty() {
        errors.push(ValidationError::EmptyCommand);
    }

    if config.hosts.iter().any(|h| h.trim().is_empty()) {
        errors.push(ValidationError::EmptyHost);
    }

    let addresses = [
        (
            "observability.metrics_address",
            config.observability.metrics_enabled,
            &config.observability.metrics_address,
        ),
        (
            "admin.bind_address",
            config.admin.enabled,
            &config.admin.bind_address,
        ),
    ];
    for (field, enabled, value) in addresses {
        if enabled && value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::Address {
                field,
                value: value.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

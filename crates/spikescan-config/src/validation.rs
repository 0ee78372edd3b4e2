// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem before failing, so one run reports them all.

use crate::{ConfigError, ConfigResult, SpikescanConfig};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const FORMATS: [&str; 3] = ["events", "flat", "raster"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &SpikescanConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

fn collect_errors(config: &SpikescanConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    let invalid = |field: &str, reason: String| ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason,
    };

    if config.window.epsilon < 1 {
        errors.push(invalid("window.epsilon", "must be at least 1".to_string()));
    }
    if config.window.epsilon_t < 1 {
        errors.push(invalid("window.epsilon_t", "must be at least 1".to_string()));
    }
    if config.window.min_pts <= 1 {
        errors.push(invalid(
            "window.min_pts",
            format!("must be greater than 1, got {}", config.window.min_pts),
        ));
    }

    if config.netlist.base_network.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "netlist.base_network".to_string(),
        });
    }

    let format = config.encoder.format.to_lowercase();
    if !FORMATS.contains(&format.as_str()) {
        errors.push(invalid(
            "encoder.format",
            format!("{:?} is not one of {}", config.encoder.format, FORMATS.join(", ")),
        ));
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(invalid(
            "logging.level",
            format!("{:?} is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        ));
    }

    errors
}

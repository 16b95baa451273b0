// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that values are within range, mutually consistent, and that pool
//! sizes are plausible for the configured network.

use crate::{ConfigError, ConfigResult, TcnConfig, MAX_HALVING_WINDOW};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    InvalidValue { field: String, reason: String },
    Inconsistent { fields: String, reason: String },
    SizingDefect { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::Inconsistent { fields, reason } => {
                write!(f, "Inconsistent configuration ({}): {}", fields, reason)
            }
            Self::SizingDefect { field, reason } => {
                write!(f, "Sizing defect in {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Every violation is collected; the returned error lists all of them.
/// Without `decay_divisors`, `aggregation_window` is limited to
/// [`MAX_HALVING_WINDOW`] ticks.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &TcnConfig) -> ConfigResult<()> {
    let errors = collect_violations(config);
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

/// All violations, in section order.
pub fn collect_violations(config: &TcnConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_engine(config, &mut errors);
    validate_capacity(config, &mut errors);
    validate_plasticity(config, &mut errors);
    validate_partitioning(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn validate_engine(config: &TcnConfig, errors: &mut Vec<ConfigValidationError>) {
    let engine = &config.engine;

    if engine.cascade_threshold <= 0 {
        errors.push(invalid("engine.cascade_threshold", "must be positive"));
    }
    if engine.max_sweeps == 0 {
        errors.push(invalid("engine.max_sweeps", "must be at least 1"));
    }

    match &engine.decay_divisors {
        Some(divisors) => {
            if divisors.len() != engine.aggregation_window as usize + 1 {
                errors.push(ConfigValidationError::Inconsistent {
                    fields: "engine.decay_divisors, engine.aggregation_window".to_string(),
                    reason: format!(
                        "window {} needs {} divisors, got {}",
                        engine.aggregation_window,
                        engine.aggregation_window as usize + 1,
                        divisors.len()
                    ),
                });
            }
            if let Some(pos) = divisors.iter().position(|&d| d == 0) {
                errors.push(invalid(
                    "engine.decay_divisors",
                    format!("divisor at distance {} is zero", pos),
                ));
            }
        }
        None if engine.aggregation_window > MAX_HALVING_WINDOW => {
            errors.push(invalid(
                "engine.aggregation_window",
                format!(
                    "halving table supports at most {} ticks; set decay_divisors explicitly",
                    MAX_HALVING_WINDOW
                ),
            ));
        }
        None => {}
    }
}

fn validate_capacity(config: &TcnConfig, errors: &mut Vec<ConfigValidationError>) {
    let capacity = &config.capacity;

    if capacity.node_count == 0 {
        errors.push(invalid("capacity.node_count", "must be at least 1"));
    }
    if capacity.node_count > u32::MAX as usize {
        errors.push(invalid("capacity.node_count", "exceeds the 32-bit id space"));
    }
    if capacity.signals() == 0 {
        errors.push(invalid("capacity.signal_capacity", "must be at least 1"));
    } else if capacity.signals() < capacity.node_count {
        errors.push(ConfigValidationError::SizingDefect {
            field: "capacity.signal_capacity".to_string(),
            reason: format!(
                "{} slots for {} nodes; in-flight signals will be overwritten",
                capacity.signals(),
                capacity.node_count
            ),
        });
    }
}

fn validate_plasticity(config: &TcnConfig, errors: &mut Vec<ConfigValidationError>) {
    let plasticity = &config.plasticity;

    if plasticity.base_signal_size <= 0 {
        errors.push(invalid("plasticity.base_signal_size", "must be positive"));
    }
    if plasticity.stp_limit_factor == 0 {
        errors.push(invalid("plasticity.stp_limit_factor", "must be at least 1"));
    }
    if plasticity.ltp_limit_factor == 0 {
        errors.push(invalid("plasticity.ltp_limit_factor", "must be at least 1"));
    }
}

fn validate_partitioning(config: &TcnConfig, errors: &mut Vec<ConfigValidationError>) {
    let partitions = config.partitioning.partitions;

    if partitions == 0 {
        errors.push(invalid("partitioning.partitions", "must be at least 1"));
    } else if partitions > 1 && partitions > config.capacity.node_count {
        errors.push(ConfigValidationError::Inconsistent {
            fields: "partitioning.partitions, capacity.node_count".to_string(),
            reason: format!(
                "{} partitions for {} nodes",
                partitions, config.capacity.node_count
            ),
        });
    }
}

fn validate_logging(config: &TcnConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(invalid(
            "logging.level",
            format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join("|")),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_violations_reported() {
        let mut config = TcnConfig::default();
        config.engine.cascade_threshold = 0;
        config.engine.decay_divisors = Some(vec![1, 2, 0]);
        config.partitioning.partitions = 0;
        config.logging.level = "loud".to_string();

        let errors = collect_violations(&config);
        assert_eq!(errors.len(), 5);

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("engine.cascade_threshold"));
        assert!(message.contains("divisor at distance 2 is zero"));
        assert!(message.contains("logging.level"));
    }

    #[test]
    fn test_undersized_signal_store_flagged() {
        let mut config = TcnConfig::default();
        config.capacity.node_count = 100;
        config.capacity.signal_capacity = Some(50);

        let errors = collect_violations(&config);
        assert!(matches!(
            errors.as_slice(),
            [ConfigValidationError::SizingDefect { .. }]
        ));
    }

    #[test]
    fn test_partitions_bounded_by_nodes() {
        let mut config = TcnConfig::default();
        config.capacity.node_count = 3;
        config.partitioning.partitions = 4;
        assert!(validate_config(&config).is_err());

        config.partitioning.partitions = 3;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_halving_window_limit() {
        let mut config = TcnConfig::default();
        config.engine.aggregation_window = MAX_HALVING_WINDOW;
        assert!(validate_config(&config).is_ok());

        config.engine.aggregation_window = MAX_HALVING_WINDOW + 1;
        let violations = collect_violations(&config);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0],
            ConfigValidationError::InvalidValue { field, .. } if field == "engine.aggregation_window"
        ));

        config.engine.decay_divisors = Some(vec![1; MAX_HALVING_WINDOW as usize + 2]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_explicit_divisors_must_match_window() {
        let mut config = TcnConfig::default();
        config.engine.aggregation_window = 2;
        config.engine.decay_divisors = Some(vec![1, 3, 9]);
        assert!(validate_config(&config).is_ok());

        config.engine.aggregation_window = 3;
        assert!(validate_config(&config).is_err());
    }
}

//! Run configuration validation.
//!
//! Catches values that would otherwise surface as configuration errors
//! from blocks at initialize time, with the offending TOML key in the
//! message.
//!
//! # Example
//!
//! ```rust
//! use netplus_config::{RunConfig, validate_run_config};
//!
//! let mut config = RunConfig::default();
//! assert!(validate_run_config(&config).is_ok());
//!
//! config.transmitter.order = 6;
//! assert!(validate_run_config(&config).is_err());
//! ```

use netplus_blocks::PSEUDO_RANDOM_ORDERS;
use thiserror::Error;

use crate::run_config::{BitSourceConfig, RunConfig, TransmitterConfig};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value out of range.
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// TOML key of the value.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Value not usable for another reason.
    #[error("{field}: {reason}")]
    Invalid {
        /// TOML key of the value.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result of a validation check.
pub type ValidationResult = Result<(), ValidationError>;

fn in_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Checks that a QAM order has a default constellation.
pub fn validate_order(order: u32) -> ValidationResult {
    let field = "transmitter.order";
    if order < 2 || !order.is_power_of_two() {
        return Err(invalid(field, format!("{order} is not a power of two >= 2")));
    }
    if order != 2 && order.trailing_zeros() % 2 != 0 {
        return Err(invalid(
            field,
            format!("{order} is not a square constellation"),
        ));
    }
    Ok(())
}

/// Checks the bit source settings.
pub fn validate_bit_source(bits: &BitSourceConfig) -> ValidationResult {
    match bits {
        BitSourceConfig::Random { .. } => Ok(()),
        BitSourceConfig::PseudoRandom { order } => {
            if PSEUDO_RANDOM_ORDERS.contains(order) {
                Ok(())
            } else {
                Err(invalid(
                    "transmitter.bits.order",
                    format!("{order} is not one of {PSEUDO_RANDOM_ORDERS:?}"),
                ))
            }
        }
        BitSourceConfig::Cyclic { pattern } | BitSourceConfig::AppendZeros { pattern } => {
            let field = "transmitter.bits.pattern";
            if matches!(bits, BitSourceConfig::Cyclic { .. }) && pattern.is_empty() {
                return Err(invalid(field, "a cyclic pattern cannot be empty"));
            }
            match pattern.iter().find(|&&b| b > 1) {
                Some(b) => Err(invalid(field, format!("{b} is not a bit"))),
                None => Ok(()),
            }
        }
    }
}

/// Checks the transmitter section.
pub fn validate_transmitter(tx: &TransmitterConfig) -> ValidationResult {
    if !(tx.bit_period.is_finite() && tx.bit_period > 0.0) {
        return Err(invalid(
            "transmitter.bit_period",
            format!("{} is not a positive period", tx.bit_period),
        ));
    }
    validate_order(tx.order)?;
    validate_bit_source(&tx.bits)?;
    in_range("transmitter.rolloff", tx.rolloff, 0.0, 1.0)?;
    in_range(
        "transmitter.samples_per_symbol",
        tx.samples_per_symbol as f64,
        1.0,
        1024.0,
    )?;
    in_range("transmitter.span_symbols", tx.span_symbols as f64, 0.0, 1024.0)?;
    if tx.buffer_length == Some(0) {
        return Err(invalid("transmitter.buffer_length", "must be at least 1"));
    }
    Ok(())
}

/// Checks a whole run configuration, stopping at the first problem.
pub fn validate_run_config(config: &RunConfig) -> ValidationResult {
    if config.default_buffer_length == 0 {
        return Err(invalid("default_buffer_length", "must be at least 1"));
    }
    if config.signals_folder.as_os_str().is_empty() {
        return Err(invalid("signals_folder", "cannot be empty"));
    }
    if config.log_filter.trim().is_empty() {
        return Err(invalid("log_filter", "cannot be empty"));
    }
    validate_transmitter(&config.transmitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders() {
        for m in [2, 4, 16, 64, 256] {
            assert!(validate_order(m).is_ok(), "{m}");
        }
        for m in [0, 1, 3, 8, 32, 100] {
            assert!(validate_order(m).is_err(), "{m}");
        }
    }

    #[test]
    fn bit_sources() {
        assert!(validate_bit_source(&BitSourceConfig::PseudoRandom { order: 15 }).is_ok());
        assert!(validate_bit_source(&BitSourceConfig::PseudoRandom { order: 8 }).is_err());
        assert!(validate_bit_source(&BitSourceConfig::Cyclic { pattern: vec![] }).is_err());
        assert!(validate_bit_source(&BitSourceConfig::AppendZeros { pattern: vec![] }).is_ok());
        let err = validate_bit_source(&BitSourceConfig::Cyclic {
            pattern: vec![0, 1, 2],
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "transmitter.bits.pattern: 2 is not a bit");
    }

    #[test]
    fn transmitter_ranges() {
        let mut tx = TransmitterConfig::default();
        assert!(validate_transmitter(&tx).is_ok());

        tx.rolloff = 1.5;
        assert!(matches!(
            validate_transmitter(&tx),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "transmitter.rolloff"
        ));
        tx.rolloff = 0.25;

        tx.bit_period = 0.0;
        assert!(validate_transmitter(&tx).is_err());
        tx.bit_period = 1e-9;

        tx.samples_per_symbol = 0;
        assert!(validate_transmitter(&tx).is_err());
        tx.samples_per_symbol = 4;

        tx.buffer_length = Some(0);
        assert!(validate_transmitter(&tx).is_err());
    }

    #[test]
    fn run_config_fields() {
        let config = RunConfig {
            default_buffer_length: 0,
            ..RunConfig::default()
        };
        assert!(validate_run_config(&config).is_err());

        let config = RunConfig {
            log_filter: "  ".to_string(),
            ..RunConfig::default()
        };
        assert!(validate_run_config(&config).is_err());
    }
}

//! Run configuration for netplus simulations.
//!
//! This crate holds the settings the `netplus` binary needs to build and run
//! its built-in QAM transmitter: where signal files go, default ring
//! capacities, the log filter, and the transmitter parameters.
//!
//! # Features
//!
//! - **Run configuration**: [`RunConfig`] loaded from and saved to TOML
//! - **Validation**: range and consistency checks with the offending key named
//! - **Paths**: platform-specific config directory and lookup order
//!
//! # Example
//!
//! ```rust,no_run
//! use netplus_config::{RunConfig, user_config_file};
//!
//! let mut config = RunConfig::default();
//! config.transmitter.order = 16;
//! config.save(user_config_file()).unwrap();
//!
//! let loaded = RunConfig::load(user_config_file()).unwrap();
//! assert_eq!(loaded.transmitter.order, 16);
//! ```

mod error;
mod run_config;

/// Platform-specific paths for configuration.
pub mod paths;

/// Run configuration validation.
pub mod validation;

pub use error::ConfigError;
pub use paths::{
    CONFIG_FILE_NAME, LOCAL_CONFIG_FILE_NAME, ensure_user_config_dir, find_run_config,
    user_config_dir, user_config_file,
};
pub use run_config::{BitSourceConfig, RunConfig, TransmitterConfig};
pub use validation::{
    ValidationError, ValidationResult, validate_bit_source, validate_order, validate_run_config,
    validate_transmitter,
};

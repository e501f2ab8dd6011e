//! Run configuration for the built-in transmitter system.

use std::path::{Path, PathBuf};

use netplus_blocks::BitMode;
use netplus_core::{DEFAULT_BUFFER_LENGTH, DEFAULT_SIGNALS_FOLDER};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::validate_run_config;

/// How the transmitter's bits are generated.
///
/// In TOML this is the `[transmitter.bits]` table, selected by `mode`:
///
/// ```toml
/// [transmitter.bits]
/// mode = "pseudo_random"
/// order = 15
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BitSourceConfig {
    /// Seeded random bits.
    Random {
        /// Generator seed.
        seed: u64,
    },
    /// PRBS of the given register order.
    PseudoRandom {
        /// LFSR order.
        order: u32,
    },
    /// A repeated bit pattern.
    Cyclic {
        /// Bits, each 0 or 1.
        pattern: Vec<u8>,
    },
    /// A bit pattern followed by zeros.
    AppendZeros {
        /// Bits, each 0 or 1.
        pattern: Vec<u8>,
    },
}

impl Default for BitSourceConfig {
    fn default() -> Self {
        BitSourceConfig::Random { seed: 1 }
    }
}

impl BitSourceConfig {
    /// The generator mode a bit source block uses for this setting.
    pub fn to_bit_mode(&self) -> BitMode {
        match self {
            BitSourceConfig::Random { seed } => BitMode::Random { seed: *seed },
            BitSourceConfig::PseudoRandom { order } => BitMode::PseudoRandom { order: *order },
            BitSourceConfig::Cyclic { pattern } => BitMode::DeterministicCyclic(pattern.clone()),
            BitSourceConfig::AppendZeros { pattern } => {
                BitMode::DeterministicAppendZeros(pattern.clone())
            }
        }
    }
}

/// Parameters of the QAM transmitter run by `netplus run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterConfig {
    /// Number of bits the source emits.
    pub number_of_bits: u64,
    /// Bit period in seconds.
    pub bit_period: f64,
    /// Constellation size M.
    pub order: u32,
    /// Upsampling factor ahead of the pulse shaper.
    pub samples_per_symbol: usize,
    /// Raised-cosine rolloff factor.
    pub rolloff: f64,
    /// Pulse shaper length in symbols.
    pub span_symbols: usize,
    /// Ring capacity for the transmitter's signals. Falls back to
    /// [`RunConfig::default_buffer_length`].
    pub buffer_length: Option<usize>,
    /// Persist every signal of the chain.
    pub save_signals: bool,
    /// Write the pulse shaper taps next to the signals.
    pub save_impulse_response: bool,
    /// Bit generator. Kept last so it serializes as a trailing table.
    pub bits: BitSourceConfig,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            number_of_bits: 1000,
            bit_period: 1.0 / 50e9,
            order: 4,
            samples_per_symbol: 8,
            rolloff: 0.3,
            span_symbols: 8,
            buffer_length: None,
            save_signals: true,
            save_impulse_response: false,
            bits: BitSourceConfig::default(),
        }
    }
}

/// Top-level run configuration.
///
/// Every field has a default, so a file only needs the keys it changes.
///
/// # Example
///
/// ```rust
/// use netplus_config::RunConfig;
///
/// let config = RunConfig::from_toml(
///     r#"
///     signals_folder = "out"
///
///     [transmitter]
///     order = 16
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.transmitter.order, 16);
/// assert_eq!(config.default_buffer_length, 512);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Folder signal files are written to.
    pub signals_folder: PathBuf,
    /// Ring capacity for signals that do not set their own.
    pub default_buffer_length: usize,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Transmitter parameters.
    pub transmitter: TransmitterConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            signals_folder: PathBuf::from(DEFAULT_SIGNALS_FOLDER),
            default_buffer_length: DEFAULT_BUFFER_LENGTH,
            log_filter: "info".to_string(),
            transmitter: TransmitterConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent folders.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_run_config(self)?;
        Ok(())
    }

    /// Ring capacity for the transmitter's signals.
    pub fn transmitter_buffer_length(&self) -> usize {
        self.transmitter
            .buffer_length
            .unwrap_or(self.default_buffer_length)
    }
}

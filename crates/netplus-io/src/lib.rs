//! File I/O for netplus signals.
//!
//! This crate provides:
//!
//! - **Signal files**: [`SignalFile::open`] loads a saved signal (header and
//!   samples), [`read_signal_info`] reads only its metadata
//! - **WAV export**: [`export_wav`] writes a signal as a float WAV file for
//!   listening or inspection in audio tools
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use netplus_io::{ExportOptions, SignalFile, export_wav};
//!
//! let signal = SignalFile::open("signals/S3.sgn")?;
//! export_wav(&signal, "S3.wav", ExportOptions::default())?;
//! ```

mod signal_file;
mod wav;

pub use signal_file::{SignalFile, SignalInfo, read_signal_info};
pub use wav::{ExportOptions, FALLBACK_SAMPLE_RATE, WavInfo, export_wav, read_wav_info};

/// Error types for signal file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file is not a well-formed signal file.
    #[error("Malformed signal file: {0}")]
    Format(String),

    /// The signal header could not be parsed.
    #[error("Invalid signal header: {0}")]
    Header(#[from] toml::de::Error),

    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for signal file I/O.
pub type Result<T> = std::result::Result<T, Error>;

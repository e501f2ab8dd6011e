//! Signal file format and the append-only writer behind persisted signals.
//!
//! A signal file is a TOML header describing the signal, closed by the
//! [`HEADER_TERMINATOR`] line, followed by raw little-endian samples in
//! emission order:
//!
//! ```text
//! signal_type = "TimeDiscreteAmplitudeContinuousReal"
//! sample_kind = "real"
//! sample_size = 8
//! symbol_period = 1e-9
//! ...
//! # --- end of header ---
//! <samples...>
//! ```
//!
//! The terminator is a TOML comment, so everything before it parses as TOML.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sample::SampleKind;

/// Line separating the TOML header from the sample data.
pub const HEADER_TERMINATOR: &str = "# --- end of header ---\n";

/// Metadata written at the top of every signal file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalHeader {
    /// Signal type label, e.g. `Binary` or `BandpassSignal`.
    pub signal_type: String,
    /// Kind of the samples following the header.
    pub sample_kind: SampleKind,
    /// Size of one sample in bytes.
    pub sample_size: usize,
    /// Symbol period in seconds.
    pub symbol_period: f64,
    /// Sampling period in seconds.
    pub sampling_period: f64,
    /// Samples per symbol.
    pub samples_per_symbol: f64,
    /// Central wavelength in metres.
    pub central_wavelength: f64,
    /// Central frequency in hertz.
    pub central_frequency: f64,
    /// Number of leading samples of the stream that were not saved.
    #[serde(default)]
    pub first_saved_sample: u64,
}

impl SignalHeader {
    /// Serializes the header, terminator included.
    pub fn encode(&self) -> std::result::Result<String, toml::ser::Error> {
        let mut text = toml::to_string(self)?;
        text.push_str(HEADER_TERMINATOR);
        Ok(text)
    }

    /// Parses the header text that precedes the terminator.
    pub fn decode(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Joins `folder` and `file_name`, accepting only a plain file name.
///
/// Names containing separators, `..`, or a root are rejected so a signal
/// can never be written outside its folder.
pub fn resolve_signal_path(
    folder: &Path,
    file_name: &str,
) -> std::result::Result<PathBuf, String> {
    if file_name.is_empty() {
        return Err("file name is empty".to_string());
    }
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == file_name => Ok(folder.join(name)),
        _ => Err(format!("'{file_name}' is not a plain file name")),
    }
}

/// Buffered, append-only writer for one signal file.
#[derive(Debug)]
pub struct SignalWriter {
    path: PathBuf,
    file: BufWriter<File>,
    data_bytes: u64,
}

impl SignalWriter {
    /// Creates (truncating) the file at `path` and writes `header`.
    pub fn create(path: impl Into<PathBuf>, header: &SignalHeader) -> Result<Self> {
        let path = path.into();
        let text = header.encode().map_err(|e| {
            Error::persistence(
                "encode header of",
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        let file = File::create(&path).map_err(|e| Error::persistence("create", &path, e))?;
        let mut file = BufWriter::new(file);
        file.write_all(text.as_bytes())
            .map_err(|e| Error::persistence("write header of", &path, e))?;
        tracing::debug!(path = %path.display(), "signal file opened");
        Ok(Self {
            path,
            file,
            data_bytes: 0,
        })
    }

    /// Appends raw sample bytes.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .write_all(bytes)
            .map_err(|e| Error::persistence("write", &self.path, e))?;
        self.data_bytes += bytes.len() as u64;
        Ok(())
    }

    /// Flushes buffered bytes to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.file
            .flush()
            .map_err(|e| Error::persistence("flush", &self.path, e))
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<()> {
        self.flush()?;
        tracing::debug!(
            path = %self.path.display(),
            bytes = self.data_bytes,
            "signal file closed"
        );
        Ok(())
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of sample bytes appended so far.
    pub fn data_bytes(&self) -> u64 {
        self.data_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> SignalHeader {
        SignalHeader {
            signal_type: "Binary".to_string(),
            sample_kind: SampleKind::Binary,
            sample_size: 1,
            symbol_period: 1e-9,
            sampling_period: 1e-9,
            samples_per_symbol: 1.0,
            central_wavelength: 1550e-9,
            central_frequency: 299792458.0 / 1550e-9,
            first_saved_sample: 0,
        }
    }

    #[test]
    fn header_encode_decode() {
        let text = header().encode().unwrap();
        assert!(text.ends_with(HEADER_TERMINATOR));
        let body = text.strip_suffix(HEADER_TERMINATOR).unwrap();
        assert_eq!(SignalHeader::decode(body).unwrap(), header());
    }

    #[test]
    fn resolve_accepts_plain_names() {
        let path = resolve_signal_path(Path::new("signals"), "S1.sgn").unwrap();
        assert_eq!(path, Path::new("signals").join("S1.sgn"));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let folder = Path::new("signals");
        assert!(resolve_signal_path(folder, "").is_err());
        assert!(resolve_signal_path(folder, "../S1.sgn").is_err());
        assert!(resolve_signal_path(folder, "sub/S1.sgn").is_err());
        assert!(resolve_signal_path(folder, "/tmp/S1.sgn").is_err());
        assert!(resolve_signal_path(folder, "..").is_err());
    }

    #[test]
    fn writer_appends_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let mut writer = SignalWriter::create(&path, &header()).unwrap();
        writer.append(&[1, 0, 1]).unwrap();
        writer.append(&[1]).unwrap();
        assert_eq!(writer.data_bytes(), 4);
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let header_len = header().encode().unwrap().len();
        assert_eq!(&bytes[header_len..], &[1, 0, 1, 1]);
    }

    #[test]
    fn create_in_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("S0.sgn");
        let err = SignalWriter::create(&path, &header()).unwrap_err();
        assert!(err.is_persistence());
    }
}

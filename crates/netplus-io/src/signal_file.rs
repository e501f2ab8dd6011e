//! Reading signal files written by saved signals.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use netplus_core::{Complex64, HEADER_TERMINATOR, Sample, SampleKind, SignalHeader};

use crate::{Error, Result};

/// Signal file metadata, read without loading sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalInfo {
    /// Decoded header.
    pub header: SignalHeader,
    /// Number of samples following the header.
    pub num_samples: u64,
    /// Duration covered by the saved samples, in seconds.
    pub duration_secs: f64,
}

/// A fully loaded signal file.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFile {
    /// Decoded header.
    pub header: SignalHeader,
    /// Samples in emission order.
    pub samples: Vec<Sample>,
}

/// Reads header text up to (not including) the terminator line.
///
/// Returns the text and the number of bytes consumed, terminator included.
fn read_header_text<R: BufRead>(reader: &mut R) -> Result<(String, u64)> {
    let terminator = HEADER_TERMINATOR.trim_end_matches('\n');
    let mut text = String::new();
    let mut consumed = 0u64;
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            return Err(Error::Format("missing end of header marker".to_string()));
        }
        consumed += n as u64;
        let line = std::str::from_utf8(&line)
            .map_err(|_| Error::Format("header is not valid UTF-8".to_string()))?;
        if line.trim_end_matches(['\r', '\n']) == terminator {
            return Ok((text, consumed));
        }
        text.push_str(line);
    }
}

fn check_header(header: &SignalHeader) -> Result<()> {
    let expected = header.sample_kind.size_bytes();
    if header.sample_size != expected {
        return Err(Error::Format(format!(
            "sample size {} does not match {} samples ({expected} bytes)",
            header.sample_size, header.sample_kind
        )));
    }
    Ok(())
}

/// Reads the header and sample count of a signal file.
pub fn read_signal_info<P: AsRef<Path>>(path: P) -> Result<SignalInfo> {
    let file = File::open(path.as_ref())?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let (text, header_len) = read_header_text(&mut reader)?;
    let header = SignalHeader::decode(&text)?;
    check_header(&header)?;

    let data_len = file_len - header_len;
    let size = header.sample_size as u64;
    if data_len % size != 0 {
        return Err(Error::Format(format!(
            "{} trailing bytes after the last whole sample",
            data_len % size
        )));
    }
    let num_samples = data_len / size;
    Ok(SignalInfo {
        duration_secs: num_samples as f64 * header.sampling_period,
        header,
        num_samples,
    })
}

impl SignalFile {
    /// Loads a signal file.
    ///
    /// # Example
    /// ```ignore
    /// let signal = SignalFile::open("signals/S2.sgn")?;
    /// println!("{} {} samples", signal.samples.len(), signal.header.sample_kind);
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let (text, _) = read_header_text(&mut reader)?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_parts(&text, &data)
    }

    /// Decodes a signal file already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let (text, header_len) = read_header_text(&mut reader)?;
        Self::from_parts(&text, &bytes[header_len as usize..])
    }

    fn from_parts(header_text: &str, data: &[u8]) -> Result<Self> {
        let header = SignalHeader::decode(header_text)?;
        check_header(&header)?;
        let size = header.sample_size;
        if data.len() % size != 0 {
            return Err(Error::Format(format!(
                "{} trailing bytes after the last whole sample",
                data.len() % size
            )));
        }
        let samples = data
            .chunks_exact(size)
            .map(|chunk| Sample::decode_le(header.sample_kind, chunk))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Format("undecodable sample".to_string()))?;
        tracing::debug!(
            kind = %header.sample_kind,
            samples = samples.len(),
            "signal file decoded"
        );
        Ok(Self { header, samples })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the file holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Kind of the stored samples.
    pub fn sample_kind(&self) -> SampleKind {
        self.header.sample_kind
    }

    /// Samples as reals. Binary and integer samples are widened;
    /// `None` for complex signals.
    pub fn to_reals(&self) -> Option<Vec<f64>> {
        self.samples
            .iter()
            .map(|s| match *s {
                Sample::Binary(v) => Some(f64::from(v)),
                Sample::Integer(v) => Some(f64::from(v)),
                Sample::Real(v) => Some(v),
                Sample::Complex(_) => None,
            })
            .collect()
    }

    /// Samples as complex values; `None` unless the signal is complex.
    pub fn to_complexes(&self) -> Option<Vec<Complex64>> {
        self.samples
            .iter()
            .map(|s| match *s {
                Sample::Complex(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netplus_core::{Continuity, SampleBuffer, SignalType};

    /// Writes `values` through a saved buffer, the way a system run would.
    fn write_signal(path: &Path, signal_type: SignalType, values: &[Sample]) {
        let mut buf = SampleBuffer::new(signal_type, 3)
            .with_file_name("unused")
            .with_sampling_period(0.5);
        buf.open_file(path).unwrap();
        for &v in values {
            buf.put_sample(v).unwrap();
            buf.get_sample().unwrap();
        }
        buf.close().unwrap();
    }

    #[test]
    fn reads_back_real_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S0.sgn");
        let values: Vec<Sample> = (0..7).map(|i| Sample::Real(f64::from(i) * 0.5)).collect();
        write_signal(&path, SignalType::time_discrete_real(Continuity::Continuous), &values);

        let signal = SignalFile::open(&path).unwrap();
        assert_eq!(signal.samples, values);
        assert_eq!(signal.sample_kind(), SampleKind::Real);
        assert_eq!(signal.to_reals().unwrap()[6], 3.0);
        assert!(signal.to_complexes().is_none());

        let info = read_signal_info(&path).unwrap();
        assert_eq!(info.num_samples, 7);
        assert_eq!(info.duration_secs, 3.5);
        assert_eq!(info.header, signal.header);
    }

    #[test]
    fn reads_back_complex_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.sgn");
        let values = vec![
            Sample::Complex(Complex64::new(1.0, -1.0)),
            Sample::Complex(Complex64::new(-3.0, 3.0)),
        ];
        write_signal(&path, SignalType::bandpass(), &values);
        let signal = SignalFile::open(&path).unwrap();
        assert_eq!(signal.header.signal_type, "BandpassSignal");
        assert_eq!(
            signal.to_complexes().unwrap(),
            vec![Complex64::new(1.0, -1.0), Complex64::new(-3.0, 3.0)]
        );
        assert!(signal.to_reals().is_none());
    }

    #[test]
    fn empty_signal_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S2.sgn");
        write_signal(&path, SignalType::binary(), &[]);
        assert!(SignalFile::open(&path).unwrap().is_empty());
        assert_eq!(read_signal_info(&path).unwrap().num_samples, 0);
    }

    #[test]
    fn missing_terminator_is_a_format_error() {
        let err = SignalFile::from_bytes(b"sample_kind = \"real\"\n").unwrap_err();
        assert!(matches!(err, Error::Format(_)), "{err}");
    }

    #[test]
    fn truncated_data_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S3.sgn");
        write_signal(
            &path,
            SignalType::integer(),
            &[Sample::Integer(1), Sample::Integer(2)],
        );
        let mut bytes = std::fs::read(&path).unwrap();
        bytes.pop();
        assert!(matches!(SignalFile::from_bytes(&bytes), Err(Error::Format(_))));
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(read_signal_info(&path), Err(Error::Format(_))));
    }

    #[test]
    fn bad_header_is_reported() {
        let text = format!("sample_kind = 5\n{HEADER_TERMINATOR}");
        assert!(matches!(
            SignalFile::from_bytes(text.as_bytes()),
            Err(Error::Header(_))
        ));
    }
}

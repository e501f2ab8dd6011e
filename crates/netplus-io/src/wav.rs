//! Exporting signals as WAV files.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use netplus_core::SampleKind;

use crate::signal_file::SignalFile;
use crate::{Error, Result};

/// Sample rate used when a signal's own rate does not fit a WAV header.
pub const FALLBACK_SAMPLE_RATE: u32 = 48_000;

/// How a signal is written to WAV.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExportOptions {
    /// Sample rate in Hz. Derived from the signal's sampling period when unset.
    pub sample_rate: Option<u32>,
    /// Scale so the largest magnitude across all channels is 1.0.
    pub normalize: bool,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    /// Number of channels: 1 for real signals, 2 for I/Q.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of sample frames (samples per channel).
    pub num_frames: u64,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        num_frames: u64::from(reader.duration()),
    })
}

/// Sample rate matching `sampling_period`, if it is representable.
fn rate_from_period(sampling_period: f64) -> Option<u32> {
    let rate = (1.0 / sampling_period).round();
    (rate.is_finite() && rate >= 1.0 && rate <= f64::from(u32::MAX)).then_some(rate as u32)
}

/// Writes `signal` to `path` as 32-bit float WAV.
///
/// Binary, integer and real signals become mono; complex signals become
/// stereo with the in-phase rail on the left channel and quadrature on
/// the right.
///
/// # Errors
///
/// Returns [`Error::Format`] for an explicit sample rate of zero, or an
/// I/O or WAV error if the file cannot be written.
pub fn export_wav<P: AsRef<Path>>(
    signal: &SignalFile,
    path: P,
    options: ExportOptions,
) -> Result<WavInfo> {
    let sample_rate = match options.sample_rate {
        Some(0) => return Err(Error::Format("sample rate must be positive".to_string())),
        Some(rate) => rate,
        None => rate_from_period(signal.header.sampling_period).unwrap_or_else(|| {
            tracing::warn!(
                sampling_period = signal.header.sampling_period,
                fallback = FALLBACK_SAMPLE_RATE,
                "signal rate does not fit a WAV header"
            );
            FALLBACK_SAMPLE_RATE
        }),
    };

    let (channels, mut data): (u16, Vec<f64>) = match signal.sample_kind() {
        SampleKind::Complex => {
            let iq = signal.to_complexes().unwrap_or_default();
            (2, iq.iter().flat_map(|z| [z.re, z.im]).collect())
        }
        _ => (1, signal.to_reals().unwrap_or_default()),
    };

    if options.normalize {
        let peak = data.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        if peak > 0.0 {
            data.iter_mut().for_each(|v| *v /= peak);
        }
    }

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for &v in &data {
        writer.write_sample(v as f32)?;
    }
    writer.finalize()?;

    let info = WavInfo {
        channels,
        sample_rate,
        num_frames: (data.len() / usize::from(channels)) as u64,
    };
    tracing::info!(
        path = %path.as_ref().display(),
        channels,
        sample_rate,
        frames = info.num_frames,
        "WAV exported"
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netplus_core::{Complex64, Sample, SignalHeader};
    use tempfile::NamedTempFile;

    fn signal(kind: SampleKind, sampling_period: f64, samples: Vec<Sample>) -> SignalFile {
        SignalFile {
            header: SignalHeader {
                signal_type: "test".to_string(),
                sample_kind: kind,
                sample_size: kind.size_bytes(),
                symbol_period: sampling_period,
                sampling_period,
                samples_per_symbol: 1.0,
                central_wavelength: 1550e-9,
                central_frequency: 299_792_458.0 / 1550e-9,
                first_saved_sample: 0,
            },
            samples,
        }
    }

    fn read_all(path: &Path) -> Vec<f32> {
        WavReader::open(path)
            .unwrap()
            .into_samples::<f32>()
            .map(|s| s.unwrap())
            .collect()
    }

    #[test]
    fn real_signal_is_mono_at_its_own_rate() {
        let tmp = NamedTempFile::new().unwrap();
        let s = signal(
            SampleKind::Real,
            1.0 / 8000.0,
            vec![Sample::Real(0.5), Sample::Real(-0.25), Sample::Real(0.0)],
        );
        let info = export_wav(&s, tmp.path(), ExportOptions::default()).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.num_frames, 3);
        assert_eq!(read_wav_info(tmp.path()).unwrap(), info);
        assert_eq!(read_all(tmp.path()), vec![0.5, -0.25, 0.0]);
    }

    #[test]
    fn complex_signal_is_interleaved_iq() {
        let tmp = NamedTempFile::new().unwrap();
        let s = signal(
            SampleKind::Complex,
            1.0 / 1000.0,
            vec![
                Sample::Complex(Complex64::new(1.0, -1.0)),
                Sample::Complex(Complex64::new(0.5, 0.25)),
            ],
        );
        let info = export_wav(&s, tmp.path(), ExportOptions::default()).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.num_frames, 2);
        assert_eq!(read_all(tmp.path()), vec![1.0, -1.0, 0.5, 0.25]);
    }

    #[test]
    fn bits_and_normalization() {
        let tmp = NamedTempFile::new().unwrap();
        let s = signal(
            SampleKind::Integer,
            1.0 / 100.0,
            vec![Sample::Integer(4), Sample::Integer(-2), Sample::Integer(0)],
        );
        let options = ExportOptions {
            normalize: true,
            ..ExportOptions::default()
        };
        export_wav(&s, tmp.path(), options).unwrap();
        assert_eq!(read_all(tmp.path()), vec![1.0, -0.5, 0.0]);

        let bits = signal(
            SampleKind::Binary,
            1.0 / 100.0,
            vec![Sample::Binary(1), Sample::Binary(0)],
        );
        export_wav(&bits, tmp.path(), ExportOptions::default()).unwrap();
        assert_eq!(read_all(tmp.path()), vec![1.0, 0.0]);
    }

    #[test]
    fn unrepresentable_rate_falls_back() {
        let tmp = NamedTempFile::new().unwrap();
        let s = signal(SampleKind::Real, 1.0 / 50e9, vec![Sample::Real(1.0)]);
        let info = export_wav(&s, tmp.path(), ExportOptions::default()).unwrap();
        assert_eq!(info.sample_rate, FALLBACK_SAMPLE_RATE);

        let options = ExportOptions {
            sample_rate: Some(44_100),
            ..ExportOptions::default()
        };
        assert_eq!(export_wav(&s, tmp.path(), options).unwrap().sample_rate, 44_100);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let tmp = NamedTempFile::new().unwrap();
        let s = signal(SampleKind::Real, 1.0, vec![]);
        let options = ExportOptions {
            sample_rate: Some(0),
            ..ExportOptions::default()
        };
        assert!(matches!(
            export_wav(&s, tmp.path(), options),
            Err(Error::Format(_))
        ));
    }
}

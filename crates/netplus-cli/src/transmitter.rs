//! The built-in QAM transmitter system.
//!
//! ```text
//! BinarySource -> QamMapper -> Upsampler -> [pulse_shaper] -> Sink
//!                                           ComplexToReal
//!                                           FirFilter (I), FirFilter (Q)
//!                                           RealToComplex
//! ```

use netplus_blocks::{
    BinarySource, ComplexToReal, FirFilter, QamMapper, RealToComplex, Sink, Upsampler,
    raised_cosine,
};
use netplus_config::RunConfig;
use netplus_core::{Block, CompositeBlock, Continuity, SampleBuffer, SignalId, SignalType, System};

/// A transmitter system and the handles of its top-level signals.
pub struct Transmitter {
    /// The assembled system, not yet initialized.
    pub system: System,
    /// Source bits.
    pub bits: SignalId,
    /// Mapped symbols, one sample per symbol.
    pub symbols: SignalId,
    /// Symbols after zero insertion.
    pub upsampled: SignalId,
    /// Pulse-shaped baseband output.
    pub shaped: SignalId,
}

impl Transmitter {
    /// Top-level signals in chain order, with a short label each.
    pub fn signals(&self) -> [(SignalId, &'static str); 4] {
        [
            (self.bits, "bits"),
            (self.symbols, "symbols"),
            (self.upsampled, "upsampled"),
            (self.shaped, "shaped"),
        ]
    }
}

/// Assembles the transmitter described by `config`.
pub fn build(config: &RunConfig) -> Transmitter {
    let tx = &config.transmitter;
    let capacity = config.transmitter_buffer_length();
    let real = || SampleBuffer::new(SignalType::time_discrete_real(Continuity::Continuous), capacity);

    let mut system = System::new().with_signals_folder(&config.signals_folder);
    let bits = system.add_signal(SampleBuffer::new(SignalType::binary(), capacity));
    let symbols = system.add_signal(SampleBuffer::new(
        SignalType::time_discrete_complex(Continuity::Discrete),
        capacity,
    ));
    let upsampled = system.add_signal(SampleBuffer::new(
        SignalType::time_discrete_complex(Continuity::Continuous),
        capacity,
    ));
    let i = system.add_signal(real());
    let q = system.add_signal(real());
    let i_shaped = system.add_signal(real());
    let q_shaped = system.add_signal(real());
    let shaped = system.add_signal(SampleBuffer::new(
        SignalType::time_continuous_complex(Continuity::Continuous),
        capacity,
    ));

    if tx.save_signals {
        for id in [bits, symbols, upsampled, shaped] {
            if let Some(signal) = system.signal_mut(id) {
                signal.set_save(true);
            }
        }
    }

    system.add_block(
        BinarySource::new(bits, tx.bits.to_bit_mode(), tx.number_of_bits)
            .with_bit_period(tx.bit_period),
    );
    system.add_block(QamMapper::new(bits, symbols).with_order(tx.order));
    system.add_block(Upsampler::new(symbols, upsampled, tx.samples_per_symbol));

    let taps = raised_cosine(tx.rolloff, tx.samples_per_symbol, tx.span_symbols);
    let shaper: Vec<Box<dyn Block>> = vec![
        Box::new(ComplexToReal::new(upsampled, i, q)),
        Box::new(
            FirFilter::new(i, i_shaped, taps.clone())
                .with_name("fir_i")
                .with_see_beginning_of_impulse_response(false)
                .with_impulse_response_saved(tx.save_impulse_response),
        ),
        Box::new(
            FirFilter::new(q, q_shaped, taps)
                .with_name("fir_q")
                .with_see_beginning_of_impulse_response(false),
        ),
        Box::new(RealToComplex::new(i_shaped, q_shaped, shaped)),
    ];
    system.add_block(CompositeBlock::new(
        "pulse_shaper",
        vec![upsampled],
        vec![shaped],
        shaper,
    ));
    system.add_block(Sink::new(shaped));

    Transmitter {
        system,
        bits,
        symbols,
        upsampled,
        shaped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netplus_config::{BitSourceConfig, TransmitterConfig};

    fn config(folder: &std::path::Path, tx: TransmitterConfig) -> RunConfig {
        RunConfig {
            signals_folder: folder.to_path_buf(),
            default_buffer_length: 32,
            transmitter: tx,
            ..RunConfig::default()
        }
    }

    #[test]
    fn sample_counts_follow_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = build(&config(
            dir.path(),
            TransmitterConfig {
                number_of_bits: 100,
                order: 16,
                samples_per_symbol: 4,
                bits: BitSourceConfig::PseudoRandom { order: 7 },
                ..TransmitterConfig::default()
            },
        ));
        let report = tx.system.run().unwrap();
        assert_eq!(report.signal(tx.bits).unwrap().written, 100);
        assert_eq!(report.signal(tx.symbols).unwrap().written, 25);
        assert_eq!(report.signal(tx.upsampled).unwrap().written, 100);
        assert_eq!(report.signal(tx.shaped).unwrap().saved, 100);
        assert_eq!(report.saved_paths().count(), 4);
    }

    #[test]
    fn shaped_output_passes_through_symbols() {
        // Raised-cosine taps are zero at every other symbol instant and the
        // filter delay is compensated, so the shaped signal equals the
        // symbols at every sps-th sample from the first one.
        let dir = tempfile::tempdir().unwrap();
        let sps = 4;
        let span = 4;
        let mut tx = build(&config(
            dir.path(),
            TransmitterConfig {
                number_of_bits: 40,
                samples_per_symbol: sps,
                span_symbols: span,
                save_signals: false,
                bits: BitSourceConfig::Cyclic {
                    pattern: vec![0, 0, 1, 1, 1, 0, 0, 1],
                },
                ..TransmitterConfig::default()
            },
        ));
        let shaped = tx.shaped;
        if let Some(signal) = tx.system.signal_mut(shaped) {
            signal.set_save(true);
        }
        let report = tx.system.run().unwrap();
        let path = report.signal(shaped).unwrap().path.clone().unwrap();
        let iq = netplus_io::SignalFile::open(path).unwrap().to_complexes().unwrap();

        assert_eq!(iq.len(), 20 * sps);
        let expected = [(1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0)];
        for (k, &(re, im)) in expected.iter().enumerate() {
            let z = iq[k * sps];
            assert!((z.re - re).abs() < 1e-9 && (z.im - im).abs() < 1e-9, "symbol {k}: {z}");
        }
    }

    #[test]
    fn impulse_response_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = build(&config(
            dir.path(),
            TransmitterConfig {
                number_of_bits: 8,
                samples_per_symbol: 2,
                span_symbols: 2,
                save_signals: false,
                save_impulse_response: true,
                ..TransmitterConfig::default()
            },
        ));
        let report = tx.system.run().unwrap();
        assert_eq!(report.saved_paths().count(), 0);
        let text =
            std::fs::read_to_string(dir.path().join(netplus_blocks::IMPULSE_RESPONSE_FILE)).unwrap();
        assert_eq!(text.lines().count(), 5);
    }
}

//! Demonstration of a QAM transmitter in NetPlus
//!
//! This example builds a bit source, a 16-QAM mapper and a raised-cosine
//! pulse shaper wrapped in a composite block, runs it, and prints the first
//! shaped samples together with where the signal files were written.
//!
//! Run with: cargo run --example qam_demo

use netplus_blocks::{
    BinarySource, BitMode, ComplexToReal, FirFilter, QamMapper, RealToComplex, Sink,
    raised_cosine,
};
use netplus_core::{Block, CompositeBlock, Continuity, SampleBuffer, SignalType, System};

const BUFFER_LEN: usize = 256;

fn main() -> netplus_core::Result<()> {
    println!("NetPlus 16-QAM Transmitter Demo");
    println!("===============================\n");

    let folder = std::env::temp_dir().join("netplus_qam_demo");
    let real = SignalType::time_discrete_real(Continuity::Continuous);
    let complex = SignalType::time_discrete_complex(Continuity::Continuous);

    let mut system = System::new().with_signals_folder(&folder);
    let bits = system.add_signal(SampleBuffer::new(SignalType::binary(), BUFFER_LEN).with_file_name("S0.sgn"));
    let symbols = system.add_signal(SampleBuffer::new(complex, BUFFER_LEN).with_file_name("S1.sgn"));
    let i = system.add_signal(SampleBuffer::new(real, BUFFER_LEN));
    let q = system.add_signal(SampleBuffer::new(real, BUFFER_LEN));
    let i_shaped = system.add_signal(SampleBuffer::new(real, BUFFER_LEN));
    let q_shaped = system.add_signal(SampleBuffer::new(real, BUFFER_LEN));
    let shaped = system.add_signal(SampleBuffer::new(complex, BUFFER_LEN).with_file_name("S2.sgn"));

    let taps = raised_cosine(0.25, 1, 8);
    println!("Pulse shaper: {} raised-cosine taps, rolloff 0.25\n", taps.len());

    let shaper: Vec<Box<dyn Block>> = vec![
        Box::new(ComplexToReal::new(symbols, i, q)),
        Box::new(FirFilter::new(i, i_shaped, taps.clone()).with_name("fir_i")),
        Box::new(FirFilter::new(q, q_shaped, taps).with_name("fir_q")),
        Box::new(RealToComplex::new(i_shaped, q_shaped, shaped)),
    ];

    system.add_block(BinarySource::new(bits, BitMode::PseudoRandom { order: 15 }, 4096).with_bit_period(1.0 / 40e9));
    system.add_block(QamMapper::new(bits, symbols).with_order(16));
    system.add_block(CompositeBlock::new("pulse_shaper", vec![symbols], vec![shaped], shaper));
    let (sink, recording) = Sink::recording(shaped);
    system.add_block(sink);

    let report = system.run()?;

    println!("Passes: {}", report.passes);
    println!("Symbols: {}", recording.len());
    for (n, z) in recording.complexes().iter().take(8).enumerate() {
        println!("  y[{n}] = {:+.4} {:+.4}j", z.re, z.im);
    }
    println!("\nSignal files:");
    for path in report.saved_paths() {
        println!("  {}", path.display());
    }
    Ok(())
}

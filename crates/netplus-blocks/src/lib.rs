//! NetPlus Blocks - processing blocks for communication signal chains
//!
//! This crate provides ready-made [`Block`](netplus_core::Block)
//! implementations built on netplus-core:
//!
//! - [`BinarySource`] - Random, PRBS or deterministic bit streams
//! - [`VectorSource`] - Fixed list of samples, emitted once
//! - [`QamMapper`] - M-QAM mapping of bits to complex symbols
//! - [`FirFilter`] - Streaming FIR filter over real signals
//! - [`ComplexToReal`] / [`RealToComplex`] - I/Q split and join
//! - [`Upsampler`] - Zero-insertion rate increase ahead of pulse shaping
//! - [`Sink`] - Drains a signal, optionally recording it
//!
//! ## Example
//!
//! ```rust
//! use netplus_blocks::{BinarySource, BitMode, QamMapper, Sink};
//! use netplus_core::{Continuity, SampleBuffer, SignalType, System};
//!
//! let mut system = System::new();
//! let bits = system.add_signal(SampleBuffer::new(SignalType::binary(), 64));
//! let symbols = system.add_signal(SampleBuffer::new(
//!     SignalType::time_discrete_complex(Continuity::Discrete),
//!     64,
//! ));
//! system.add_block(BinarySource::new(bits, BitMode::Random { seed: 1 }, 200));
//! system.add_block(QamMapper::new(bits, symbols));
//! let (sink, recording) = Sink::recording(symbols);
//! system.add_block(sink);
//!
//! system.run().unwrap();
//! assert_eq!(recording.len(), 100);
//! ```

pub mod converters;
pub mod fir;
pub mod qam_mapper;
pub mod sink;
pub mod sources;
pub mod upsampler;

// Re-export main types at crate root
pub use converters::{ComplexToReal, RealToComplex};
pub use fir::{FirFilter, IMPULSE_RESPONSE_FILE, raised_cosine};
pub use qam_mapper::{QamMapper, default_constellation};
pub use sink::{Recording, Sink};
pub use sources::{BinarySource, BitMode, PSEUDO_RANDOM_ORDERS, VectorSource};
pub use upsampler::Upsampler;

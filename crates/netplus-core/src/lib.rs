//! NetPlus Core - streaming signals and the block simulation engine
//!
//! This crate provides the foundation of a discrete-event, block-based
//! simulator for communication signal chains: signals are bounded ring
//! buffers streamed between processing blocks, and a cooperative engine
//! runs the blocks until no more data moves.
//!
//! # Core Abstractions
//!
//! ## Signals
//!
//! - [`SampleBuffer`] - Fixed-capacity ring of one sample kind, with
//!   incremental persistence to a signal file
//! - [`SignalType`] - Sample kind plus time/amplitude continuity tags
//! - [`Sample`] / [`SampleValue`] - Kind-tagged and typed sample access
//! - [`SignalTiming`] - Symbol/sampling periods and optical carrier
//!
//! ## Engine
//!
//! - [`Block`] - Trait every processing block implements
//! - [`CompositeBlock`] - A block made of child blocks
//! - [`System`] - Owns signals and blocks, runs them to quiescence
//!
//! ## Persistence
//!
//! - [`SignalHeader`] - TOML header at the top of every signal file
//! - [`SignalWriter`] - Append-only file writer used by saved signals
//!
//! # Example
//!
//! ```rust
//! use netplus_core::{SampleBuffer, SignalType};
//!
//! let mut symbols = SampleBuffer::new(SignalType::integer(), 8);
//! symbols.put(3i32).unwrap();
//! assert_eq!(symbols.get::<i32>().unwrap(), 3);
//! assert!(symbols.is_empty());
//! ```

pub mod error;
pub mod graph;
pub mod persist;
pub mod sample;
pub mod signal;
pub mod signal_type;

pub use error::{Error, Result};
pub use graph::{
    Artifact, Block, CompositeBlock, DEFAULT_SIGNALS_FOLDER, InitContext, RunReport, SignalBank, SignalId,
    SignalReport, System, SystemState,
};
pub use persist::{HEADER_TERMINATOR, SignalHeader, SignalWriter, resolve_signal_path};
pub use sample::{Sample, SampleKind, SampleStorage, SampleValue};
pub use signal::{
    DEFAULT_BUFFER_LENGTH, DEFAULT_CENTRAL_WAVELENGTH, SPEED_OF_LIGHT, SampleBuffer, SignalTiming,
};
pub use signal_type::{Continuity, SignalType};

/// Complex sample type used by complex signals.
pub use num_complex::Complex64;

//! Block graph and execution engine.
//!
//! A [`System`] owns a [`SignalBank`] (every [`SampleBuffer`](crate::SampleBuffer)
//! of the simulation) and a set of [`Block`]s wired to signals by
//! [`SignalId`]. Execution order is derived from the blocks' declared ports:
//! a block runs after the producers of its inputs.
//!
//! # Lifecycle
//!
//! ```text
//! Built -> Initialized -> Running -> Draining -> Terminated
//! ```
//!
//! - **Initialize**: order blocks (a cycle is a configuration error), check
//!   every port handle, initialize blocks in order, resolve every saved
//!   signal's file path, then open the files and write their headers.
//!   Artifacts blocks queued while initializing are written last, so a
//!   configuration error leaves the signals folder untouched.
//! - **Run**: issue passes, each running every block once, until a pass in
//!   which no block reports work. Blocks are then flushed; if any emits
//!   held samples, passes resume, otherwise that quiescent pass ends the run.
//! - **Terminate**: terminate blocks in reverse order, flush the partially
//!   filled tail of every saved signal and close the files.
//!
//! A block error aborts the pass loop but terminate still runs, so files are
//! always closed cleanly.
//!
//! # Example
//!
//! ```rust,ignore
//! use netplus_core::{SampleBuffer, SignalType, System};
//!
//! let mut system = System::new().with_signals_folder("out");
//! let bits = system.add_signal(SampleBuffer::new(SignalType::binary(), 512).with_file_name("S0.sgn"));
//! system.add_block(BinarySource::new(bits, BitMode::Random { seed: 7 }, 1024));
//! system.add_block(Sink::new(bits));
//! let report = system.run()?;
//! ```

mod bank;
mod block;
mod composite;
pub mod system;
pub mod topology;

pub use bank::{SignalBank, SignalId};
pub use block::{Artifact, Block, InitContext};
pub use composite::CompositeBlock;
pub use system::{DEFAULT_SIGNALS_FOLDER, RunReport, SignalReport, System, SystemState};

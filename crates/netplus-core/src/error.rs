//! Error types for signal buffers, blocks and the system engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::graph::SignalId;
use crate::sample::SampleKind;

/// Errors raised while building, initializing or running a system.
#[derive(Debug, Error)]
pub enum Error {
    /// A block parameter is unset or out of its domain.
    #[error("invalid parameter '{parameter}' in block '{block}': {reason}")]
    Configuration {
        /// Name of the block that rejected its configuration.
        block: String,
        /// Name of the offending parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// The blocks' signal connections form a cycle.
    #[error("dependency cycle between blocks: {}", blocks.join(" -> "))]
    Cycle {
        /// Names of the blocks that could not be ordered.
        blocks: Vec<String>,
    },

    /// A block refers to a signal handle that does not exist in the bank.
    #[error("block '{block}' refers to unknown signal {signal}")]
    UnknownSignal {
        /// Name of the block holding the dangling handle.
        block: String,
        /// The handle that was not found.
        signal: SignalId,
    },

    /// A sample was read from a signal with zero occupancy.
    #[error("signal {signal} underrun: read with no samples available")]
    Underrun {
        /// The signal that was read.
        signal: SignalId,
    },

    /// A sample was written to a signal with no free slots.
    #[error("signal {signal} overrun: write with no free slots")]
    Overrun {
        /// The signal that was written.
        signal: SignalId,
    },

    /// A sample of the wrong kind was written to or read from a signal.
    #[error("signal {signal} holds {found} samples, not {expected}")]
    SampleKindMismatch {
        /// The signal that was accessed.
        signal: SignalId,
        /// Kind requested by the caller.
        expected: SampleKind,
        /// Kind stored by the signal.
        found: SampleKind,
    },

    /// Opening, writing or closing a signal file failed.
    #[error("failed to {action} signal file '{path}': {source}")]
    Persistence {
        /// What was being done to the file.
        action: &'static str,
        /// Path of the signal file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A block failed while running.
    #[error("block '{block}' failed: {source}")]
    Block {
        /// Name of the failing block.
        block: String,
        /// The error it reported.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(
        block: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Configuration {
            block: block.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a persistence error.
    pub fn persistence(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Persistence {
            action,
            path: path.into(),
            source,
        }
    }

    /// Wrap an error raised inside a block's `run`.
    ///
    /// Configuration errors already carry the block name and are returned unchanged.
    pub fn in_block(self, block: &str) -> Self {
        match self {
            err @ (Error::Configuration { .. } | Error::Block { .. }) => err,
            other => Error::Block {
                block: block.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns true for errors detected before any pass runs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. } | Error::Cycle { .. } | Error::UnknownSignal { .. }
        )
    }

    /// Returns true if the error comes from a signal file operation.
    pub fn is_persistence(&self) -> bool {
        match self {
            Error::Persistence { .. } => true,
            Error::Block { source, .. } => source.is_persistence(),
            _ => false,
        }
    }
}

/// Convenience result type for netplus-core operations.
pub type Result<T> = std::result::Result<T, Error>;

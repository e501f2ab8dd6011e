//! The block abstraction: a processing node wired to signals by handle.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::bank::{SignalBank, SignalId};

/// A text file a block asks to have written alongside the signal files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Destination, already resolved inside the signals folder.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Environment handed to [`Block::initialize`].
///
/// Gives access to every signal (so blocks can check kinds and propagate
/// timing to their outputs) and to the folder signal files are written to.
///
/// Blocks never write to the signals folder while initializing. Files they
/// need are queued with [`queue_artifact`](Self::queue_artifact) and written
/// by the system only once every block has initialized successfully.
pub struct InitContext<'a> {
    signals: &'a mut SignalBank,
    signals_folder: &'a Path,
    artifacts: Vec<Artifact>,
}

impl<'a> InitContext<'a> {
    /// Creates a context over `signals` for a run writing into `signals_folder`.
    pub fn new(signals: &'a mut SignalBank, signals_folder: &'a Path) -> Self {
        Self {
            signals,
            signals_folder,
            artifacts: Vec::new(),
        }
    }

    /// Borrows the signal bank.
    pub fn signals(&self) -> &SignalBank {
        self.signals
    }

    /// Mutably borrows the signal bank.
    pub fn signals_mut(&mut self) -> &mut SignalBank {
        &mut *self.signals
    }

    /// Folder signal files and other run artifacts are written to.
    pub fn signals_folder(&self) -> &Path {
        self.signals_folder
    }

    /// Queues a file to be written after initialization succeeds.
    pub fn queue_artifact(&mut self, path: PathBuf, contents: String) {
        self.artifacts.push(Artifact { path, contents });
    }

    /// Files queued so far.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Consumes the context, returning the queued files.
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}

/// A processing node of a [`System`](super::System).
///
/// A block declares the signals it reads and writes. The system derives the
/// execution order from those declarations and calls [`run`](Block::run)
/// repeatedly; each call consumes what is available on the inputs, produces
/// what fits on the outputs and reports whether it did anything.
///
/// Blocks must only touch their declared signals. Indexing the bank with a
/// declared handle never panics once the system has initialized.
///
/// # Example
///
/// ```rust
/// use netplus_core::{Block, Result, SignalBank, SignalId};
///
/// /// Copies integers from one signal to another, negated.
/// struct Negate {
///     ports: [SignalId; 2],
/// }
///
/// impl Block for Negate {
///     fn name(&self) -> &str {
///         "negate"
///     }
///     fn inputs(&self) -> &[SignalId] {
///         &self.ports[..1]
///     }
///     fn outputs(&self) -> &[SignalId] {
///         &self.ports[1..]
///     }
///     fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
///         let [input, output] = self.ports;
///         let n = signals[input]
///             .available_to_read()
///             .min(signals[output].available_to_write());
///         for _ in 0..n {
///             let v: i32 = signals[input].get()?;
///             signals[output].put(-v)?;
///         }
///         Ok(n > 0)
///     }
/// }
/// ```
pub trait Block: Send {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Signals this block consumes.
    fn inputs(&self) -> &[SignalId];

    /// Signals this block produces.
    fn outputs(&self) -> &[SignalId];

    /// Validates parameters and prepares state before the first pass.
    ///
    /// Called once, in dependency order, so upstream blocks have already
    /// initialized (and set the timing of) this block's inputs.
    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Performs one bounded unit of work.
    ///
    /// Returns `true` iff any sample was consumed or produced.
    fn run(&mut self, signals: &mut SignalBank) -> Result<bool>;

    /// Emits what the block still holds once its inputs have ended.
    ///
    /// Called on every block after a quiescent pass. Returns `true` iff any
    /// sample was consumed or produced, in which case passes resume and
    /// `flush` is called again at the next quiescent pass.
    fn flush(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let _ = signals;
        Ok(false)
    }

    /// Releases state after the last pass. Must be idempotent.
    fn terminate(&mut self, signals: &mut SignalBank) {
        let _ = signals;
    }
}

impl<B: Block + ?Sized> Block for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn inputs(&self) -> &[SignalId] {
        (**self).inputs()
    }

    fn outputs(&self) -> &[SignalId] {
        (**self).outputs()
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        (**self).initialize(ctx)
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        (**self).run(signals)
    }

    fn flush(&mut self, signals: &mut SignalBank) -> Result<bool> {
        (**self).flush(signals)
    }

    fn terminate(&mut self, signals: &mut SignalBank) {
        (**self).terminate(signals);
    }
}

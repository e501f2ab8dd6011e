//! The engine: owns signals and blocks, drives a run to quiescence.

use core::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::persist::resolve_signal_path;
use crate::signal::SampleBuffer;

use super::bank::{SignalBank, SignalId};
use super::block::{Block, InitContext};
use super::topology;

/// Folder signal files are written to unless configured otherwise.
pub const DEFAULT_SIGNALS_FOLDER: &str = "signals";

/// Lifecycle of a [`System`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemState {
    /// Signals and blocks are being added.
    Built,
    /// Blocks are initialized and signal files are open.
    Initialized,
    /// Passes are being issued.
    Running,
    /// The last pass was quiescent (or failed); blocks are terminating.
    Draining,
    /// Files are closed. The system cannot run again.
    Terminated,
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemState::Built => "built",
            SystemState::Initialized => "initialized",
            SystemState::Running => "running",
            SystemState::Draining => "draining",
            SystemState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Per-signal outcome of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalReport {
    /// Signal handle.
    pub id: SignalId,
    /// Samples produced over the run.
    pub written: u64,
    /// Samples appended to the signal file.
    pub saved: u64,
    /// Signal file, if the signal was saved.
    pub path: Option<PathBuf>,
}

/// Summary returned by [`System::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Passes issued, the final quiescent one included.
    pub passes: u64,
    /// One entry per signal, in handle order.
    pub signals: Vec<SignalReport>,
}

impl RunReport {
    /// Looks up the report of one signal.
    pub fn signal(&self, id: SignalId) -> Option<&SignalReport> {
        self.signals.iter().find(|s| s.id == id)
    }

    /// Paths of every file written during the run.
    pub fn saved_paths(&self) -> impl Iterator<Item = &Path> {
        self.signals.iter().filter_map(|s| s.path.as_deref())
    }
}

/// A graph of blocks connected by signals, run to completion.
///
/// Build it by adding signals ([`add_signal`](Self::add_signal)) and blocks
/// wired to their handles ([`add_block`](Self::add_block)), then call
/// [`run`](Self::run). The order blocks are added in does not matter except
/// as a tie-break: execution follows the producer/consumer relation.
///
/// A run issues passes, each calling every block once in dependency order,
/// until a pass in which no block did any work. Blocks that stop early
/// keep being called so downstream blocks can drain what is buffered.
pub struct System {
    signals: SignalBank,
    blocks: Vec<Box<dyn Block>>,
    order: Vec<usize>,
    signals_folder: PathBuf,
    state: SystemState,
    passes: u64,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    /// Creates an empty system writing into [`DEFAULT_SIGNALS_FOLDER`].
    pub fn new() -> Self {
        Self {
            signals: SignalBank::new(),
            blocks: Vec::new(),
            order: Vec::new(),
            signals_folder: PathBuf::from(DEFAULT_SIGNALS_FOLDER),
            state: SystemState::Built,
            passes: 0,
        }
    }

    /// Sets the folder signal files are written to.
    pub fn with_signals_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.signals_folder = folder.into();
        self
    }

    /// Folder signal files are written to.
    pub fn signals_folder(&self) -> &Path {
        &self.signals_folder
    }

    /// Adds a signal and returns its handle.
    pub fn add_signal(&mut self, buffer: SampleBuffer) -> SignalId {
        self.signals.add(buffer)
    }

    /// Adds a block. Its ports must refer to signals of this system.
    pub fn add_block<B: Block + 'static>(&mut self, block: B) {
        self.blocks.push(Box::new(block));
    }

    /// Borrows a signal.
    pub fn signal(&self, id: SignalId) -> Option<&SampleBuffer> {
        self.signals.get(id)
    }

    /// Mutably borrows a signal, e.g. to configure saving before a run.
    pub fn signal_mut(&mut self, id: SignalId) -> Option<&mut SampleBuffer> {
        self.signals.get_mut(id)
    }

    /// Borrows the signal bank.
    pub fn signals(&self) -> &SignalBank {
        &self.signals
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Passes issued so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Block names in execution order. Empty before initialization.
    pub fn execution_order(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.blocks[i].name()).collect()
    }

    /// Orders and initializes blocks, then opens every saved signal's file
    /// and writes the artifacts blocks queued.
    ///
    /// Nothing runs if this fails, and any file opened so far is closed. No
    /// file is created unless every block initialized successfully.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != SystemState::Built {
            return Err(self.state_error("initialize"));
        }
        let result = self.try_initialize();
        if result.is_err() {
            // Close errors are logged; the initialization error wins.
            let _ = self.close_files();
            self.state = SystemState::Terminated;
        }
        result
    }

    fn try_initialize(&mut self) -> Result<()> {
        self.order = topology::dependency_order(&self.blocks, &self.signals)?;
        for signal in topology::dangling_outputs(&self.blocks) {
            tracing::debug!(%signal, "signal is produced but never consumed");
        }

        let mut ctx = InitContext::new(&mut self.signals, &self.signals_folder);
        for &idx in &self.order {
            let block = &mut self.blocks[idx];
            block.initialize(&mut ctx)?;
            tracing::debug!(block = block.name(), "block initialized");
        }
        let artifacts = ctx.into_artifacts();

        let paths = self.resolve_paths()?;
        if !paths.is_empty() || !artifacts.is_empty() {
            std::fs::create_dir_all(&self.signals_folder).map_err(|e| {
                Error::persistence("create folder for", &self.signals_folder, e)
            })?;
        }
        for (id, path) in paths {
            self.signals[id].open_file(path)?;
        }
        for artifact in artifacts {
            std::fs::write(&artifact.path, &artifact.contents)
                .map_err(|e| Error::persistence("write", &artifact.path, e))?;
            tracing::debug!(path = %artifact.path.display(), "artifact written");
        }

        self.state = SystemState::Initialized;
        tracing::info!(
            blocks = self.blocks.len(),
            signals = self.signals.len(),
            folder = %self.signals_folder.display(),
            "system initialized"
        );
        Ok(())
    }

    /// Resolves the file path of every saved signal, all before any is opened.
    fn resolve_paths(&self) -> Result<Vec<(SignalId, PathBuf)>> {
        self.signals
            .iter()
            .filter(|s| s.is_saved())
            .map(|s| {
                let name = s
                    .file_name()
                    .map_or_else(|| s.id().default_file_name(), str::to_string);
                resolve_signal_path(&self.signals_folder, &name)
                    .map(|path| (s.id(), path))
                    .map_err(|reason| {
                        Error::configuration(format!("signal {}", s.id()), "file_name", reason)
                    })
            })
            .collect()
    }

    /// Issues one pass. Returns `false` if the pass was quiescent.
    ///
    /// Initializes the system first if needed.
    pub fn run_pass(&mut self) -> Result<bool> {
        match self.state {
            SystemState::Built => {
                self.initialize()?;
                self.state = SystemState::Running;
            }
            SystemState::Initialized => self.state = SystemState::Running,
            SystemState::Running => {}
            SystemState::Draining | SystemState::Terminated => {
                return Err(self.state_error("run"));
            }
        }

        let mut progressed = false;
        for &idx in &self.order {
            let block = &mut self.blocks[idx];
            progressed |= block
                .run(&mut self.signals)
                .map_err(|e| e.in_block(block.name()))?;
        }
        self.passes += 1;
        tracing::trace!(pass = self.passes, progressed, "pass complete");
        Ok(progressed)
    }

    /// Runs the whole lifecycle: initialize, passes until quiescent, terminate.
    ///
    /// After each quiescent pass blocks are flushed (see [`Block::flush`]);
    /// the run ends at the first quiescent pass after which no block flushes.
    ///
    /// If a block fails the loop stops, blocks are still terminated and
    /// files flushed and closed, and the block's error is returned.
    pub fn run(&mut self) -> Result<RunReport> {
        let outcome = self.run_until_quiescent();
        if self.state == SystemState::Terminated {
            // Initialization failed and already cleaned up.
            return outcome.map(|_| self.report());
        }
        let terminated = self.terminate();
        outcome?;
        terminated?;
        Ok(self.report())
    }

    /// Runs with signal files written into `folder` instead of the
    /// configured folder. Must be called before initialization.
    pub fn run_in(&mut self, folder: impl Into<PathBuf>) -> Result<RunReport> {
        if self.state != SystemState::Built {
            return Err(self.state_error("change the signals folder of"));
        }
        self.signals_folder = folder.into();
        self.run()
    }

    fn run_until_quiescent(&mut self) -> Result<()> {
        loop {
            while self.run_pass()? {}
            if !self.flush_blocks()? {
                break;
            }
        }
        tracing::info!(passes = self.passes, "system quiescent");
        Ok(())
    }

    /// Gives every block, in dependency order, the chance to emit held
    /// samples after a quiescent pass. Returns `true` if any block did.
    fn flush_blocks(&mut self) -> Result<bool> {
        let mut progressed = false;
        for &idx in &self.order {
            let block = &mut self.blocks[idx];
            progressed |= block
                .flush(&mut self.signals)
                .map_err(|e| e.in_block(block.name()))?;
        }
        if progressed {
            tracing::debug!(pass = self.passes, "blocks flushed held samples");
        }
        Ok(progressed)
    }

    /// Terminates blocks in reverse dependency order, then flushes and
    /// closes every signal file. Idempotent.
    ///
    /// Every file is closed even if some fail; the first error is returned.
    pub fn terminate(&mut self) -> Result<()> {
        if self.state == SystemState::Terminated {
            return Ok(());
        }
        self.state = SystemState::Draining;
        for &idx in self.order.iter().rev() {
            self.blocks[idx].terminate(&mut self.signals);
        }
        let result = self.close_files();
        self.state = SystemState::Terminated;
        tracing::info!(passes = self.passes, "system terminated");
        result
    }

    fn close_files(&mut self) -> Result<()> {
        let mut first_error = None;
        for signal in self.signals.iter_mut() {
            if let Err(e) = signal.close() {
                tracing::error!(signal = %signal.id(), error = %e, "failed to close signal file");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Builds the report of the run so far.
    pub fn report(&self) -> RunReport {
        RunReport {
            passes: self.passes,
            signals: self
                .signals
                .iter()
                .map(|s| SignalReport {
                    id: s.id(),
                    written: s.samples_written(),
                    saved: s.samples_saved(),
                    path: s.file_path().map(Path::to_path_buf),
                })
                .collect(),
        }
    }

    fn state_error(&self, action: &str) -> Error {
        Error::configuration(
            "system",
            "state",
            format!("cannot {action} a system that is {}", self.state),
        )
    }
}

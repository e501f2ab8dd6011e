//! Signal arena shared by all blocks of a system.

use core::fmt;
use core::ops::{Index, IndexMut};

use crate::signal::SampleBuffer;

/// Handle to a signal in a [`SignalBank`].
///
/// Handles are assigned sequentially and never reused within a bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub(crate) u32);

impl SignalId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Returns a sentinel value for signals not yet added to a bank.
    #[inline]
    pub fn sentinel() -> Self {
        Self(u32::MAX)
    }

    /// Default file name used when a saved signal has none.
    pub fn default_file_name(self) -> String {
        format!("S{}.sgn", self.0)
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Owns every [`SampleBuffer`] of a system.
///
/// Blocks hold [`SignalId`] handles and borrow buffers from the bank while
/// they run, so producer and consumer never alias a buffer.
#[derive(Debug, Default)]
pub struct SignalBank {
    signals: Vec<SampleBuffer>,
}

impl SignalBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a signal and returns its handle.
    pub fn add(&mut self, mut buffer: SampleBuffer) -> SignalId {
        let id = SignalId(self.signals.len() as u32);
        buffer.set_id(id);
        self.signals.push(buffer);
        id
    }

    /// Returns true if `id` refers to a signal of this bank.
    pub fn contains(&self, id: SignalId) -> bool {
        (id.0 as usize) < self.signals.len()
    }

    /// Borrows a signal.
    pub fn get(&self, id: SignalId) -> Option<&SampleBuffer> {
        self.signals.get(id.0 as usize)
    }

    /// Mutably borrows a signal.
    pub fn get_mut(&mut self, id: SignalId) -> Option<&mut SampleBuffer> {
        self.signals.get_mut(id.0 as usize)
    }

    /// Number of signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns true if the bank holds no signals.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Iterates over all signals in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &SampleBuffer> {
        self.signals.iter()
    }

    /// Mutably iterates over all signals in handle order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SampleBuffer> {
        self.signals.iter_mut()
    }
}

impl Index<SignalId> for SignalBank {
    type Output = SampleBuffer;

    /// # Panics
    ///
    /// Panics if `id` is not in this bank. Systems validate every block port
    /// before running, so blocks can index freely.
    fn index(&self, id: SignalId) -> &SampleBuffer {
        &self.signals[id.0 as usize]
    }
}

impl IndexMut<SignalId> for SignalBank {
    fn index_mut(&mut self, id: SignalId) -> &mut SampleBuffer {
        &mut self.signals[id.0 as usize]
    }
}

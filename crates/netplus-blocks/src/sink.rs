//! Terminal block that consumes a signal.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use netplus_core::{Block, Complex64, Result, Sample, SignalBank, SignalId};

/// Shared handle to the samples a [`Sink`] drained.
///
/// Clone it before handing the sink to a system and read it after the run.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    samples: Arc<Mutex<Vec<Sample>>>,
}

impl Recording {
    fn lock(&self) -> MutexGuard<'_, Vec<Sample>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, sample: Sample) {
        self.lock().push(sample);
    }

    /// Copies out everything recorded so far.
    pub fn samples(&self) -> Vec<Sample> {
        self.lock().clone()
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Recorded real samples, skipping other kinds.
    pub fn reals(&self) -> Vec<f64> {
        self.lock()
            .iter()
            .filter_map(|s| match s {
                Sample::Real(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Recorded complex samples, skipping other kinds.
    pub fn complexes(&self) -> Vec<Complex64> {
        self.lock()
            .iter()
            .filter_map(|s| match s {
                Sample::Complex(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Recorded bits, skipping other kinds.
    pub fn bits(&self) -> Vec<u8> {
        self.lock()
            .iter()
            .filter_map(|s| match s {
                Sample::Binary(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

/// Drains its input.
///
/// With a limit, the sink stops reading after that many samples, which
/// lets the upstream chain stall and the run reach quiescence even with an
/// unbounded producer.
#[derive(Debug, Clone)]
pub struct Sink {
    name: String,
    input: [SignalId; 1],
    limit: Option<u64>,
    consumed: u64,
    recording: Option<Recording>,
}

impl Sink {
    /// Creates a sink draining `input` without limit.
    pub fn new(input: SignalId) -> Self {
        Self {
            name: "sink".to_string(),
            input: [input],
            limit: None,
            consumed: 0,
            recording: None,
        }
    }

    /// Creates a sink that records what it drains.
    pub fn recording(input: SignalId) -> (Self, Recording) {
        let recording = Recording::default();
        let sink = Self {
            recording: Some(recording.clone()),
            ..Self::new(input)
        };
        (sink, recording)
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Stops reading after `limit` samples.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Samples consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

impl Block for Sink {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &self.input
    }

    fn outputs(&self) -> &[SignalId] {
        &[]
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let input = &mut signals[self.input[0]];
        let mut n = input.available_to_read() as u64;
        if let Some(limit) = self.limit {
            n = n.min(limit - self.consumed);
        }
        for _ in 0..n {
            let sample = input.get_sample()?;
            if let Some(recording) = &self.recording {
                recording.push(sample);
            }
        }
        self.consumed += n;
        Ok(n > 0)
    }

    fn terminate(&mut self, _signals: &mut SignalBank) {
        tracing::debug!(block = %self.name, consumed = self.consumed, "sink done");
    }
}

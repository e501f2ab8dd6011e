//! Signal sources: bit generators and fixed sample vectors.

use netplus_core::{Block, Error, InitContext, Result, Sample, SampleKind, SignalBank, SignalId};

/// LFSR orders with a built-in maximal-length feedback tap.
pub const PSEUDO_RANDOM_ORDERS: [u32; 6] = [7, 9, 11, 15, 23, 31];

/// Second feedback tap of the maximal-length polynomial `x^order + x^tap + 1`.
fn feedback_tap(order: u32) -> Option<u32> {
    match order {
        7 => Some(6),
        9 => Some(5),
        11 => Some(9),
        15 => Some(14),
        23 => Some(18),
        31 => Some(28),
        _ => None,
    }
}

/// How a [`BinarySource`] generates its bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitMode {
    /// Independent fair bits from a seeded generator.
    Random {
        /// Generator seed; equal seeds give equal streams.
        seed: u64,
    },
    /// Maximal-length LFSR sequence (PRBS) of the given order.
    PseudoRandom {
        /// Register length, one of [`PSEUDO_RANDOM_ORDERS`].
        order: u32,
    },
    /// The pattern, repeated.
    DeterministicCyclic(Vec<u8>),
    /// The pattern once, then zeros.
    DeterministicAppendZeros(Vec<u8>),
}

#[derive(Debug, Clone)]
enum BitState {
    Idle,
    Random(fastrand::Rng),
    Lfsr { register: u32, order: u32, tap: u32 },
    Pattern { pattern: Vec<u8>, pos: usize, cyclic: bool },
}

impl BitState {
    fn next_bit(&mut self) -> u8 {
        match self {
            BitState::Idle => 0,
            BitState::Random(rng) => u8::from(rng.bool()),
            BitState::Lfsr {
                register,
                order,
                tap,
            } => {
                let bit = ((*register >> (*order - 1)) ^ (*register >> (*tap - 1))) & 1;
                *register = ((*register << 1) | bit) & ((1 << *order) - 1);
                u8::from(bit == 1)
            }
            BitState::Pattern {
                pattern,
                pos,
                cyclic,
            } => {
                if *pos < pattern.len() {
                    let bit = pattern[*pos];
                    *pos += 1;
                    if *cyclic && *pos == pattern.len() {
                        *pos = 0;
                    }
                    bit
                } else {
                    0
                }
            }
        }
    }
}

/// Emits a finite stream of bits.
///
/// The output's symbol and sampling periods are both set to the bit period.
/// Once `number_of_bits` bits have been emitted the source reports no more
/// work.
///
/// # Example
///
/// ```rust
/// use netplus_blocks::{BinarySource, BitMode};
/// use netplus_core::{SampleBuffer, SignalType, System};
///
/// let mut system = System::new();
/// let bits = system.add_signal(SampleBuffer::new(SignalType::binary(), 64));
/// let source = BinarySource::new(bits, BitMode::PseudoRandom { order: 7 }, 1000)
///     .with_bit_period(1.0 / 10e9);
/// system.add_block(source);
/// ```
#[derive(Debug, Clone)]
pub struct BinarySource {
    name: String,
    output: [SignalId; 1],
    mode: BitMode,
    number_of_bits: u64,
    bit_period: f64,
    produced: u64,
    state: BitState,
}

impl BinarySource {
    /// Creates a source emitting `number_of_bits` bits on `output`.
    pub fn new(output: SignalId, mode: BitMode, number_of_bits: u64) -> Self {
        Self {
            name: "binary_source".to_string(),
            output: [output],
            mode,
            number_of_bits,
            bit_period: 1.0 / 50e9,
            produced: 0,
            state: BitState::Idle,
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the bit period in seconds.
    pub fn with_bit_period(mut self, bit_period: f64) -> Self {
        self.bit_period = bit_period;
        self
    }

    /// Bit period in seconds.
    pub fn bit_period(&self) -> f64 {
        self.bit_period
    }

    /// Bits emitted so far.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    fn build_state(&self) -> Result<BitState> {
        let invalid = |parameter: &str, reason: String| {
            Error::configuration(&self.name, parameter, reason)
        };
        match &self.mode {
            BitMode::Random { seed } => Ok(BitState::Random(fastrand::Rng::with_seed(*seed))),
            BitMode::PseudoRandom { order } => {
                let tap = feedback_tap(*order).ok_or_else(|| {
                    invalid(
                        "order",
                        format!("{order} is not one of {PSEUDO_RANDOM_ORDERS:?}"),
                    )
                })?;
                let register = ((1u64 << order) - 1) as u32;
                Ok(BitState::Lfsr {
                    register,
                    order: *order,
                    tap,
                })
            }
            BitMode::DeterministicCyclic(pattern) | BitMode::DeterministicAppendZeros(pattern) => {
                if pattern.is_empty() {
                    return Err(invalid("pattern", "pattern is empty".to_string()));
                }
                if let Some(bad) = pattern.iter().find(|&&b| b > 1) {
                    return Err(invalid("pattern", format!("{bad} is not a bit")));
                }
                Ok(BitState::Pattern {
                    pattern: pattern.clone(),
                    pos: 0,
                    cyclic: matches!(self.mode, BitMode::DeterministicCyclic(_)),
                })
            }
        }
    }
}

impl Block for BinarySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &[]
    }

    fn outputs(&self) -> &[SignalId] {
        &self.output
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        if !(self.bit_period.is_finite() && self.bit_period > 0.0) {
            return Err(Error::configuration(
                &self.name,
                "bit_period",
                format!("{} is not a positive period", self.bit_period),
            ));
        }
        let [output] = self.output;
        let kind = ctx.signals()[output].sample_kind();
        if kind != SampleKind::Binary {
            return Err(Error::configuration(
                &self.name,
                "output",
                format!("expected binary, got {kind}"),
            ));
        }
        self.state = self.build_state()?;
        self.produced = 0;

        let out = &mut ctx.signals_mut()[output];
        out.set_sampling_period(self.bit_period);
        out.set_symbol_period(self.bit_period);
        tracing::debug!(
            block = %self.name,
            mode = ?self.mode,
            bits = self.number_of_bits,
            "binary source ready"
        );
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let out = &mut signals[self.output[0]];
        let remaining = self.number_of_bits - self.produced;
        let n = (out.available_to_write() as u64).min(remaining);
        for _ in 0..n {
            out.put(self.state.next_bit())?;
        }
        self.produced += n;
        Ok(n > 0)
    }

    fn terminate(&mut self, _signals: &mut SignalBank) {
        self.state = BitState::Idle;
    }
}

/// Emits a fixed list of samples once.
///
/// Every sample must match the output's kind; this is checked at initialize.
#[derive(Debug, Clone)]
pub struct VectorSource {
    name: String,
    output: [SignalId; 1],
    samples: Vec<Sample>,
    pos: usize,
}

impl VectorSource {
    /// Creates a source emitting `samples` on `output`.
    pub fn new(output: SignalId, samples: Vec<Sample>) -> Self {
        Self {
            name: "vector_source".to_string(),
            output: [output],
            samples,
            pos: 0,
        }
    }

    /// Creates a source from typed values.
    pub fn from_values<T: netplus_core::SampleValue>(output: SignalId, values: &[T]) -> Self {
        Self::new(output, values.iter().map(|v| v.into_sample()).collect())
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Block for VectorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &[]
    }

    fn outputs(&self) -> &[SignalId] {
        &self.output
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        let kind = ctx.signals()[self.output[0]].sample_kind();
        if let Some((idx, sample)) = self
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.kind() != kind)
        {
            return Err(Error::configuration(
                &self.name,
                "samples",
                format!("sample {idx} is {}, output holds {kind}", sample.kind()),
            ));
        }
        self.pos = 0;
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let out = &mut signals[self.output[0]];
        let n = out.available_to_write().min(self.samples.len() - self.pos);
        for sample in &self.samples[self.pos..self.pos + n] {
            out.put_sample(*sample)?;
        }
        self.pos += n;
        Ok(n > 0)
    }
}

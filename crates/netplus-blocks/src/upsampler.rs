//! Zero-insertion upsampling.

use netplus_core::{
    Block, Complex64, Error, InitContext, Result, Sample, SampleKind, SignalBank, SignalId,
};

fn zero(kind: SampleKind) -> Sample {
    match kind {
        SampleKind::Binary => Sample::Binary(0),
        SampleKind::Integer => Sample::Integer(0),
        SampleKind::Real => Sample::Real(0.0),
        SampleKind::Complex => Sample::Complex(Complex64::new(0.0, 0.0)),
    }
}

/// Raises the sampling rate by an integer factor.
///
/// Every input sample is followed by `factor - 1` zeros, so the symbol
/// period is unchanged and the sampling period shrinks by `factor`. Follow
/// it with an interpolating filter such as [`raised_cosine`](crate::raised_cosine)
/// taps to get a pulse-shaped signal.
#[derive(Debug, Clone)]
pub struct Upsampler {
    name: String,
    input: [SignalId; 1],
    output: [SignalId; 1],
    factor: usize,
    zero: Sample,
    pending_zeros: usize,
}

impl Upsampler {
    /// Creates an upsampler from `input` to `output` by `factor`.
    pub fn new(input: SignalId, output: SignalId, factor: usize) -> Self {
        Self {
            name: "upsampler".to_string(),
            input: [input],
            output: [output],
            factor,
            zero: Sample::Real(0.0),
            pending_zeros: 0,
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Upsampling factor.
    pub fn factor(&self) -> usize {
        self.factor
    }
}

impl Block for Upsampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &self.input
    }

    fn outputs(&self) -> &[SignalId] {
        &self.output
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        if self.factor == 0 {
            return Err(Error::configuration(&self.name, "factor", "must be at least 1"));
        }
        let [input] = self.input;
        let [output] = self.output;
        let signals = ctx.signals();
        let kind = signals[input].sample_kind();
        let out_kind = signals[output].sample_kind();
        if kind != out_kind {
            return Err(Error::configuration(
                &self.name,
                "output",
                format!("expected {kind} to match {input}, {output} is {out_kind}"),
            ));
        }
        self.zero = zero(kind);

        let mut timing = signals[input].timing();
        timing.set_sampling_period(timing.sampling_period() / self.factor as f64);
        ctx.signals_mut()[output].set_timing(timing);
        tracing::debug!(block = %self.name, factor = self.factor, "upsampler configured");
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let [input] = self.input;
        let [output] = self.output;
        let mut did_work = false;
        loop {
            while self.pending_zeros > 0 && signals[output].available_to_write() > 0 {
                signals[output].put_sample(self.zero)?;
                self.pending_zeros -= 1;
                did_work = true;
            }
            if self.pending_zeros > 0
                || signals[input].available_to_read() == 0
                || signals[output].available_to_write() == 0
            {
                return Ok(did_work);
            }
            let sample = signals[input].get_sample()?;
            signals[output].put_sample(sample)?;
            self.pending_zeros = self.factor - 1;
            did_work = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netplus_core::{Continuity, SampleBuffer, SignalType};

    fn real(capacity: usize) -> SampleBuffer {
        SampleBuffer::new(SignalType::time_discrete_real(Continuity::Continuous), capacity)
    }

    fn init(block: &mut Upsampler, bank: &mut SignalBank) -> Result<()> {
        let mut ctx = InitContext::new(bank, std::path::Path::new("."));
        block.initialize(&mut ctx)
    }

    #[test]
    fn inserts_zeros_across_small_buffers() {
        let mut bank = SignalBank::new();
        let x = bank.add(real(4).with_sampling_period(1.0).with_symbol_period(1.0));
        let y = bank.add(real(2));
        let mut up = Upsampler::new(x, y, 3);
        init(&mut up, &mut bank).unwrap();
        bank[x].put(1.0f64).unwrap();
        bank[x].put(2.0f64).unwrap();

        let mut out = Vec::new();
        while up.run(&mut bank).unwrap() {
            while let Ok(v) = bank[y].get::<f64>() {
                out.push(v);
            }
        }
        assert_eq!(out, vec![1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(bank[y].sampling_period(), 1.0 / 3.0);
        assert_eq!(bank[y].symbol_period(), 1.0);
        assert!((bank[y].samples_per_symbol() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn factor_one_is_identity() {
        let mut bank = SignalBank::new();
        let x = bank.add(SampleBuffer::new(SignalType::integer(), 4));
        let y = bank.add(SampleBuffer::new(SignalType::integer(), 4));
        let mut up = Upsampler::new(x, y, 1);
        init(&mut up, &mut bank).unwrap();
        bank[x].put(7i32).unwrap();
        assert!(up.run(&mut bank).unwrap());
        assert_eq!(bank[y].drain_samples(), vec![Sample::Integer(7)]);
    }

    #[test]
    fn rejects_zero_factor_and_kind_mismatch() {
        let mut bank = SignalBank::new();
        let x = bank.add(real(4));
        let y = bank.add(SampleBuffer::new(SignalType::integer(), 4));
        let err = init(&mut Upsampler::new(x, x, 0), &mut bank).unwrap_err();
        assert!(err.is_configuration());
        let err = init(&mut Upsampler::new(x, y, 2), &mut bank).unwrap_err();
        assert!(err.is_configuration());
    }
}

//! Conversions between complex signals and their real I/Q components.

use netplus_core::{
    Block, Complex64, Error, InitContext, Result, SampleKind, SignalBank, SignalId,
};

fn expect_kind(
    block: &str,
    signals: &SignalBank,
    id: SignalId,
    port: &str,
    kind: SampleKind,
) -> Result<()> {
    let found = signals[id].sample_kind();
    if found == kind {
        Ok(())
    } else {
        Err(Error::configuration(
            block,
            port,
            format!("expected {kind}, {id} is {found}"),
        ))
    }
}

/// Joins an in-phase and a quadrature real signal into one complex signal.
///
/// Output timing copies the in-phase input.
#[derive(Debug, Clone)]
pub struct RealToComplex {
    name: String,
    inputs: [SignalId; 2],
    output: [SignalId; 1],
}

impl RealToComplex {
    /// Creates a converter from `(in_phase, quadrature)` to `output`.
    pub fn new(in_phase: SignalId, quadrature: SignalId, output: SignalId) -> Self {
        Self {
            name: "real_to_complex".to_string(),
            inputs: [in_phase, quadrature],
            output: [output],
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Block for RealToComplex {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &self.inputs
    }

    fn outputs(&self) -> &[SignalId] {
        &self.output
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        let [in_phase, quadrature] = self.inputs;
        let [output] = self.output;
        let signals = ctx.signals();
        expect_kind(&self.name, signals, in_phase, "in_phase", SampleKind::Real)?;
        expect_kind(&self.name, signals, quadrature, "quadrature", SampleKind::Real)?;
        expect_kind(&self.name, signals, output, "output", SampleKind::Complex)?;
        let timing = signals[in_phase].timing();
        ctx.signals_mut()[output].set_timing(timing);
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let [in_phase, quadrature] = self.inputs;
        let [output] = self.output;
        let n = signals[in_phase]
            .available_to_read()
            .min(signals[quadrature].available_to_read())
            .min(signals[output].available_to_write());
        for _ in 0..n {
            let re: f64 = signals[in_phase].get()?;
            let im: f64 = signals[quadrature].get()?;
            signals[output].put(Complex64::new(re, im))?;
        }
        Ok(n > 0)
    }
}

/// Splits a complex signal into its in-phase and quadrature real parts.
///
/// Both outputs copy the input timing.
#[derive(Debug, Clone)]
pub struct ComplexToReal {
    name: String,
    input: [SignalId; 1],
    outputs: [SignalId; 2],
}

impl ComplexToReal {
    /// Creates a converter from `input` to `(in_phase, quadrature)`.
    pub fn new(input: SignalId, in_phase: SignalId, quadrature: SignalId) -> Self {
        Self {
            name: "complex_to_real".to_string(),
            input: [input],
            outputs: [in_phase, quadrature],
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Block for ComplexToReal {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &self.input
    }

    fn outputs(&self) -> &[SignalId] {
        &self.outputs
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        let [input] = self.input;
        let [in_phase, quadrature] = self.outputs;
        let signals = ctx.signals();
        expect_kind(&self.name, signals, input, "input", SampleKind::Complex)?;
        expect_kind(&self.name, signals, in_phase, "in_phase", SampleKind::Real)?;
        expect_kind(&self.name, signals, quadrature, "quadrature", SampleKind::Real)?;
        let timing = signals[input].timing();
        ctx.signals_mut()[in_phase].set_timing(timing);
        ctx.signals_mut()[quadrature].set_timing(timing);
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let [input] = self.input;
        let [in_phase, quadrature] = self.outputs;
        let n = signals[input]
            .available_to_read()
            .min(signals[in_phase].available_to_write())
            .min(signals[quadrature].available_to_write());
        for _ in 0..n {
            let z: Complex64 = signals[input].get()?;
            signals[in_phase].put(z.re)?;
            signals[quadrature].put(z.im)?;
        }
        Ok(n > 0)
    }
}

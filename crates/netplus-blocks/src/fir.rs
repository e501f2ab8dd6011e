//! Streaming FIR filter and pulse-shaping taps.

use std::f64::consts::PI;
use std::fmt::Write as _;

use netplus_core::{
    Block, Error, InitContext, Result, SampleKind, SignalBank, SignalId, resolve_signal_path,
};

/// Default name of the impulse response artifact.
pub const IMPULSE_RESPONSE_FILE: &str = "impulse_response.imp";

/// Finite impulse response filter over a real signal.
///
/// Produces exactly one output per input:
/// `y[n] = sum(h[k] * x[n - k])` for `k` in `0..h.len()`, with samples before
/// the start of the stream taken as zero. The delay line holds the last
/// `h.len() - 1` inputs.
///
/// The output inherits the input's timing. Optionally the taps are written
/// to a text file (one tap per line) in the signals folder once the system
/// has initialized.
///
/// By default the whole impulse response is seen, so a symmetric filter
/// delays the stream by `order() / 2` samples. With
/// [`with_see_beginning_of_impulse_response(false)`](Self::with_see_beginning_of_impulse_response)
/// the first `order() / 2` outputs are dropped and, once the input ends,
/// as many zeros are pushed through the filter, so the output stays aligned
/// with the input and keeps the same length.
///
/// # Example
///
/// ```rust
/// use netplus_blocks::FirFilter;
/// use netplus_core::{Continuity, SampleBuffer, SignalType, System};
///
/// let real = SignalType::time_discrete_real(Continuity::Continuous);
/// let mut system = System::new();
/// let x = system.add_signal(SampleBuffer::new(real, 16));
/// let y = system.add_signal(SampleBuffer::new(real, 16));
/// let fir = FirFilter::new(x, y, vec![1.0, 0.5]);
/// assert_eq!(fir.order(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FirFilter {
    name: String,
    input: [SignalId; 1],
    output: [SignalId; 1],
    impulse_response: Vec<f64>,
    delay_line: Vec<f64>,
    write_pos: usize,
    save_impulse_response: bool,
    impulse_response_file: String,
    see_beginning: bool,
    to_skip: usize,
    tail: usize,
}

impl FirFilter {
    /// Creates a filter from `input` to `output` with the given taps.
    pub fn new(input: SignalId, output: SignalId, impulse_response: Vec<f64>) -> Self {
        Self {
            name: "fir_filter".to_string(),
            input: [input],
            output: [output],
            impulse_response,
            delay_line: Vec::new(),
            write_pos: 0,
            save_impulse_response: false,
            impulse_response_file: IMPULSE_RESPONSE_FILE.to_string(),
            see_beginning: true,
            to_skip: 0,
            tail: 0,
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Writes the taps to the signals folder at initialize.
    pub fn with_impulse_response_saved(mut self, save: bool) -> Self {
        self.save_impulse_response = save;
        self
    }

    /// Sets the impulse response artifact name and enables saving it.
    pub fn with_impulse_response_file(mut self, file_name: impl Into<String>) -> Self {
        self.impulse_response_file = file_name.into();
        self.save_impulse_response = true;
        self
    }

    /// Whether the leading `order() / 2` outputs are kept (the default) or
    /// dropped to compensate the group delay of a symmetric filter.
    pub fn with_see_beginning_of_impulse_response(mut self, see: bool) -> Self {
        self.see_beginning = see;
        self
    }

    /// Outputs dropped at the start of the stream.
    pub fn lead_in(&self) -> usize {
        if self.see_beginning { 0 } else { self.order() / 2 }
    }

    /// The filter taps.
    pub fn impulse_response(&self) -> &[f64] {
        &self.impulse_response
    }

    /// Filter order (number of delays).
    pub fn order(&self) -> usize {
        self.impulse_response.len().saturating_sub(1)
    }

    fn check_kind(&self, signals: &SignalBank, id: SignalId, port: &str) -> Result<()> {
        let kind = signals[id].sample_kind();
        if kind == SampleKind::Real {
            Ok(())
        } else {
            Err(Error::configuration(
                &self.name,
                port,
                format!("expected a real signal, {id} is {kind}"),
            ))
        }
    }

    fn queue_impulse_response(&self, ctx: &mut InitContext<'_>) -> Result<()> {
        let path = resolve_signal_path(ctx.signals_folder(), &self.impulse_response_file)
            .map_err(|reason| Error::configuration(&self.name, "impulse_response_file", reason))?;
        let mut text = String::with_capacity(self.impulse_response.len() * 24);
        for tap in &self.impulse_response {
            let _ = writeln!(text, "{tap}");
        }
        tracing::debug!(block = %self.name, path = %path.display(), "impulse response queued");
        ctx.queue_artifact(path, text);
        Ok(())
    }

    /// Feeds `x` through the filter, writing the result unless it belongs to
    /// the dropped lead-in. The caller checks there is room for the output.
    fn push(&mut self, x: f64, signals: &mut SignalBank) -> Result<()> {
        let y = self.process(x);
        if self.to_skip > 0 {
            self.to_skip -= 1;
            Ok(())
        } else {
            signals[self.output[0]].put(y)
        }
    }

    /// Filters one sample.
    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let mut acc = self.impulse_response[0] * x;
        let len = self.delay_line.len();
        if len == 0 {
            return acc;
        }
        let mut idx = self.write_pos;
        for &tap in &self.impulse_response[1..] {
            idx = if idx == 0 { len - 1 } else { idx - 1 };
            acc += tap * self.delay_line[idx];
        }
        self.delay_line[self.write_pos] = x;
        self.write_pos = (self.write_pos + 1) % len;
        acc
    }
}

impl Block for FirFilter {
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
        if self.impulse_response.is_empty() {
            return Err(Error::configuration(
                &self.name,
                "impulse_response",
                "at least one tap is required",
            ));
        }
        if let Some(tap) = self.impulse_response.iter().find(|t| !t.is_finite()) {
            return Err(Error::configuration(
                &self.name,
                "impulse_response",
                format!("tap {tap} is not finite"),
            ));
        }
        let [input] = self.input;
        let [output] = self.output;
        self.check_kind(ctx.signals(), input, "input")?;
        self.check_kind(ctx.signals(), output, "output")?;

        self.delay_line = vec![0.0; self.order()];
        self.write_pos = 0;
        self.to_skip = self.lead_in();
        self.tail = self.lead_in();

        let timing = ctx.signals()[input].timing();
        ctx.signals_mut()[output].set_timing(timing);

        if self.save_impulse_response {
            self.queue_impulse_response(ctx)?;
        }
        tracing::debug!(block = %self.name, taps = self.impulse_response.len(), "fir filter ready");
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let [input] = self.input;
        let [output] = self.output;
        let mut consumed = 0;
        while signals[input].available_to_read() > 0
            && (self.to_skip > 0 || signals[output].available_to_write() > 0)
        {
            let x: f64 = signals[input].get()?;
            self.push(x, signals)?;
            consumed += 1;
        }
        Ok(consumed > 0)
    }

    fn flush(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let [output] = self.output;
        let mut fed = 0;
        while self.tail > 0 && (self.to_skip > 0 || signals[output].available_to_write() > 0) {
            self.push(0.0, signals)?;
            self.tail -= 1;
            fed += 1;
        }
        Ok(fed > 0)
    }

    fn terminate(&mut self, _signals: &mut SignalBank) {
        self.delay_line.iter_mut().for_each(|s| *s = 0.0);
        self.write_pos = 0;
        self.to_skip = 0;
        self.tail = 0;
    }
}

/// Raised-cosine pulse sampled at `samples_per_symbol` over `span_symbols`
/// symbol periods.
///
/// Returns `span_symbols * samples_per_symbol + 1` taps centred on the
/// peak, which is 1. Taps at nonzero multiples of the symbol period are 0.
/// `rolloff` is the excess bandwidth factor in `[0, 1]`.
pub fn raised_cosine(rolloff: f64, samples_per_symbol: usize, span_symbols: usize) -> Vec<f64> {
    let len = span_symbols * samples_per_symbol + 1;
    let center = (len / 2) as f64;
    let sps = samples_per_symbol.max(1) as f64;
    (0..len)
        .map(|i| {
            let t = (i as f64 - center) / sps;
            raised_cosine_at(rolloff, t)
        })
        .collect()
}

/// Raised-cosine impulse response at `t` symbol periods from the peak.
fn raised_cosine_at(rolloff: f64, t: f64) -> f64 {
    let denom = 1.0 - (2.0 * rolloff * t).powi(2);
    if denom.abs() < 1e-12 {
        // Limit at t = +-1/(2 rolloff).
        return PI / 4.0 * sinc(1.0 / (2.0 * rolloff));
    }
    sinc(t) * (PI * rolloff * t).cos() / denom
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

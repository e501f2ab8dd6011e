//! M-QAM symbol mapper.

use netplus_core::{
    Block, Complex64, Error, InitContext, Result, SampleKind, SignalBank, SignalId,
};

/// Maps groups of bits to complex constellation points.
///
/// Each symbol consumes `n = log2(M)` bits, most significant bit first, and
/// emits `constellation[index]`. Bits of an incomplete symbol are kept
/// between runs, so symbol boundaries do not depend on how input arrives.
/// Bits of a symbol still incomplete when the stream ends are dropped.
///
/// The output symbol period is `n` times the input's; the output carries one
/// sample per symbol.
///
/// Without an explicit table, `M = 4` uses `{(1,1), (-1,1), (1,-1), (-1,-1)}`,
/// other square orders use the natural-order square grid with levels
/// `±1, ±3, ...`, and `M = 2` uses `{1, -1}`.
///
/// ## Parameters
///
/// | Name | Domain | Default |
/// |------|--------|---------|
/// | `m` | power of two, >= 2 | 4 |
/// | `constellation` | `m` points | see above |
#[derive(Debug, Clone)]
pub struct QamMapper {
    name: String,
    input: [SignalId; 1],
    output: [SignalId; 1],
    m: u32,
    constellation: Option<Vec<Complex64>>,
    table: Vec<Complex64>,
    bits_per_symbol: u32,
    pending_value: usize,
    pending_bits: u32,
}

impl QamMapper {
    /// Creates a 4-QAM mapper from a binary `input` to a complex `output`.
    pub fn new(input: SignalId, output: SignalId) -> Self {
        Self {
            name: "qam_mapper".to_string(),
            input: [input],
            output: [output],
            m: 4,
            constellation: None,
            table: Vec::new(),
            bits_per_symbol: 0,
            pending_value: 0,
            pending_bits: 0,
        }
    }

    /// Sets the block name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the modulation order. Validated at initialize.
    pub fn with_order(mut self, m: u32) -> Self {
        self.m = m;
        self
    }

    /// Sets an explicit constellation, indexed by symbol value.
    pub fn with_constellation(mut self, points: Vec<Complex64>) -> Self {
        self.constellation = Some(points);
        self
    }

    /// Modulation order.
    pub fn order(&self) -> u32 {
        self.m
    }

    /// Constellation in use. Empty before initialize.
    pub fn table(&self) -> &[Complex64] {
        &self.table
    }

    fn config_error(&self, parameter: &str, reason: impl Into<String>) -> Error {
        Error::configuration(&self.name, parameter, reason)
    }
}

/// Default constellation for order `m`, if there is one.
pub fn default_constellation(m: u32) -> Option<Vec<Complex64>> {
    if m == 2 {
        return Some(vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)]);
    }
    if m < 4 || !m.is_power_of_two() || m.trailing_zeros() % 2 != 0 {
        return None;
    }
    let side = 1usize << (m.trailing_zeros() / 2);
    let level = |j: usize| (side - 1) as f64 - 2.0 * j as f64;
    Some(
        (0..m as usize)
            .map(|idx| Complex64::new(level(idx % side), level(idx / side)))
            .collect(),
    )
}

impl Block for QamMapper {
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
        if self.m < 2 || !self.m.is_power_of_two() {
            return Err(self.config_error(
                "m",
                format!("{} is not a power of two >= 2", self.m),
            ));
        }
        let table = match &self.constellation {
            Some(points) => points.clone(),
            None => default_constellation(self.m).ok_or_else(|| {
                self.config_error(
                    "constellation",
                    format!("no default constellation for M = {}", self.m),
                )
            })?,
        };
        if table.len() != self.m as usize {
            return Err(self.config_error(
                "constellation",
                format!("{} points given for M = {}", table.len(), self.m),
            ));
        }

        let [input] = self.input;
        let [output] = self.output;
        let input_kind = ctx.signals()[input].sample_kind();
        if input_kind != SampleKind::Binary {
            return Err(self.config_error("input", format!("expected binary, got {input_kind}")));
        }
        let output_kind = ctx.signals()[output].sample_kind();
        if output_kind != SampleKind::Complex {
            return Err(self.config_error("output", format!("expected complex, got {output_kind}")));
        }

        self.table = table;
        self.bits_per_symbol = self.m.trailing_zeros();
        self.pending_value = 0;
        self.pending_bits = 0;

        let mut timing = ctx.signals()[input].timing();
        let symbol_period = f64::from(self.bits_per_symbol) * timing.symbol_period();
        timing.set_sampling_period(symbol_period);
        timing.set_symbol_period(symbol_period);
        ctx.signals_mut()[output].set_timing(timing);

        tracing::debug!(
            block = %self.name,
            m = self.m,
            bits_per_symbol = self.bits_per_symbol,
            "qam mapper ready"
        );
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let [input] = self.input;
        let [output] = self.output;
        let mut progressed = false;
        while signals[input].available_to_read() > 0 {
            let completes = self.pending_bits + 1 == self.bits_per_symbol;
            if completes && signals[output].available_to_write() == 0 {
                break;
            }
            let bit: u8 = signals[input].get()?;
            progressed = true;
            self.pending_value = (self.pending_value << 1) | usize::from(bit != 0);
            self.pending_bits += 1;
            if completes {
                signals[output].put(self.table[self.pending_value])?;
                self.pending_value = 0;
                self.pending_bits = 0;
            }
        }
        Ok(progressed)
    }

    fn terminate(&mut self, _signals: &mut SignalBank) {
        if self.pending_bits > 0 {
            tracing::debug!(
                block = %self.name,
                bits = self.pending_bits,
                "dropping bits of an incomplete symbol"
            );
        }
        self.pending_value = 0;
        self.pending_bits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netplus_core::{Continuity, SampleBuffer, SignalType};
    use std::path::Path;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    struct Rig {
        bank: SignalBank,
        bits: SignalId,
        symbols: SignalId,
    }

    fn rig(capacity: usize) -> Rig {
        let mut bank = SignalBank::new();
        let bits = bank.add(SampleBuffer::new(SignalType::binary(), capacity).with_symbol_period(1e-9));
        let symbols = bank.add(SampleBuffer::new(
            SignalType::time_discrete_complex(Continuity::Discrete),
            capacity,
        ));
        Rig {
            bank,
            bits,
            symbols,
        }
    }

    fn init(mapper: &mut QamMapper, bank: &mut SignalBank) -> Result<()> {
        mapper.initialize(&mut InitContext::new(bank, Path::new(".")))
    }

    fn drain(bank: &mut SignalBank, id: SignalId) -> Vec<Complex64> {
        let mut out = Vec::new();
        while bank[id].available_to_read() > 0 {
            out.push(bank[id].get().unwrap());
        }
        out
    }

    #[test]
    fn qpsk_default_table() {
        let mut r = rig(8);
        let mut mapper = QamMapper::new(r.bits, r.symbols);
        init(&mut mapper, &mut r.bank).unwrap();
        for bit in [0u8, 0, 1, 1] {
            r.bank[r.bits].put(bit).unwrap();
        }
        assert!(mapper.run(&mut r.bank).unwrap());
        assert_eq!(drain(&mut r.bank, r.symbols), vec![c(1.0, 1.0), c(-1.0, -1.0)]);
    }

    #[test]
    fn msb_first() {
        let mut r = rig(8);
        let mut mapper = QamMapper::new(r.bits, r.symbols);
        init(&mut mapper, &mut r.bank).unwrap();
        for bit in [0u8, 1, 1, 0] {
            r.bank[r.bits].put(bit).unwrap();
        }
        mapper.run(&mut r.bank).unwrap();
        assert_eq!(drain(&mut r.bank, r.symbols), vec![c(-1.0, 1.0), c(1.0, -1.0)]);
    }

    #[test]
    fn partial_symbol_carries_over() {
        let mut r = rig(8);
        let mut mapper = QamMapper::new(r.bits, r.symbols);
        init(&mut mapper, &mut r.bank).unwrap();

        r.bank[r.bits].put(1u8).unwrap();
        assert!(mapper.run(&mut r.bank).unwrap());
        assert!(r.bank[r.symbols].is_empty());

        r.bank[r.bits].put(1u8).unwrap();
        r.bank[r.bits].put(0u8).unwrap();
        mapper.run(&mut r.bank).unwrap();
        assert_eq!(drain(&mut r.bank, r.symbols), vec![c(-1.0, -1.0)]);
        assert!(!mapper.run(&mut r.bank).unwrap());
    }

    #[test]
    fn full_output_holds_the_completing_bit() {
        let mut r = rig(2);
        let mut mapper = QamMapper::new(r.bits, r.symbols);
        init(&mut mapper, &mut r.bank).unwrap();
        r.bank[r.symbols].put(c(0.0, 0.0)).unwrap();
        r.bank[r.symbols].put(c(0.0, 0.0)).unwrap();

        r.bank[r.bits].put(0u8).unwrap();
        r.bank[r.bits].put(1u8).unwrap();
        // First bit is consumed, the second would complete a symbol with no room.
        assert!(mapper.run(&mut r.bank).unwrap());
        assert_eq!(r.bank[r.bits].available_to_read(), 1);
        assert!(!mapper.run(&mut r.bank).unwrap());

        drain(&mut r.bank, r.symbols);
        assert!(mapper.run(&mut r.bank).unwrap());
        assert_eq!(drain(&mut r.bank, r.symbols), vec![c(-1.0, 1.0)]);
    }

    #[test]
    fn output_timing() {
        let mut r = rig(2);
        let mut mapper = QamMapper::new(r.bits, r.symbols).with_order(16);
        init(&mut mapper, &mut r.bank).unwrap();
        let out = &r.bank[r.symbols];
        assert!((out.symbol_period() - 4e-9).abs() < 1e-21);
        assert_eq!(out.sampling_period(), out.symbol_period());
        assert_eq!(out.samples_per_symbol(), 1.0);
    }

    #[test]
    fn sixteen_qam_grid() {
        let table = default_constellation(16).unwrap();
        assert_eq!(table.len(), 16);
        assert_eq!(table[0], c(3.0, 3.0));
        assert_eq!(table[3], c(-3.0, 3.0));
        assert_eq!(table[15], c(-3.0, -3.0));
        assert_eq!(default_constellation(4).unwrap(), vec![
            c(1.0, 1.0),
            c(-1.0, 1.0),
            c(1.0, -1.0),
            c(-1.0, -1.0)
        ]);
        assert!(default_constellation(8).is_none());
    }

    #[test]
    fn invalid_orders_rejected() {
        for m in [0, 1, 6, 12] {
            let mut r = rig(2);
            let mut mapper = QamMapper::new(r.bits, r.symbols).with_order(m);
            let err = init(&mut mapper, &mut r.bank).unwrap_err();
            assert!(
                matches!(err, Error::Configuration { ref parameter, .. } if parameter == "m"),
                "M = {m}: {err}"
            );
        }
    }

    #[test]
    fn table_size_must_match_order() {
        let mut r = rig(2);
        let mut mapper = QamMapper::new(r.bits, r.symbols)
            .with_order(8)
            .with_constellation(vec![c(1.0, 0.0); 4]);
        let err = init(&mut mapper, &mut r.bank).unwrap_err();
        assert!(matches!(err, Error::Configuration { ref parameter, .. } if parameter == "constellation"));
    }

    #[test]
    fn eight_points_accepted_when_given() {
        let mut r = rig(4);
        let points: Vec<Complex64> = (0..8).map(|k| c(f64::from(k), 0.0)).collect();
        let mut mapper = QamMapper::new(r.bits, r.symbols)
            .with_order(8)
            .with_constellation(points);
        init(&mut mapper, &mut r.bank).unwrap();
        for bit in [1u8, 0, 1] {
            r.bank[r.bits].put(bit).unwrap();
        }
        mapper.run(&mut r.bank).unwrap();
        assert_eq!(drain(&mut r.bank, r.symbols), vec![c(5.0, 0.0)]);
    }
}

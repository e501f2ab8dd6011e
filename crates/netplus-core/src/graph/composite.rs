//! Blocks made of blocks.

use crate::error::Result;

use super::bank::{SignalBank, SignalId};
use super::block::{Block, InitContext};
use super::topology;

/// A block that groups child blocks behind its own ports.
///
/// Signals between children live in the system's bank like any other signal
/// but are not part of the composite's declared ports. Children run in the
/// dependency order of their own ports, so a composite behaves exactly like
/// its children wired directly into the enclosing system.
///
/// # Example
///
/// ```rust,ignore
/// let shaper = CompositeBlock::new("pulse_shaper", vec![symbols], vec![shaped], vec![
///     Box::new(ComplexToReal::new(symbols, i, q)),
///     Box::new(FirFilter::new(i, i_shaped, taps.clone())),
///     Box::new(FirFilter::new(q, q_shaped, taps)),
///     Box::new(RealToComplex::new(i_shaped, q_shaped, shaped)),
/// ])
/// .with_internal_signals_saved(true);
/// ```
pub struct CompositeBlock {
    name: String,
    inputs: Vec<SignalId>,
    outputs: Vec<SignalId>,
    children: Vec<Box<dyn Block>>,
    order: Vec<usize>,
    save_internal: bool,
}

impl CompositeBlock {
    /// Creates a composite exposing `inputs` and `outputs` around `children`.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<SignalId>,
        outputs: Vec<SignalId>,
        children: Vec<Box<dyn Block>>,
    ) -> Self {
        let order = (0..children.len()).collect();
        Self {
            name: name.into(),
            inputs,
            outputs,
            children,
            order,
            save_internal: false,
        }
    }

    /// See [`save_internal_signals`](Self::save_internal_signals).
    pub fn with_internal_signals_saved(mut self, save: bool) -> Self {
        self.save_internal_signals(save);
        self
    }

    /// Also persists signals produced by children that are not outputs of
    /// the composite. Diagnostic only; results are unchanged.
    pub fn save_internal_signals(&mut self, save: bool) {
        self.save_internal = save;
    }

    /// Signals produced by children that the composite does not expose.
    pub fn internal_signals(&self) -> Vec<SignalId> {
        self.children
            .iter()
            .flat_map(|c| c.outputs())
            .copied()
            .filter(|s| !self.outputs.contains(s))
            .collect()
    }

    /// The child blocks, in the order they were given.
    pub fn children(&self) -> &[Box<dyn Block>] {
        &self.children
    }
}

impl Block for CompositeBlock {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[SignalId] {
        &self.inputs
    }

    fn outputs(&self) -> &[SignalId] {
        &self.outputs
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        self.order = topology::dependency_order(&self.children, ctx.signals())?;
        if self.save_internal {
            for signal in self.internal_signals() {
                ctx.signals_mut()[signal].set_save(true);
            }
        }
        for &idx in &self.order {
            self.children[idx].initialize(ctx)?;
        }
        tracing::debug!(
            block = %self.name,
            children = self.children.len(),
            save_internal = self.save_internal,
            "composite initialized"
        );
        Ok(())
    }

    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let mut progressed = false;
        for &idx in &self.order {
            let child = &mut self.children[idx];
            progressed |= child.run(signals).map_err(|e| e.in_block(child.name()))?;
        }
        Ok(progressed)
    }

    fn flush(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let mut progressed = false;
        for &idx in &self.order {
            let child = &mut self.children[idx];
            progressed |= child.flush(signals).map_err(|e| e.in_block(child.name()))?;
        }
        Ok(progressed)
    }

    fn terminate(&mut self, signals: &mut SignalBank) {
        for &idx in self.order.iter().rev() {
            self.children[idx].terminate(signals);
        }
    }
}

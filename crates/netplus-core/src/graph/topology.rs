//! Dependency ordering of blocks from their declared signal ports.
//!
//! A block depends on the producer of each of its inputs. The order is a
//! FIFO Kahn sort seeded in declaration order, so among blocks that are
//! ready at the same time the one added first runs first.

use std::collections::VecDeque;

use crate::error::{Error, Result};

use super::bank::{SignalBank, SignalId};
use super::block::Block;

/// Checks that every port of every block refers to a signal in `signals`.
pub fn validate_ports<B: Block>(blocks: &[B], signals: &SignalBank) -> Result<()> {
    for block in blocks {
        for &signal in block.inputs().iter().chain(block.outputs()) {
            if !signals.contains(signal) {
                return Err(Error::UnknownSignal {
                    block: block.name().to_string(),
                    signal,
                });
            }
        }
    }
    Ok(())
}

/// Returns block indices in dependency order.
///
/// Validates ports first. Fails with [`Error::Cycle`] naming the blocks that
/// could not be ordered.
pub fn dependency_order<B: Block>(blocks: &[B], signals: &SignalBank) -> Result<Vec<usize>> {
    validate_ports(blocks, signals)?;

    let mut producer: Vec<Option<usize>> = vec![None; signals.len()];
    for (idx, block) in blocks.iter().enumerate() {
        for &signal in block.outputs() {
            let previous = producer[signal.index() as usize].replace(idx);
            if let Some(previous) = previous {
                tracing::warn!(
                    %signal,
                    first = blocks[previous].name(),
                    second = block.name(),
                    "signal has more than one producer"
                );
            }
            debug_assert!(
                previous.is_none(),
                "signal {signal} has more than one producer"
            );
        }
    }

    let n = blocks.len();
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (idx, block) in blocks.iter().enumerate() {
        for signal in block.inputs() {
            if let Some(from) = producer[signal.index() as usize] {
                dependents[from].push(idx);
                in_degree[idx] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut sorted = Vec::with_capacity(n);
    while let Some(idx) = queue.pop_front() {
        sorted.push(idx);
        for &to in &dependents[idx] {
            in_degree[to] -= 1;
            if in_degree[to] == 0 {
                queue.push_back(to);
            }
        }
    }

    if sorted.len() != n {
        let blocks = (0..n)
            .filter(|&i| in_degree[i] > 0)
            .map(|i| blocks[i].name().to_string())
            .collect();
        return Err(Error::Cycle { blocks });
    }
    Ok(sorted)
}

/// Signals produced by some block in `blocks` that no block consumes.
pub fn dangling_outputs<B: Block>(blocks: &[B]) -> Vec<SignalId> {
    let consumed: Vec<SignalId> = blocks.iter().flat_map(|b| b.inputs()).copied().collect();
    blocks
        .iter()
        .flat_map(|b| b.outputs())
        .copied()
        .filter(|s| !consumed.contains(s))
        .collect()
}

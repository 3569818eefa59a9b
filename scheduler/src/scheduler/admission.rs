use super::process::{Process, Tick};
use std::collections::BTreeMap;

/// Processes still waiting to be admitted, grouped by arrival tick.
///
/// Within a tick, indices keep the engine's admission order
/// (arrival time, then service time).
#[derive(Debug, Clone, Default)]
pub struct Admissions {
    pending: BTreeMap<Tick, Vec<usize>>,
}

impl Admissions {
    /// Build the table from indices into `processes`, already in admission order.
    pub fn from_order(processes: &[Process], order: &[usize]) -> Self {
        let mut pending: BTreeMap<Tick, Vec<usize>> = BTreeMap::new();
        for &index in order {
            pending
                .entry(processes[index].arrival_time())
                .or_default()
                .push(index);
        }
        Self { pending }
    }

    /// Remove and return every process arriving at `tick`.
    pub fn take(&mut self, tick: Tick) -> Vec<usize> {
        self.pending.remove(&tick).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn next_arrival(&self) -> Option<Tick> {
        self.pending.keys().next().copied()
    }
}

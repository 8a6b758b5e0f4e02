// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike record: every `(step, index)` pair emitted by every population.
//!
//! Key semantics:
//! - Ordered: pairs are appended step by step, indices ascending within a step.
//! - Complete: spike sources are recorded like any other population.

use std::collections::BTreeSet;
use std::ops::Range;

/// Append-only spike history, one list per population in creation order
#[derive(Debug, Clone, Default)]
pub struct FireLedger {
    records: Vec<Vec<(u64, usize)>>,
}

impl FireLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking the next population
    pub fn track_population(&mut self) {
        self.records.push(Vec::new());
    }

    pub fn archive_step(&mut self, population: usize, step: u64, fired: impl Iterator<Item = usize>) {
        if let Some(record) = self.records.get_mut(population) {
            record.extend(fired.map(|i| (step, i)));
        }
    }

    pub fn spikes(&self, population: usize) -> Option<&[(u64, usize)]> {
        self.records.get(population).map(Vec::as_slice)
    }

    /// Distinct indices that fired during `steps`
    pub fn fired_between(&self, population: usize, steps: Range<u64>) -> Option<BTreeSet<usize>> {
        self.records.get(population).map(|record| {
            record
                .iter()
                .filter(|(step, _)| steps.contains(step))
                .map(|&(_, i)| i)
                .collect()
        })
    }

    /// Drop all recorded spikes; populations stay tracked
    pub fn clear(&mut self) {
        for record in &mut self.records {
            record.clear();
        }
    }

    pub fn total_spikes(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_and_window() {
        let mut ledger = FireLedger::new();
        ledger.track_population();
        ledger.track_population();
        ledger.archive_step(1, 3, [0, 2].into_iter());
        ledger.archive_step(1, 8, [2, 4].into_iter());

        assert_eq!(ledger.spikes(0), Some(&[][..]));
        assert_eq!(ledger.spikes(1).unwrap(), &[(3, 0), (3, 2), (8, 2), (8, 4)]);
        assert_eq!(
            ledger.fired_between(1, 0..5).unwrap().into_iter().collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(ledger.total_spikes(), 4);
        assert!(ledger.spikes(2).is_none());
    }

    #[test]
    fn test_clear_keeps_tracking() {
        let mut ledger = FireLedger::new();
        ledger.track_population();
        ledger.archive_step(0, 1, [0].into_iter());
        ledger.clear();
        assert_eq!(ledger.total_spikes(), 0);
        assert!(ledger.spikes(0).is_some());
    }
}

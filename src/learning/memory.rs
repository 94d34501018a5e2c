use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::predictors::ComponentVotes;
use crate::regime::Regime;
use crate::signals::EnsembleWeights;

/// Hard upper bound on retained records.
pub const MEMORY_CAPACITY: usize = 1000;

// ---------------------------------------------------------------------------
// MemoryRecord
// ---------------------------------------------------------------------------

/// One generated prediction, plus the realised outcome once it is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Timestamp of the last candle the prediction was made from (ms).
    pub timestamp: i64,
    pub regime: Regime,
    pub prediction: f64,
    /// Component votes behind the prediction; their signs drive learning.
    pub votes: ComponentVotes,
    pub feature_vector: Vec<f64>,
    /// Weights in force when the prediction was made.
    pub weights: EnsembleWeights,
    #[serde(default)]
    pub outcome: Option<f64>,
}

impl MemoryRecord {
    /// |outcome - prediction|, once an outcome is recorded.
    pub fn absolute_error(&self) -> Option<f64> {
        self.outcome.map(|o| (o - self.prediction).abs())
    }

    /// Whether prediction and outcome point the same way. Both zero counts as
    /// a hit; exactly one zero does not.
    pub fn direction_hit(&self) -> Option<bool> {
        self.outcome.map(|o| sign(o) == sign(self.prediction))
    }
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
// MemoryStore -- bounded FIFO log
// ---------------------------------------------------------------------------

/// Ring of the most recent [`MEMORY_CAPACITY`] records. Pushing into a full
/// store evicts the oldest record first, so the bound is never exceeded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: VecDeque<MemoryRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(MEMORY_CAPACITY),
        }
    }

    /// Append `record`. Returns the evicted record, if any.
    pub fn record(&mut self, record: MemoryRecord) -> Option<MemoryRecord> {
        let evicted = if self.records.len() >= MEMORY_CAPACITY {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    pub fn latest(&self) -> Option<&MemoryRecord> {
        self.records.back()
    }

    pub fn latest_mut(&mut self) -> Option<&mut MemoryRecord> {
        self.records.back_mut()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Build a store from `records` (oldest first), keeping the newest
    /// [`MEMORY_CAPACITY`]. Returns the store and the number dropped.
    pub fn from_records(records: Vec<MemoryRecord>) -> (Self, usize) {
        let dropped = records.len().saturating_sub(MEMORY_CAPACITY);
        let mut store = Self::new();
        store.records.extend(records.into_iter().skip(dropped));
        (store, dropped)
    }

    /// Records as an owned vector, oldest first.
    pub fn to_vec(&self) -> Vec<MemoryRecord> {
        self.records.iter().cloned().collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record_at(timestamp: i64, prediction: f64) -> MemoryRecord {
        MemoryRecord {
            timestamp,
            regime: Regime::Ranging,
            prediction,
            votes: ComponentVotes::default(),
            feature_vector: vec![0.0; 4],
            weights: EnsembleWeights::default(),
            outcome: None,
        }
    }

    #[test]
    fn fifo_eviction_at_capacity() {
        let mut store = MemoryStore::new();
        for i in 0..MEMORY_CAPACITY as i64 {
            assert!(store.record(record_at(i, 0.0)).is_none());
        }
        let evicted = store.record(record_at(MEMORY_CAPACITY as i64, 0.0));
        assert_eq!(evicted.map(|r| r.timestamp), Some(0));
        assert_eq!(store.len(), MEMORY_CAPACITY);
        assert_eq!(store.iter().next().map(|r| r.timestamp), Some(1));
        assert_eq!(store.latest().map(|r| r.timestamp), Some(MEMORY_CAPACITY as i64));
    }

    #[test]
    fn from_records_keeps_newest() {
        let records: Vec<_> = (0..1200).map(|i| record_at(i, 0.0)).collect();
        let (store, dropped) = MemoryStore::from_records(records);
        assert_eq!(dropped, 200);
        assert_eq!(store.len(), MEMORY_CAPACITY);
        assert_eq!(store.iter().next().map(|r| r.timestamp), Some(200));
    }

    #[test]
    fn outcome_helpers() {
        let mut r = record_at(0, 0.4);
        assert_eq!(r.absolute_error(), None);
        r.outcome = Some(-0.1);
        assert!((r.absolute_error().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(r.direction_hit(), Some(false));
        r.outcome = Some(0.9);
        assert_eq!(r.direction_hit(), Some(true));
    }

    #[test]
    fn clear_empties_store() {
        let mut store = MemoryStore::new();
        store.record(record_at(1, 0.1));
        store.clear();
        assert!(store.is_empty());
        assert!(store.latest().is_none());
    }
}

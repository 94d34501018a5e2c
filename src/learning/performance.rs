// Per-regime scorecard over the records that have a realised outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::learning::memory::MemoryStore;
use crate::regime::Regime;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimePerformance {
    /// Records with an outcome.
    pub count: usize,
    /// Mean |outcome - prediction|.
    pub avg_error: f64,
    /// Fraction of records whose prediction sign matched the outcome sign.
    pub accuracy: f64,
}

/// Aggregate labelled records by regime. Regimes with no labelled records are
/// absent from the map.
pub fn regime_performance(memory: &MemoryStore) -> BTreeMap<Regime, RegimePerformance> {
    let mut totals: BTreeMap<Regime, (usize, f64, usize)> = BTreeMap::new();
    for record in memory.iter() {
        let (Some(error), Some(hit)) = (record.absolute_error(), record.direction_hit()) else {
            continue;
        };
        let entry = totals.entry(record.regime).or_insert((0, 0.0, 0));
        entry.0 += 1;
        entry.1 += error;
        entry.2 += usize::from(hit);
    }

    totals
        .into_iter()
        .map(|(regime, (count, error_sum, hits))| {
            let n = count as f64;
            (
                regime,
                RegimePerformance {
                    count,
                    avg_error: error_sum / n,
                    accuracy: hits as f64 / n,
                },
            )
        })
        .collect()
}

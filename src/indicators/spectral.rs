// =============================================================================
// Dominant Cycle — autocorrelation spectral estimate
// =============================================================================
//
// For each lag k in [MIN_LAG, max_lag] the sample autocorrelation of the
// return series is
//
//   ρ(k) = Σ (x_t - x̄)(x_{t+k} - x̄) / Σ (x_t - x̄)²
//
// The lag with the largest positive ρ is the dominant cycle length; its
// reciprocal is the dominant frequency (cycles per candle). Ties resolve to
// the shortest lag, which keeps the estimate deterministic.

use crate::indicators::stats::{mean, EPSILON};

/// Shortest cycle considered; lag 1 is dominated by microstructure noise.
const MIN_LAG: usize = 2;

/// Longest cycle considered.
const MAX_LAG: usize = 64;

/// Dominant cycle estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantCycle {
    /// Cycle length in candles (0 when no cycle was found).
    pub period: usize,
    /// 1 / period, or 0.0 when no cycle was found.
    pub frequency: f64,
    /// Autocorrelation at the dominant lag.
    pub strength: f64,
}

impl DominantCycle {
    const NONE: Self = Self {
        period: 0,
        frequency: 0.0,
        strength: 0.0,
    };
}

/// Find the dominant cycle in `returns`.
///
/// Lags run up to `min(MAX_LAG, len / 2)`. Flat input or a spectrum with no
/// positive autocorrelation yields a zero cycle.
pub fn dominant_cycle(returns: &[f64]) -> DominantCycle {
    let n = returns.len();
    let max_lag = MAX_LAG.min(n / 2);
    if max_lag < MIN_LAG {
        return DominantCycle::NONE;
    }

    let m = mean(returns);
    let centred: Vec<f64> = returns.iter().map(|x| x - m).collect();
    let denom: f64 = centred.iter().map(|x| x * x).sum();
    if denom < EPSILON {
        return DominantCycle::NONE;
    }

    let mut best = DominantCycle::NONE;
    for lag in MIN_LAG..=max_lag {
        let num: f64 = centred[..n - lag]
            .iter()
            .zip(&centred[lag..])
            .map(|(a, b)| a * b)
            .sum();
        let rho = num / denom;
        if rho.is_finite() && rho > best.strength {
            best = DominantCycle {
                period: lag,
                frequency: 1.0 / lag as f64,
                strength: rho,
            };
        }
    }
    best
}

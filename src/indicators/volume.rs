// =============================================================================
// Volume Indicators — VWAP, volume surge, relative volume
// =============================================================================
//
// VWAP   = Σ(typical_price · volume) / Σ(volume)
// Surge  = (v_now - mean(v_prev)) / σ(v_prev), clipped to ±clip
// Ratio  = mean(v_recent) / mean(v_baseline)
//
// A candle series with no traded volume falls back to the plain mean of the
// typical price for VWAP and to neutral readings for surge and ratio.

use tracing::trace;

use crate::indicators::stats::{finite_or, mean, std_dev, EPSILON};
use crate::market_data::Candle;

/// Volume-weighted average of the typical price over `candles`.
///
/// Zero total volume falls back to the simple average typical price; an
/// empty slice yields 0.0.
pub fn vwap(candles: &[Candle]) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }

    let total_volume: f64 = candles.iter().map(|c| c.volume.max(0.0)).sum();
    if total_volume < EPSILON {
        trace!(candles = candles.len(), "VWAP: no volume, using mean typical price");
        let typical: Vec<f64> = candles.iter().map(Candle::typical_price).collect();
        return mean(&typical);
    }

    let weighted: f64 = candles
        .iter()
        .map(|c| c.typical_price() * c.volume.max(0.0))
        .sum();
    finite_or(weighted / total_volume, 0.0)
}

/// Z-score of the latest volume against the preceding `lookback` volumes.
///
/// The deviation is divided by `max(σ, EPSILON)` and the result clipped to
/// `[-clip, clip]`, so a flat volume history yields 0.0 rather than a blow-up.
pub fn volume_surge(volumes: &[f64], lookback: usize, clip: f64) -> f64 {
    let Some((&current, history)) = volumes.split_last() else {
        return 0.0;
    };
    if history.is_empty() || lookback == 0 {
        return 0.0;
    }

    let start = history.len().saturating_sub(lookback);
    let baseline = &history[start..];
    let deviation = current - mean(baseline);
    let sigma = std_dev(baseline);

    if deviation.abs() < EPSILON {
        return 0.0;
    }

    let z = deviation / sigma.max(EPSILON);
    finite_or(z, 0.0).clamp(-clip, clip)
}

/// Mean of the last `recent` volumes relative to the mean of the last
/// `baseline` volumes; 1.0 (neutral) when the baseline carries no volume.
pub fn volume_ratio(volumes: &[f64], recent: usize, baseline: usize) -> f64 {
    if volumes.is_empty() || recent == 0 || baseline == 0 {
        return 1.0;
    }
    let recent_slice = &volumes[volumes.len().saturating_sub(recent)..];
    let baseline_slice = &volumes[volumes.len().saturating_sub(baseline)..];
    let base = mean(baseline_slice);
    if base < EPSILON {
        return 1.0;
    }
    finite_or(mean(recent_slice) / base, 1.0)
}

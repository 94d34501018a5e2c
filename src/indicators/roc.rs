// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
//   ROC = (close - close_n) / close_n
//
// Expressed as a fraction (0.02 = 2 %) since the regime thresholds are
// fractional.

use crate::indicators::stats::EPSILON;

/// Fractional rate of change between the first and last close of `window`.
///
/// 0.0 for fewer than two closes or a base price within epsilon of zero.
pub fn window_roc(window: &[f64]) -> f64 {
    match (window.first(), window.last()) {
        (Some(&first), Some(&last)) if window.len() >= 2 && first.abs() > EPSILON => {
            (last - first) / first
        }
        _ => 0.0,
    }
}

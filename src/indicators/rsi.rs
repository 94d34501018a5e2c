// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Price deltas from consecutive closes.
// Step 2 — Seed average gain / loss with the SMA of the first `period` deltas.
// Step 3 — Wilder smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + loss) / period
// Step 4 — RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//
// The feature extractor calls `window_rsi`, which seeds over every delta in
// the slice so each window's RSI only ever sees that window's samples.
// =============================================================================

/// RSI reported when there is no price movement or too little data.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the full RSI series for `closes` and `period`.
///
/// One value per close starting at index `period`. Empty when `period == 0`
/// or there are fewer than `period + 1` closes.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let Some(first_rsi) = rsi_from_averages(avg_gain, avg_loss) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    result.push(first_rsi);

    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

/// RSI over an entire window: the seed value using every delta in `closes`.
///
/// Returns [`NEUTRAL_RSI`] for fewer than two closes or a non-finite result.
pub fn window_rsi(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return NEUTRAL_RSI;
    }
    calculate_rsi(closes, closes.len() - 1)
        .last()
        .copied()
        .unwrap_or(NEUTRAL_RSI)
}

/// Convert average gain / loss into an RSI value in [0, 100].
///
/// Both zero => 50 (no movement); zero loss => 100. `None` when non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        NEUTRAL_RSI
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(!series.is_empty());
        for &v in &series {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for &v in &calculate_rsi(&closes, 14) {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for &v in &calculate_rsi(&closes, 14) {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn window_rsi_uses_whole_window() {
        // Two gains of 1 and one loss of 1 => RS = 2 => RSI = 66.67
        let closes = [10.0, 11.0, 12.0, 11.0];
        assert!((window_rsi(&closes) - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn window_rsi_degenerate_inputs() {
        assert_eq!(window_rsi(&[]), NEUTRAL_RSI);
        assert_eq!(window_rsi(&[5.0]), NEUTRAL_RSI);
        assert_eq!(window_rsi(&[5.0; 20]), NEUTRAL_RSI);
    }
}

// =============================================================================
// Exponential Moving Average (EMA) and MACD
// =============================================================================
//
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` closes.
//
// MACD is the spread between a fast and a slow EMA; its signal line is an EMA
// of that spread and the histogram is spread minus signal.
// =============================================================================

/// Compute the EMA series for `closes` and look-back `period`.
///
/// Each output element corresponds to a close starting at index `period - 1`.
/// Empty when `period == 0` or `closes.len() < period`. A non-finite
/// intermediate value truncates the series.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let sma: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &close in &closes[period..] {
        let ema = close * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Latest MACD reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the latest MACD line, signal line and histogram.
///
/// Returns `None` when `fast >= slow`, any period is zero, or there are fewer
/// than `slow + signal - 1` closes.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdResult> {
    if fast == 0 || signal == 0 || fast >= slow || closes.len() < slow + signal - 1 {
        return None;
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    // ema_fast[k] belongs to close index k + fast - 1; ema_slow[k] to k + slow - 1.
    let offset = slow - fast;
    let spread: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .filter_map(|(k, slow_val)| ema_fast.get(k + offset).map(|fast_val| fast_val - slow_val))
        .collect();

    let signal_series = calculate_ema(&spread, signal);
    let macd = *spread.last()?;
    let signal_value = *signal_series.last()?;

    Some(MacdResult {
        macd,
        signal: signal_value,
        histogram: macd - signal_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_period_equals_length() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], 3);
        assert_eq!(ema.len(), 1);
        assert!((ema[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_known_values() {
        let closes = ascending(10);
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), 6);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        let mut expected_vec = vec![expected];
        for &c in &closes[5..] {
            expected = c * mult + expected * (1.0 - mult);
            expected_vec.push(expected);
        }
        for (a, b) in ema.iter().zip(expected_vec.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_handles_nan_in_input() {
        let ema = calculate_ema(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 3);
        assert_eq!(ema.len(), 1);
    }

    #[test]
    fn macd_insufficient_data() {
        assert!(calculate_macd(&ascending(30), 12, 26, 9).is_none());
        assert!(calculate_macd(&ascending(100), 26, 12, 9).is_none());
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let result = calculate_macd(&ascending(120), 12, 26, 9).unwrap();
        assert!(result.macd > 0.0);
        // Linear ramp: the spread converges, so the histogram is ~0.
        assert!(result.histogram.abs() < 1e-6);
    }

    #[test]
    fn macd_flat_is_zero() {
        let result = calculate_macd(&[50.0; 80], 12, 26, 9).unwrap();
        assert!(result.macd.abs() < 1e-12);
        assert!(result.signal.abs() < 1e-12);
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let closes: Vec<f64> = (1..=120).rev().map(|x| x as f64).collect();
        let result = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert!(result.macd < 0.0);
    }
}

// =============================================================================
// Hurst Exponent — Corrected Rescaled Range (R/S) Analysis
// =============================================================================
//
// The Hurst exponent H characterises the long-term memory of a series:
//
//   H > 0.5  =>  persistent (trending)
//   H ~ 0.5  =>  uncorrelated increments (random walk)
//   H < 0.5  =>  anti-persistent (mean-reverting)
//
// Algorithm, applied to the *return* series (the increments of the walk):
//   1. For each lag n in {8, 16, 32, ...} with n <= len / 4:
//      a. Split the returns into non-overlapping chunks of length n.
//      b. Per chunk: R = range of the cumulative deviation from the chunk
//         mean, S = population σ of the chunk; skip chunks with S ~ 0.
//      c. Average R/S across chunks.
//   2. Subtract the Anis-Lloyd/Peters expected R/S of an uncorrelated series
//      of the same length, which removes the small-sample upward bias of
//      raw R/S.
//   3. H = 0.5 + OLS slope of (log avg R/S - log E[R/S]) on log n, clamped to
//      [0, 1].

use tracing::trace;

use crate::indicators::stats::EPSILON;

/// Smallest chunk length used in the multi-scale computation.
const MIN_LAG: usize = 8;

/// Each lag must fit at least this many times into the series.
const MIN_CHUNKS: usize = 4;

/// Above this length the gamma ratio is replaced by its asymptotic form.
const GAMMA_CUTOFF: usize = 340;

/// Value reported when the exponent cannot be estimated.
pub const NEUTRAL_HURST: f64 = 0.5;

/// Estimate the Hurst exponent of a return series.
///
/// Returns `None` when fewer than two lags are usable: the series is shorter
/// than `MIN_LAG * 2 * MIN_CHUNKS` or every chunk is flat.
pub fn calculate_hurst_exponent(returns: &[f64]) -> Option<f64> {
    let mut log_n: Vec<f64> = Vec::new();
    let mut log_excess: Vec<f64> = Vec::new();

    let mut lag = MIN_LAG;
    while lag * MIN_CHUNKS <= returns.len() {
        if let Some(avg_rs) = average_rescaled_range(returns, lag) {
            log_n.push((lag as f64).ln());
            log_excess.push(avg_rs.ln() - expected_rescaled_range(lag).ln());
        }
        lag *= 2;
    }

    if log_n.len() < 2 {
        trace!(
            len = returns.len(),
            usable_lags = log_n.len(),
            "Hurst: insufficient valid lags for regression"
        );
        return None;
    }

    let n = log_n.len() as f64;
    let x_mean = log_n.iter().sum::<f64>() / n;
    let y_mean = log_excess.iter().sum::<f64>() / n;

    let mut numerator = 0.0_f64;
    let mut denominator = 0.0_f64;
    for (x, y) in log_n.iter().zip(&log_excess) {
        let dx = x - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator.abs() < EPSILON {
        return None;
    }

    let hurst = 0.5 + numerator / denominator;
    if !hurst.is_finite() {
        return None;
    }
    let hurst = hurst.clamp(0.0, 1.0);

    trace!(
        hurst = format!("{:.4}", hurst),
        points = log_n.len(),
        "Hurst exponent computed"
    );

    Some(hurst)
}

/// Mean R/S over the non-overlapping chunks of length `lag`; `None` when every
/// chunk is flat.
fn average_rescaled_range(returns: &[f64], lag: usize) -> Option<f64> {
    let mut rs_sum = 0.0_f64;
    let mut valid_chunks = 0_usize;

    for chunk in returns.chunks_exact(lag) {
        let mean = chunk.iter().sum::<f64>() / lag as f64;
        let variance = chunk.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / lag as f64;
        let std_dev = variance.sqrt();
        if std_dev < EPSILON {
            continue;
        }

        let mut running = 0.0_f64;
        let mut max_dev = f64::NEG_INFINITY;
        let mut min_dev = f64::INFINITY;
        for &val in chunk {
            running += val - mean;
            max_dev = max_dev.max(running);
            min_dev = min_dev.min(running);
        }

        rs_sum += (max_dev - min_dev) / std_dev;
        valid_chunks += 1;
    }

    (valid_chunks > 0).then(|| rs_sum / valid_chunks as f64)
}

/// Anis-Lloyd expected R/S of `n` uncorrelated observations, with the Peters
/// `(n - 0.5) / n` small-sample factor.
fn expected_rescaled_range(n: usize) -> f64 {
    let nf = n as f64;
    let sum: f64 = (1..n).map(|i| ((nf - i as f64) / i as f64).sqrt()).sum();
    let gamma_term = if n <= GAMMA_CUTOFF {
        gamma_ratio(n) / std::f64::consts::PI.sqrt()
    } else {
        1.0 / (nf * std::f64::consts::FRAC_PI_2).sqrt()
    };
    (nf - 0.5) / nf * gamma_term * sum
}

/// Γ((n - 1) / 2) / Γ(n / 2) via the recurrence g(n) = g(n - 2)·(n - 3)/(n - 2),
/// seeded with g(2) = √π and g(3) = 2/√π.
fn gamma_ratio(n: usize) -> f64 {
    let sqrt_pi = std::f64::consts::PI.sqrt();
    let (mut k, mut g) = if n % 2 == 0 { (2, sqrt_pi) } else { (3, 2.0 / sqrt_pi) };
    while k < n {
        k += 2;
        g *= (k as f64 - 3.0) / (k as f64 - 2.0);
    }
    g
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::stats::simple_returns;

    /// Deterministic xorshift64 random walk so the tests are reproducible.
    fn pseudorandom_walk(len: usize, seed: u64) -> Vec<f64> {
        let mut v = Vec::with_capacity(len);
        let mut price = 100.0;
        let mut state = seed;
        for _ in 0..len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let r = (state as f64 / u64::MAX as f64) - 0.5;
            price += r;
            v.push(price);
        }
        v
    }

    /// Returns with strong positive autocorrelation (slowly drifting sign).
    fn persistent_returns(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (i as f64 / 40.0).sin() * 0.01 + 0.0005 * (i as f64 * 1.3).cos())
            .collect()
    }

    /// Returns that flip sign every step.
    fn alternating_returns(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| if i % 2 == 0 { 0.01 } else { -0.01 } + 0.001 * (i as f64).sin())
            .collect()
    }

    #[test]
    fn test_insufficient_data_returns_none() {
        let returns: Vec<f64> = (0..40).map(|i| (i as f64).sin()).collect();
        assert!(calculate_hurst_exponent(&returns).is_none());
    }

    #[test]
    fn test_flat_series_returns_none() {
        assert!(calculate_hurst_exponent(&[0.0; 256]).is_none());
        assert!(calculate_hurst_exponent(&[0.005; 256]).is_none());
    }

    #[test]
    fn test_random_walk_near_half() {
        let seeds = [
            123_456_789_u64,
            987_654_321,
            0x9E37_79B9_7F4A_7C15,
            0xD1B5_4A32_D192_ED03,
            0xA076_1D64_78BD_642F,
            0xE703_7ED1_A0B4_28DB,
            0x8EBC_6AF0_9C88_C6E3,
            0x5899_65CC_7537_4CC3,
        ];
        let estimates: Vec<f64> = seeds
            .iter()
            .map(|&seed| {
                let returns = simple_returns(&pseudorandom_walk(1025, seed));
                calculate_hurst_exponent(&returns).expect("random walk should produce a value")
            })
            .collect();
        let avg = estimates.iter().sum::<f64>() / estimates.len() as f64;
        assert!(
            (avg - 0.5).abs() <= 0.1,
            "random walk Hurst should be ~0.5, got {:.4} ({:?})",
            avg,
            estimates
        );
    }

    #[test]
    fn test_persistent_returns_high_hurst() {
        let h = calculate_hurst_exponent(&persistent_returns(512)).unwrap();
        assert!(h > 0.6, "persistent returns should have H > 0.6, got {:.4}", h);
    }

    #[test]
    fn test_alternating_returns_low_hurst() {
        let h = calculate_hurst_exponent(&alternating_returns(512)).unwrap();
        assert!(h < 0.4, "anti-persistent returns should have H < 0.4, got {:.4}", h);
    }

    #[test]
    fn test_hurst_clamped_to_unit_interval() {
        let h = calculate_hurst_exponent(&persistent_returns(256)).unwrap();
        assert!((0.0..=1.0).contains(&h), "H={:.4} out of [0,1]", h);
    }

    #[test]
    fn test_gamma_ratio_matches_closed_forms() {
        let sqrt_pi = std::f64::consts::PI.sqrt();
        assert!((gamma_ratio(2) - sqrt_pi).abs() < 1e-12);
        assert!((gamma_ratio(3) - 2.0 / sqrt_pi).abs() < 1e-12);
        // Γ(1.5) / Γ(2) = √π / 2
        assert!((gamma_ratio(4) - sqrt_pi / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_expected_rs_grows_with_n() {
        let small = expected_rescaled_range(8);
        let large = expected_rescaled_range(128);
        assert!(large > small);
        assert!(expected_rescaled_range(512).is_finite());
    }

    #[test]
    fn test_determinism() {
        let returns = simple_returns(&pseudorandom_walk(512, 99));
        assert_eq!(
            calculate_hurst_exponent(&returns),
            calculate_hurst_exponent(&returns)
        );
    }
}

// =============================================================================
// Descriptive Statistics
// =============================================================================
//
// Small numeric helpers shared by the feature extractor. Every function is
// total: empty or degenerate input yields a documented neutral value instead
// of NaN.

/// Guard used for every division in the feature pipeline.
pub const EPSILON: f64 = 1e-12;

/// Replace a non-finite value with `default`.
#[inline]
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation of the negative values only (downside deviation
/// around zero); 0.0 when there are no losses.
pub fn downside_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().filter(|&&v| v < 0.0).map(|v| v * v).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Sample skewness (third standardised moment); 0.0 for flat input.
pub fn skewness(values: &[f64]) -> f64 {
    let sd = std_dev(values);
    if sd < EPSILON {
        return 0.0;
    }
    let m = mean(values);
    let m3 = values.iter().map(|x| ((x - m) / sd).powi(3)).sum::<f64>() / values.len() as f64;
    finite_or(m3, 0.0)
}

/// Excess kurtosis (fourth standardised moment minus 3); 0.0 for flat input.
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let sd = std_dev(values);
    if sd < EPSILON {
        return 0.0;
    }
    let m = mean(values);
    let m4 = values.iter().map(|x| ((x - m) / sd).powi(4)).sum::<f64>() / values.len() as f64;
    finite_or(m4 - 3.0, 0.0)
}

/// Pearson correlation of two equally long series; 0.0 when either side is
/// flat or the lengths differ.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    let denom = (var_a * var_b).sqrt();
    if denom < EPSILON {
        return 0.0;
    }
    finite_or(cov / denom, 0.0).clamp(-1.0, 1.0)
}

/// Simple period returns `(p_t - p_{t-1}) / p_{t-1}`; a zero base yields 0.0.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| {
            if w[0].abs() < EPSILON {
                0.0
            } else {
                finite_or((w[1] - w[0]) / w[0], 0.0)
            }
        })
        .collect()
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(closes: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &price in closes {
        peak = peak.max(price);
        if peak > EPSILON {
            worst = worst.max((peak - price) / peak);
        }
    }
    worst
}

/// Least-squares fit of `ys` against their index.
///
/// Returns `(slope, r_squared)`; `(0.0, 0.0)` for fewer than two points or a
/// flat series.
pub fn linear_fit(ys: &[f64]) -> (f64, f64) {
    let n = ys.len();
    if n < 2 {
        return (0.0, 0.0);
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = y - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx < EPSILON || syy < EPSILON {
        return (0.0, 0.0);
    }
    let slope = sxy / sxx;
    let r_squared = (sxy * sxy) / (sxx * syy);
    (finite_or(slope, 0.0), finite_or(r_squared, 0.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v) - 5.0).abs() < 1e-12);
        assert!((std_dev(&v) - 2.0).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[3.0]), 0.0);
    }

    #[test]
    fn flat_moments_are_zero() {
        let flat = [1.5; 30];
        assert_eq!(skewness(&flat), 0.0);
        assert_eq!(excess_kurtosis(&flat), 0.0);
    }

    #[test]
    fn skew_sign_follows_tail() {
        let right_tail = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0];
        assert!(skewness(&right_tail) > 0.0);
        let left_tail = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -10.0];
        assert!(skewness(&left_tail) < 0.0);
    }

    #[test]
    fn correlation_perfect_and_flat() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!((correlation(&a, &b) - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = b.iter().map(|x| -x).collect();
        assert!((correlation(&a, &neg) + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&a, &[5.0; 4]), 0.0);
        assert_eq!(correlation(&a, &b[..3]), 0.0);
    }

    #[test]
    fn returns_guard_zero_base() {
        let r = simple_returns(&[0.0, 1.0, 2.0]);
        assert_eq!(r, vec![0.0, 1.0]);
    }

    #[test]
    fn drawdown_from_peak() {
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 110.0]);
        assert!((dd - 0.25).abs() < 1e-12);
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn linear_fit_perfect_line() {
        let ys: Vec<f64> = (0..20).map(|i| 3.0 + 0.5 * i as f64).collect();
        let (slope, r2) = linear_fit(&ys);
        assert!((slope - 0.5).abs() < 1e-12);
        assert!((r2 - 1.0).abs() < 1e-12);
        assert_eq!(linear_fit(&[4.0; 10]), (0.0, 0.0));
    }

    #[test]
    fn downside_only_counts_losses() {
        assert_eq!(downside_deviation(&[0.01, 0.02]), 0.0);
        assert!(downside_deviation(&[0.01, -0.02]) > 0.0);
    }
}

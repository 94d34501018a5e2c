// =============================================================================
// Shannon Entropy — histogram estimate over the return distribution
// =============================================================================
//
// Returns are binned into `buckets` equal-width bins spanning [min, max] and
//
//   H = -Σ p_i · log2(p_i)
//
// is computed over the non-empty bins. The maximum is log2(buckets) (uniform
// spread = pure noise); a constant series puts every sample in one bin and
// yields exactly 0.

use tracing::trace;

/// Default number of histogram buckets.
pub const DEFAULT_BUCKETS: usize = 10;

/// Spreads narrower than this are treated as a constant series.
const DEGENERATE_RANGE: f64 = 1e-12;

/// Entropy reading in bits plus its normalised form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyReading {
    /// Shannon entropy in bits, in [0, log2(buckets)].
    pub bits: f64,
    /// `bits / log2(buckets)`, in [0, 1].
    pub normalized: f64,
}

impl EntropyReading {
    const ZERO: Self = Self {
        bits: 0.0,
        normalized: 0.0,
    };
}

/// Histogram Shannon entropy of `returns`.
///
/// Empty input, fewer than two buckets, or a degenerate (constant) series
/// yield zero entropy.
pub fn shannon_entropy(returns: &[f64], buckets: usize) -> EntropyReading {
    if returns.is_empty() || buckets < 2 {
        return EntropyReading::ZERO;
    }

    let (min, max) = returns
        .iter()
        .filter(|r| r.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| (lo.min(r), hi.max(r)));
    let range = max - min;
    if !range.is_finite() || range <= DEGENERATE_RANGE {
        trace!(samples = returns.len(), "Entropy: degenerate return distribution");
        return EntropyReading::ZERO;
    }

    let mut counts = vec![0_usize; buckets];
    let mut total = 0_usize;
    for &r in returns.iter().filter(|r| r.is_finite()) {
        let idx = (((r - min) / range) * buckets as f64) as usize;
        counts[idx.min(buckets - 1)] += 1;
        total += 1;
    }

    let bits: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum();

    let normalized = (bits / (buckets as f64).log2()).clamp(0.0, 1.0);

    trace!(
        entropy = format!("{:.4}", bits),
        normalized = format!("{:.4}", normalized),
        buckets,
        "Entropy calculated"
    );

    EntropyReading { bits, normalized }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_zero_entropy() {
        let reading = shannon_entropy(&[0.01; 50], DEFAULT_BUCKETS);
        assert_eq!(reading.bits, 0.0);
        assert_eq!(reading.normalized, 0.0);
    }

    #[test]
    fn empty_input_zero_entropy() {
        assert_eq!(shannon_entropy(&[], DEFAULT_BUCKETS), EntropyReading::ZERO);
        assert_eq!(shannon_entropy(&[0.1, 0.2], 1), EntropyReading::ZERO);
    }

    #[test]
    fn uniform_spread_max_entropy() {
        // One sample per bucket centre => every bucket has p = 0.1.
        let returns: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        let reading = shannon_entropy(&returns, 10);
        assert!((reading.bits - 10f64.log2()).abs() < 1e-10);
        assert!((reading.normalized - 1.0).abs() < 1e-10);
    }

    #[test]
    fn two_point_distribution_one_bit() {
        let returns: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { -0.01 } else { 0.01 }).collect();
        let reading = shannon_entropy(&returns, 10);
        assert!((reading.bits - 1.0).abs() < 1e-10);
    }

    #[test]
    fn skewed_distribution_between_bounds() {
        let mut returns = vec![0.0; 45];
        returns.extend([1.0; 5]);
        let reading = shannon_entropy(&returns, 10);
        assert!(reading.bits > 0.0 && reading.bits < 1.0);
    }
}

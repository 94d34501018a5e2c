// =============================================================================
// Feature Bundle — fixed-shape multi-scale feature record
// =============================================================================
//
// One `WindowFeatures` block per look-back window, three MACD parameter sets,
// and a handful of series-wide statistics. `to_vector` flattens everything the
// predictors and the memory store consume into a vector whose length is the
// compile-time constant `FEATURE_VECTOR_LEN`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::indicators::rsi::NEUTRAL_RSI;
use crate::regime::NEUTRAL_HURST;

/// Look-back windows, in candles.
pub const FEATURE_WINDOWS: [usize; 6] = [7, 14, 21, 50, 100, 200];

/// Windows whose momentum feeds the short-horizon stumps.
pub const SHORT_WINDOWS: [usize; 3] = [7, 14, 21];

/// Windows whose momentum feeds the long-horizon stumps.
pub const LONG_WINDOWS: [usize; 3] = [50, 100, 200];

/// (fast, slow, signal) periods of the MACD triple.
pub const MACD_PARAMS: [(usize, usize, usize); 3] = [(6, 13, 5), (12, 26, 9), (24, 52, 18)];

/// Numeric fields per window in the flattened vector.
pub const WINDOW_FIELD_COUNT: usize = 13;

/// Numeric fields per MACD set in the flattened vector.
pub const MACD_FIELD_COUNT: usize = 3;

/// Series-wide numeric fields in the flattened vector.
pub const SCALAR_FIELD_COUNT: usize = 14;

/// Length of [`FeatureBundle::to_vector`].
pub const FEATURE_VECTOR_LEN: usize = FEATURE_WINDOWS.len() * WINDOW_FIELD_COUNT
    + MACD_PARAMS.len() * MACD_FIELD_COUNT
    + SCALAR_FIELD_COUNT;

/// Statistics computed from a single look-back window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowFeatures {
    /// Nominal window length in candles.
    pub window: usize,
    /// Number of returns actually used (less than `window` on short history).
    pub samples: usize,
    /// Whether the full window was available.
    pub complete: bool,

    /// Mean simple return per candle.
    pub mean_return: f64,
    /// Population σ of returns.
    pub volatility: f64,
    /// Downside deviation of returns.
    pub downside_volatility: f64,
    /// Fractional rate of change across the window.
    pub momentum: f64,
    /// RSI seeded over the whole window, [0, 100].
    pub rsi: f64,
    pub skewness: f64,
    /// Excess kurtosis.
    pub kurtosis: f64,
    /// Peak-to-trough decline within the window.
    pub max_drawdown: f64,
    /// Position of the last close inside the window's high/low range, [0, 1].
    pub range_position: f64,
    /// Last close relative to the window SMA, minus one.
    pub sma_deviation: f64,
    /// Kaufman efficiency ratio, [0, 1].
    pub efficiency_ratio: f64,
    /// (up moves - down moves) / samples, [-1, 1].
    pub net_up_ratio: f64,
    /// Window mean volume over the long-run mean volume.
    pub volume_ratio: f64,
}

impl WindowFeatures {
    /// A window with no samples: every statistic at its neutral value.
    pub fn neutral(window: usize) -> Self {
        Self {
            window,
            samples: 0,
            complete: false,
            mean_return: 0.0,
            volatility: 0.0,
            downside_volatility: 0.0,
            momentum: 0.0,
            rsi: NEUTRAL_RSI,
            skewness: 0.0,
            kurtosis: 0.0,
            max_drawdown: 0.0,
            range_position: 0.5,
            sma_deviation: 0.0,
            efficiency_ratio: 0.0,
            net_up_ratio: 0.0,
            volume_ratio: 1.0,
        }
    }

    fn push_values(&self, out: &mut Vec<f64>) {
        out.extend_from_slice(&[
            self.mean_return,
            self.volatility,
            self.downside_volatility,
            self.momentum,
            // Scaled to [-1, 1] so it sits alongside the fractional fields.
            (self.rsi - NEUTRAL_RSI) / NEUTRAL_RSI,
            self.skewness,
            self.kurtosis,
            self.max_drawdown,
            self.range_position,
            self.sma_deviation,
            self.efficiency_ratio,
            self.net_up_ratio,
            self.volume_ratio,
        ]);
    }

    fn sanitize(&mut self) -> usize {
        let mut replaced = 0;
        for (value, default) in [
            (&mut self.mean_return, 0.0),
            (&mut self.volatility, 0.0),
            (&mut self.downside_volatility, 0.0),
            (&mut self.momentum, 0.0),
            (&mut self.rsi, NEUTRAL_RSI),
            (&mut self.skewness, 0.0),
            (&mut self.kurtosis, 0.0),
            (&mut self.max_drawdown, 0.0),
            (&mut self.range_position, 0.5),
            (&mut self.sma_deviation, 0.0),
            (&mut self.efficiency_ratio, 0.0),
            (&mut self.net_up_ratio, 0.0),
            (&mut self.volume_ratio, 1.0),
        ] {
            replaced += replace_non_finite(value, default);
        }
        replaced
    }
}

/// One MACD reading, expressed as a percentage of the last close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdFeatures {
    pub fast: usize,
    pub slow: usize,
    pub signal_period: usize,
    /// Whether enough history existed to compute this set.
    pub available: bool,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdFeatures {
    pub fn unavailable((fast, slow, signal_period): (usize, usize, usize)) -> Self {
        Self {
            fast,
            slow,
            signal_period,
            available: false,
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
        }
    }
}

/// Complete multi-scale feature record for one candle series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    /// One entry per [`FEATURE_WINDOWS`] element, same order.
    pub windows: [WindowFeatures; FEATURE_WINDOWS.len()],
    /// One entry per [`MACD_PARAMS`] element, same order.
    pub macd: [MacdFeatures; MACD_PARAMS.len()],

    /// Close of the most recent candle.
    pub last_close: f64,
    /// Timestamp of the most recent candle (ms), 0 for an empty series.
    pub last_timestamp: i64,

    /// Hurst exponent of the return series, [0, 1].
    pub hurst: f64,
    /// 2 - Hurst, [1, 2].
    pub fractal_dimension: f64,
    /// Shannon entropy of the return histogram, in bits.
    pub entropy: f64,
    /// Entropy divided by its maximum, [0, 1].
    pub normalized_entropy: f64,
    /// Volume-weighted average typical price over the longest window.
    pub vwap: f64,
    /// Last close relative to VWAP, minus one.
    pub vwap_deviation: f64,
    /// Clipped z-score of the latest volume.
    pub volume_surge: f64,
    /// Recent (7-candle) mean volume over the long-run mean volume.
    pub volume_ratio: f64,
    /// Correlation of returns with traded volume.
    pub price_volume_correlation: f64,
    /// Mean MACD line across the available parameter sets, % of price.
    pub macd_composite: f64,
    /// Mean Bollinger band width across windows, % of price.
    pub bollinger_bandwidth: f64,
    /// Reciprocal of the dominant cycle length, 0 when none.
    pub dominant_frequency: f64,
    /// Dominant cycle length in candles, 0 when none.
    pub dominant_cycle: usize,
    /// Signed R² of a log-price linear fit, [-1, 1].
    pub trend_strength: f64,
    /// Mean per-window return volatility.
    pub regime_volatility: f64,
    /// Fraction of windows with full history, [0, 1].
    pub coverage: f64,
}

impl FeatureBundle {
    /// A bundle for an empty series: every feature neutral, zero coverage.
    pub fn neutral() -> Self {
        Self {
            windows: FEATURE_WINDOWS.map(WindowFeatures::neutral),
            macd: MACD_PARAMS.map(MacdFeatures::unavailable),
            last_close: 0.0,
            last_timestamp: 0,
            hurst: NEUTRAL_HURST,
            fractal_dimension: 2.0 - NEUTRAL_HURST,
            entropy: 0.0,
            normalized_entropy: 0.0,
            vwap: 0.0,
            vwap_deviation: 0.0,
            volume_surge: 0.0,
            volume_ratio: 1.0,
            price_volume_correlation: 0.0,
            macd_composite: 0.0,
            bollinger_bandwidth: 0.0,
            dominant_frequency: 0.0,
            dominant_cycle: 0,
            trend_strength: 0.0,
            regime_volatility: 0.0,
            coverage: 0.0,
        }
    }

    /// Features for the window of nominal length `size`.
    pub fn window(&self, size: usize) -> Option<&WindowFeatures> {
        self.windows.iter().find(|w| w.window == size)
    }

    /// Mean of per-window volatility.
    pub fn mean_volatility(&self) -> f64 {
        self.windows.iter().map(|w| w.volatility).sum::<f64>() / self.windows.len() as f64
    }

    /// Mean of absolute per-window momentum.
    pub fn mean_abs_momentum(&self) -> f64 {
        self.windows.iter().map(|w| w.momentum.abs()).sum::<f64>() / self.windows.len() as f64
    }

    /// Mean momentum over the given window sizes.
    pub fn mean_momentum(&self, sizes: &[usize]) -> f64 {
        let values: Vec<f64> = sizes
            .iter()
            .filter_map(|&s| self.window(s))
            .map(|w| w.momentum)
            .collect();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// RSI of the 14-candle window.
    pub fn rsi_14(&self) -> f64 {
        self.window(14).map_or(NEUTRAL_RSI, |w| w.rsi)
    }

    /// Agreement of momentum signs across windows.
    ///
    /// Returns `(direction, consistency)`: `direction` is +1, -1 or 0 (no
    /// moving windows or a tie) and `consistency` is the share of windows
    /// agreeing with it, in [0, 1].
    pub fn momentum_consistency(&self) -> (f64, f64) {
        let up = self.windows.iter().filter(|w| w.momentum > MOMENTUM_DEADBAND).count();
        let down = self.windows.iter().filter(|w| w.momentum < -MOMENTUM_DEADBAND).count();
        let total = self.windows.len() as f64;
        match up.cmp(&down) {
            std::cmp::Ordering::Greater => (1.0, up as f64 / total),
            std::cmp::Ordering::Less => (-1.0, down as f64 / total),
            std::cmp::Ordering::Equal => (0.0, 0.0),
        }
    }

    /// True when at least one window ran on truncated history.
    pub fn is_low_confidence(&self) -> bool {
        self.coverage < 1.0
    }

    /// Flatten every numeric feature into a vector of [`FEATURE_VECTOR_LEN`].
    ///
    /// Layout: windows (in [`FEATURE_WINDOWS`] order, [`WINDOW_FIELD_COUNT`]
    /// values each), MACD sets, then the series-wide scalars.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(FEATURE_VECTOR_LEN);
        for w in &self.windows {
            w.push_values(&mut out);
        }
        for m in &self.macd {
            out.extend_from_slice(&[m.macd, m.signal, m.histogram]);
        }
        out.extend_from_slice(&[
            self.hurst,
            self.fractal_dimension,
            self.entropy,
            self.normalized_entropy,
            self.vwap_deviation,
            self.volume_surge,
            self.volume_ratio,
            self.price_volume_correlation,
            self.macd_composite,
            self.bollinger_bandwidth,
            self.dominant_frequency,
            self.trend_strength,
            self.regime_volatility,
            self.coverage,
        ]);
        debug_assert_eq!(out.len(), FEATURE_VECTOR_LEN);
        out
    }

    /// Replace every non-finite value with its neutral default. Returns the
    /// number of replacements.
    pub fn sanitize(&mut self) -> usize {
        let mut replaced: usize = self.windows.iter_mut().map(WindowFeatures::sanitize).sum();
        for m in &mut self.macd {
            replaced += replace_non_finite(&mut m.macd, 0.0);
            replaced += replace_non_finite(&mut m.signal, 0.0);
            replaced += replace_non_finite(&mut m.histogram, 0.0);
        }
        let last_close = if self.last_close.is_finite() { self.last_close } else { 0.0 };
        for (value, default) in [
            (&mut self.last_close, 0.0),
            (&mut self.hurst, NEUTRAL_HURST),
            (&mut self.fractal_dimension, 2.0 - NEUTRAL_HURST),
            (&mut self.entropy, 0.0),
            (&mut self.normalized_entropy, 0.0),
            (&mut self.vwap, last_close),
            (&mut self.vwap_deviation, 0.0),
            (&mut self.volume_surge, 0.0),
            (&mut self.volume_ratio, 1.0),
            (&mut self.price_volume_correlation, 0.0),
            (&mut self.macd_composite, 0.0),
            (&mut self.bollinger_bandwidth, 0.0),
            (&mut self.dominant_frequency, 0.0),
            (&mut self.trend_strength, 0.0),
            (&mut self.regime_volatility, 0.0),
            (&mut self.coverage, 0.0),
        ] {
            replaced += replace_non_finite(value, default);
        }
        if replaced > 0 {
            warn!(replaced, "non-finite features replaced with neutral defaults");
        }
        replaced
    }
}

/// Momentum smaller than this counts as "no move" for sign agreement.
const MOMENTUM_DEADBAND: f64 = 1e-9;

fn replace_non_finite(value: &mut f64, default: f64) -> usize {
    if value.is_finite() {
        0
    } else {
        *value = default;
        1
    }
}

// =============================================================================
// Feature Extractor — candle series → FeatureBundle
// =============================================================================
//
// Pipeline:
//   1. Per look-back window (7 … 200 candles): returns, volatility, momentum,
//      RSI, higher moments, drawdown, range position, SMA deviation,
//      efficiency, up/down balance, relative volume. Each window only sees its
//      own samples; windows longer than the history run on what is available
//      and are flagged incomplete.
//   2. Series-wide: Hurst exponent over every return, entropy / dominant cycle
//      / trend fit / VWAP / price-volume correlation over the longest window,
//      volume surge, MACD triple, Bollinger width.
//   3. Sanitize: any non-finite value is replaced by its neutral default.
//
// Extraction never fails. An empty series produces an all-neutral bundle with
// zero coverage.
// =============================================================================

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::features::bundle::{
    FeatureBundle, MacdFeatures, WindowFeatures, FEATURE_WINDOWS, MACD_PARAMS,
};
use crate::indicators::bollinger::mean_bandwidth;
use crate::indicators::ema::calculate_macd;
use crate::indicators::roc::window_roc;
use crate::indicators::rsi::window_rsi;
use crate::indicators::spectral::dominant_cycle;
use crate::indicators::stats::{
    correlation, downside_deviation, excess_kurtosis, finite_or, linear_fit, max_drawdown, mean,
    simple_returns, skewness, std_dev, EPSILON,
};
use crate::indicators::volume::{volume_ratio, volume_surge, vwap};
use crate::market_data::{closes, volumes, Candle};
use crate::regime::{calculate_hurst_exponent, shannon_entropy, NEUTRAL_HURST};

/// Standard-deviation multiplier for the Bollinger width feature.
const BOLLINGER_STD: f64 = 2.0;

/// Candles in the "recent" side of the relative-volume feature.
const RECENT_VOLUME_WINDOW: usize = 7;

/// Extract the full feature bundle from `candles` (oldest first).
pub fn extract_features(candles: &[Candle], config: &EngineConfig) -> FeatureBundle {
    let closes = closes(candles);
    let volumes = volumes(candles);
    let longest = FEATURE_WINDOWS[FEATURE_WINDOWS.len() - 1];
    let long_run_volume = mean(tail(&volumes, longest + 1));

    let windows =
        FEATURE_WINDOWS.map(|w| window_features(candles, &closes, &volumes, w, long_run_volume));
    let coverage = windows.iter().filter(|w| w.complete).count() as f64 / windows.len() as f64;

    let last_close = closes.last().copied().unwrap_or(0.0);
    let last_timestamp = candles.last().map_or(0, |c| c.timestamp);

    // --- Long-memory / information statistics -----------------------------
    let all_returns = simple_returns(&closes);
    let hurst = calculate_hurst_exponent(&all_returns).unwrap_or(NEUTRAL_HURST);

    let long_candles = tail(candles, longest + 1);
    let long_closes = tail(&closes, longest + 1);
    let long_volumes = tail(&volumes, longest + 1);
    let long_returns = simple_returns(long_closes);

    let entropy = shannon_entropy(&long_returns, config.entropy_buckets);
    let cycle = dominant_cycle(&long_returns);

    // --- Volume -------------------------------------------------------------
    let vwap_value = vwap(long_candles);
    let vwap_deviation = if vwap_value.abs() > EPSILON {
        last_close / vwap_value - 1.0
    } else {
        0.0
    };
    let price_volume_correlation = if long_volumes.len() >= 2 {
        correlation(&long_returns, &long_volumes[1..])
    } else {
        0.0
    };

    // --- Trend / oscillators ------------------------------------------------
    let macd = MACD_PARAMS.map(|params| macd_features(&closes, last_close, params));
    let available: Vec<f64> = macd.iter().filter(|m| m.available).map(|m| m.macd).collect();
    let macd_composite = mean(&available);

    let mut bundle = FeatureBundle {
        windows,
        macd,
        last_close,
        last_timestamp,
        hurst,
        fractal_dimension: 2.0 - hurst,
        entropy: entropy.bits,
        normalized_entropy: entropy.normalized,
        vwap: vwap_value,
        vwap_deviation,
        volume_surge: volume_surge(&volumes, config.volume_lookback, config.volume_surge_clip),
        volume_ratio: volume_ratio(&volumes, RECENT_VOLUME_WINDOW, longest + 1),
        price_volume_correlation,
        macd_composite,
        bollinger_bandwidth: mean_bandwidth(&closes, &FEATURE_WINDOWS, BOLLINGER_STD),
        dominant_frequency: cycle.frequency,
        dominant_cycle: cycle.period,
        trend_strength: trend_strength(long_closes),
        regime_volatility: 0.0,
        coverage,
    };
    bundle.regime_volatility = bundle.mean_volatility();
    bundle.sanitize();

    debug!(
        candles = candles.len(),
        coverage = format!("{:.2}", bundle.coverage),
        hurst = format!("{:.4}", bundle.hurst),
        entropy = format!("{:.4}", bundle.entropy),
        volatility = format!("{:.4}", bundle.regime_volatility),
        "Features extracted"
    );

    bundle
}

/// The last `n` elements of `values` (all of them when shorter).
fn tail<T>(values: &[T], n: usize) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

/// Statistics for one window of nominal length `window`.
///
/// The window spans `window` returns, i.e. the last `window + 1` closes.
fn window_features(
    candles: &[Candle],
    closes: &[f64],
    volumes: &[f64],
    window: usize,
    long_run_volume: f64,
) -> WindowFeatures {
    let span = window + 1;
    let slice = tail(closes, span);
    if slice.is_empty() {
        return WindowFeatures::neutral(window);
    }
    let candle_slice = tail(candles, span);
    let volume_slice = tail(volumes, span);
    let returns = simple_returns(slice);
    let complete = closes.len() >= span;

    if !complete {
        trace!(
            window,
            available = returns.len(),
            "window truncated to available history"
        );
    }

    let last = slice[slice.len() - 1];

    let high = candle_slice.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = candle_slice.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let range_position = if high - low > EPSILON {
        ((last - low) / (high - low)).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let sma = mean(slice);
    let sma_deviation = if sma.abs() > EPSILON { last / sma - 1.0 } else { 0.0 };

    let path: f64 = slice.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    let efficiency_ratio = if path > EPSILON {
        ((last - slice[0]).abs() / path).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let net_up_ratio = if returns.is_empty() {
        0.0
    } else {
        let up = returns.iter().filter(|&&r| r > 0.0).count() as f64;
        let down = returns.iter().filter(|&&r| r < 0.0).count() as f64;
        (up - down) / returns.len() as f64
    };

    let volume_ratio = if long_run_volume > EPSILON {
        finite_or(mean(volume_slice) / long_run_volume, 1.0)
    } else {
        1.0
    };

    WindowFeatures {
        window,
        samples: returns.len(),
        complete,
        mean_return: mean(&returns),
        volatility: std_dev(&returns),
        downside_volatility: downside_deviation(&returns),
        momentum: window_roc(slice),
        rsi: window_rsi(slice),
        skewness: skewness(&returns),
        kurtosis: excess_kurtosis(&returns),
        max_drawdown: max_drawdown(slice),
        range_position,
        sma_deviation,
        efficiency_ratio,
        net_up_ratio,
        volume_ratio,
    }
}

/// MACD set normalised to a percentage of the last close.
fn macd_features(closes: &[f64], last_close: f64, params: (usize, usize, usize)) -> MacdFeatures {
    let (fast, slow, signal_period) = params;
    match calculate_macd(closes, fast, slow, signal_period) {
        Some(result) if last_close.abs() > EPSILON => {
            let scale = 100.0 / last_close;
            MacdFeatures {
                fast,
                slow,
                signal_period,
                available: true,
                macd: result.macd * scale,
                signal: result.signal * scale,
                histogram: result.histogram * scale,
            }
        }
        _ => MacdFeatures::unavailable(params),
    }
}

/// Signed R² of a linear fit to log prices (raw prices when any is
/// non-positive): +1 for a perfectly steady rise, -1 for a steady fall.
fn trend_strength(closes: &[f64]) -> f64 {
    let (slope, r_squared) = if closes.iter().all(|&c| c > 0.0) {
        let logs: Vec<f64> = closes.iter().map(|c| c.ln()).collect();
        linear_fit(&logs)
    } else {
        linear_fit(closes)
    };
    if slope > 0.0 {
        r_squared
    } else if slope < 0.0 {
        -r_squared
    } else {
        0.0
    }
}

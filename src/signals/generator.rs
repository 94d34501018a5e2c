// =============================================================================
// Signal Generator — prediction + context → labelled Signal
// =============================================================================
//
// Label thresholds:
//   STRONG_BUY   prediction ≥  0.6 and confidence ≥ 0.7
//   BUY          prediction ≥  0.3
//   STRONG_SELL  prediction ≤ -0.6 and confidence ≥ 0.7
//   SELL         prediction ≤ -0.3
//   HOLD         otherwise
//
// Risk metrics are heuristics derived from current volatility, not
// measurements over realised trades.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceWeights;
use crate::features::FeatureBundle;
use crate::predictors::{ComponentVotes, PREDICTOR_COUNT};
use crate::regime::Regime;
use crate::types::{Direction, SignalLabel};

const STRONG_THRESHOLD: f64 = 0.6;
const ENTRY_THRESHOLD: f64 = 0.3;
const STRONG_CONFIDENCE: f64 = 0.7;

/// Floor on volatility in the Sharpe estimate.
const SHARPE_VOL_FLOOR: f64 = 1e-4;

/// Candles over which the drawdown heuristic projects volatility.
const DRAWDOWN_HORIZON: f64 = 20.0;

/// Volume ratio at which the volume-confirmation term saturates.
const VOLUME_SATURATION: f64 = 2.0;

/// Risk heuristics attached to every signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Mean per-window return volatility.
    pub volatility: f64,
    /// prediction / max(volatility, 1e-4).
    pub sharpe_estimate: f64,
    /// 1 - exp(-2 σ √20): grows monotonically with volatility, in [0, 1).
    pub max_drawdown_estimate: f64,
}

/// Share of the prediction attributable to each feature group. Sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Gradient-style predictor (momentum, RSI, MACD stumps).
    pub momentum: f64,
    /// Regime-adaptive predictor.
    pub volatility: f64,
    /// Mean-reversion predictor (VWAP deviation).
    pub volume: f64,
    /// Trend-following predictor (cross-scale agreement).
    pub fractal: f64,
}

impl FeatureImportance {
    pub fn total(&self) -> f64 {
        self.momentum + self.volatility + self.volume + self.fractal
    }

    /// Normalised magnitudes of per-predictor `weight × vote` contributions,
    /// ordered gradient, trend-following, mean-reversion, regime-adaptive.
    pub fn from_contributions(contributions: &[f64; PREDICTOR_COUNT]) -> Self {
        let magnitudes = contributions.map(|c| if c.is_finite() { c.abs() } else { 0.0 });
        let total: f64 = magnitudes.iter().sum();
        if total <= f64::EPSILON {
            return Self {
                momentum: 0.25,
                volatility: 0.25,
                volume: 0.25,
                fractal: 0.25,
            };
        }
        let [gradient, trend, mean_reversion, adaptive] = magnitudes.map(|m| m / total);
        Self {
            momentum: gradient,
            volatility: adaptive,
            volume: mean_reversion,
            fractal: trend,
        }
    }
}

/// Complete output of one `generate_signal` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub label: SignalLabel,
    pub direction: Direction,
    /// Ensemble prediction, [-1, 1].
    pub prediction: f64,
    /// [0, 1].
    pub confidence: f64,
    pub regime: Regime,
    pub risk: RiskMetrics,
    pub feature_importance: FeatureImportance,
    pub votes: ComponentVotes,
    /// Timestamp of the last candle the signal was computed from (ms).
    pub timestamp: i64,
    /// Some windows ran on truncated history.
    pub low_confidence: bool,
}

/// Map prediction and confidence to a label.
pub fn classify_label(prediction: f64, confidence: f64) -> SignalLabel {
    if prediction >= STRONG_THRESHOLD && confidence >= STRONG_CONFIDENCE {
        SignalLabel::StrongBuy
    } else if prediction >= ENTRY_THRESHOLD {
        SignalLabel::Buy
    } else if prediction <= -STRONG_THRESHOLD && confidence >= STRONG_CONFIDENCE {
        SignalLabel::StrongSell
    } else if prediction <= -ENTRY_THRESHOLD {
        SignalLabel::Sell
    } else {
        SignalLabel::Hold
    }
}

/// Confidence in [0, 1] from entropy, cross-window agreement, volume
/// confirmation and a regime offset, scaled down by missing history.
pub fn confidence(bundle: &FeatureBundle, regime: Regime, weights: &ConfidenceWeights) -> f64 {
    let order = 1.0 - bundle.normalized_entropy.clamp(0.0, 1.0);
    let (_, consistency) = bundle.momentum_consistency();
    let volume = (bundle.volume_ratio / VOLUME_SATURATION).clamp(0.0, 1.0);

    let regime_offset = match regime {
        Regime::Trending => weights.trending_bonus,
        Regime::Volatile => -weights.volatile_penalty,
        Regime::Ranging => 0.0,
    };

    let base = weights.entropy * order
        + weights.consistency * consistency
        + weights.volume * volume
        + regime_offset;
    let coverage_scale = 0.5 + 0.5 * bundle.coverage.clamp(0.0, 1.0);

    let value = base * coverage_scale;
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn risk_metrics(prediction: f64, bundle: &FeatureBundle) -> RiskMetrics {
    let volatility = bundle.regime_volatility.max(0.0);
    RiskMetrics {
        volatility,
        sharpe_estimate: prediction / volatility.max(SHARPE_VOL_FLOOR),
        max_drawdown_estimate: 1.0 - (-2.0 * volatility * DRAWDOWN_HORIZON.sqrt()).exp(),
    }
}

/// Assemble the signal for an already-combined `prediction`.
///
/// `contributions` are the per-predictor `weight × vote` terms that summed to
/// the prediction; they drive the feature importance.
pub fn generate(
    prediction: f64,
    bundle: &FeatureBundle,
    regime: Regime,
    votes: ComponentVotes,
    contributions: &[f64; PREDICTOR_COUNT],
    weights: &ConfidenceWeights,
) -> Signal {
    let confidence = confidence(bundle, regime, weights);
    let label = classify_label(prediction, confidence);

    Signal {
        label,
        direction: label.direction(),
        prediction,
        confidence,
        regime,
        risk: risk_metrics(prediction, bundle),
        feature_importance: FeatureImportance::from_contributions(contributions),
        votes,
        timestamp: bundle.last_timestamp,
        low_confidence: bundle.is_low_confidence(),
    }
}

// =============================================================================
// Market Regime Detector
// =============================================================================
//
// Classifies the market into one of three regimes from feature aggregates.
//
// Detection hierarchy (evaluated top-to-bottom; first match wins):
//
//   1. VOLATILE  — mean per-window return volatility > volatility threshold
//   2. TRENDING  — mean absolute per-window momentum   > momentum threshold
//   3. RANGING   — everything else
//
// The regime is never stored on its own; it is recomputed from the current
// feature bundle on every call.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::features::FeatureBundle;

// =============================================================================
// Types
// =============================================================================

/// High-level market regime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Wide swings; per-candle volatility dominates any direction.
    Volatile,
    /// Persistent directional move across windows.
    Trending,
    /// Sideways, mean-reverting price action.
    Ranging,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Volatile, Regime::Trending, Regime::Ranging];
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Volatile => write!(f, "VOLATILE"),
            Self::Trending => write!(f, "TRENDING"),
            Self::Ranging => write!(f, "RANGING"),
        }
    }
}

fn default_volatility_threshold() -> f64 {
    0.05
}

fn default_momentum_threshold() -> f64 {
    0.02
}

/// Named, overridable classification thresholds (fractions, 0.05 = 5 %).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeThresholds {
    /// Mean per-window volatility above which the market is `Volatile`.
    #[serde(default = "default_volatility_threshold")]
    pub volatility_threshold: f64,

    /// Mean absolute momentum above which the market is `Trending`.
    #[serde(default = "default_momentum_threshold")]
    pub momentum_threshold: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            volatility_threshold: default_volatility_threshold(),
            momentum_threshold: default_momentum_threshold(),
        }
    }
}

// =============================================================================
// Classification logic
// =============================================================================

/// Classify the regime of `bundle` under `thresholds`.
pub fn detect_regime(bundle: &FeatureBundle, thresholds: &RegimeThresholds) -> Regime {
    classify(
        bundle.mean_volatility(),
        bundle.mean_abs_momentum(),
        thresholds,
    )
}

fn classify(mean_volatility: f64, mean_abs_momentum: f64, thresholds: &RegimeThresholds) -> Regime {
    let regime = if mean_volatility > thresholds.volatility_threshold {
        Regime::Volatile
    } else if mean_abs_momentum > thresholds.momentum_threshold {
        Regime::Trending
    } else {
        Regime::Ranging
    };

    trace!(
        regime = %regime,
        volatility = format!("{:.4}", mean_volatility),
        momentum = format!("{:.4}", mean_abs_momentum),
        "Regime classified"
    );

    regime
}

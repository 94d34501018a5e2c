// =============================================================================
// Engine Configuration — tunable constants with serde defaults
// =============================================================================
//
// Every tunable of the signal engine lives here. All fields carry
// `#[serde(default)]` so a partial JSON document (or none at all) produces a
// complete configuration. The engine receives this by value at construction;
// reading it from disk is the host's job (see `host::runtime_config`).
//
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::regime::{RegimeThresholds, DEFAULT_BUCKETS};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_learning_rate() -> f64 {
    0.01
}

fn default_entropy_buckets() -> usize {
    DEFAULT_BUCKETS
}

fn default_volume_lookback() -> usize {
    20
}

fn default_volume_surge_clip() -> f64 {
    5.0
}

fn default_entropy_weight() -> f64 {
    0.4
}

fn default_consistency_weight() -> f64 {
    0.35
}

fn default_volume_weight() -> f64 {
    0.25
}

fn default_regime_offset() -> f64 {
    0.1
}

// =============================================================================
// ConfidenceWeights
// =============================================================================

/// Blend of the confidence terms.
///
/// base = entropy × (1 - normalised entropy)
///      + consistency × momentum sign agreement
///      + volume × clamp(volume ratio / 2, 0, 1)
///
/// then `trending_bonus` is added in a trending regime and `volatile_penalty`
/// subtracted in a volatile one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    #[serde(default = "default_entropy_weight")]
    pub entropy: f64,

    #[serde(default = "default_consistency_weight")]
    pub consistency: f64,

    #[serde(default = "default_volume_weight")]
    pub volume: f64,

    #[serde(default = "default_regime_offset")]
    pub trending_bonus: f64,

    #[serde(default = "default_regime_offset")]
    pub volatile_penalty: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            entropy: default_entropy_weight(),
            consistency: default_consistency_weight(),
            volume: default_volume_weight(),
            trending_bonus: default_regime_offset(),
            volatile_penalty: default_regime_offset(),
        }
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Configuration for one [`SignalEngine`](crate::engine::SignalEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Volatility / momentum thresholds for regime classification.
    #[serde(default)]
    pub regime: RegimeThresholds,

    /// Step size of the weight adapter.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Histogram buckets for the return-distribution entropy.
    #[serde(default = "default_entropy_buckets")]
    pub entropy_buckets: usize,

    /// Number of prior candles the volume surge z-score compares against.
    #[serde(default = "default_volume_lookback")]
    pub volume_lookback: usize,

    /// Absolute cap on the volume surge z-score.
    #[serde(default = "default_volume_surge_clip")]
    pub volume_surge_clip: f64,

    /// Weights of the signal confidence terms.
    #[serde(default)]
    pub confidence: ConfidenceWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regime: RegimeThresholds::default(),
            learning_rate: default_learning_rate(),
            entropy_buckets: default_entropy_buckets(),
            volume_lookback: default_volume_lookback(),
            volume_surge_clip: default_volume_surge_clip(),
            confidence: ConfidenceWeights::default(),
        }
    }
}

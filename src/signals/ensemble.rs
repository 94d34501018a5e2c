// =============================================================================
// Ensemble Weights & Combiner
// =============================================================================
//
// `EnsembleWeights` can only be built through a validating constructor, so a
// value of the type always holds four finite, non-negative weights summing to
// 1 (±1e-6). Deserialisation goes through the same check.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::predictors::{clip_vote, ComponentVotes, PredictorKind, PREDICTOR_COUNT};

/// Allowed drift of the weight sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Gradient 0.4, trend-following 0.3, mean-reversion 0.2, regime-adaptive 0.1.
pub const DEFAULT_WEIGHTS: [f64; PREDICTOR_COUNT] = [0.4, 0.3, 0.2, 0.1];

/// Normalised, non-negative weight per component predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NamedWeights", into = "NamedWeights")]
pub struct EnsembleWeights([f64; PREDICTOR_COUNT]);

impl EnsembleWeights {
    /// Accept `weights` unchanged, but only if they already form a
    /// distribution.
    pub fn new(weights: [f64; PREDICTOR_COUNT]) -> Result<Self, EngineError> {
        check_components(&weights)?;
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidWeights {
                reason: format!("weights sum to {sum}, expected 1"),
            });
        }
        Ok(Self(weights))
    }

    /// Scale non-negative `raw` weights so they sum to 1.
    pub fn normalized(raw: [f64; PREDICTOR_COUNT]) -> Result<Self, EngineError> {
        check_components(&raw)?;
        let sum: f64 = raw.iter().sum();
        if sum <= f64::EPSILON {
            return Err(EngineError::InvalidWeights {
                reason: "all weights are zero".to_string(),
            });
        }
        Ok(Self(raw.map(|w| w / sum)))
    }

    pub fn as_array(&self) -> [f64; PREDICTOR_COUNT] {
        self.0
    }

    pub fn get(&self, kind: PredictorKind) -> f64 {
        self.0[kind.index()]
    }

    /// Per-predictor `weight × vote`.
    pub fn contributions(&self, votes: &ComponentVotes) -> [f64; PREDICTOR_COUNT] {
        let v = votes.as_array();
        [
            self.0[0] * v[0],
            self.0[1] * v[1],
            self.0[2] * v[2],
            self.0[3] * v[3],
        ]
    }
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self(DEFAULT_WEIGHTS)
    }
}

impl TryFrom<[f64; PREDICTOR_COUNT]> for EnsembleWeights {
    type Error = EngineError;

    fn try_from(weights: [f64; PREDICTOR_COUNT]) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

fn check_components(weights: &[f64; PREDICTOR_COUNT]) -> Result<(), EngineError> {
    for (kind, &w) in PredictorKind::ALL.iter().zip(weights) {
        if !w.is_finite() {
            return Err(EngineError::InvalidWeights {
                reason: format!("{kind} weight is not finite"),
            });
        }
        if w < 0.0 {
            return Err(EngineError::InvalidWeights {
                reason: format!("{kind} weight {w} is negative"),
            });
        }
    }
    Ok(())
}

/// On-disk form of the weights, one named field per predictor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct NamedWeights {
    gradient: f64,
    trend_following: f64,
    mean_reversion: f64,
    regime_adaptive: f64,
}

impl TryFrom<NamedWeights> for EnsembleWeights {
    type Error = EngineError;

    fn try_from(named: NamedWeights) -> Result<Self, Self::Error> {
        Self::new([
            named.gradient,
            named.trend_following,
            named.mean_reversion,
            named.regime_adaptive,
        ])
    }
}

impl From<EnsembleWeights> for NamedWeights {
    fn from(weights: EnsembleWeights) -> Self {
        let [gradient, trend_following, mean_reversion, regime_adaptive] = weights.0;
        Self {
            gradient,
            trend_following,
            mean_reversion,
            regime_adaptive,
        }
    }
}

/// Weighted dot product of component votes, clipped to [-1, 1].
pub fn combine(votes: &ComponentVotes, weights: &EnsembleWeights) -> f64 {
    clip_vote(weights.contributions(votes).iter().sum())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn votes(v: [f64; 4]) -> ComponentVotes {
        ComponentVotes {
            gradient: v[0],
            trend_following: v[1],
            mean_reversion: v[2],
            regime_adaptive: v[3],
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let w = EnsembleWeights::default();
        assert!((w.as_array().iter().sum::<f64>() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert_eq!(w.get(PredictorKind::Gradient), 0.4);
        assert_eq!(w.get(PredictorKind::RegimeAdaptive), 0.1);
    }

    #[test]
    fn new_rejects_bad_vectors() {
        assert!(EnsembleWeights::new([0.5, 0.5, 0.5, 0.5]).is_err());
        assert!(EnsembleWeights::new([1.2, -0.2, 0.0, 0.0]).is_err());
        assert!(EnsembleWeights::new([f64::NAN, 0.5, 0.25, 0.25]).is_err());
        assert!(EnsembleWeights::new([0.25; 4]).is_ok());
    }

    #[test]
    fn normalized_scales_to_one() {
        let w = EnsembleWeights::normalized([2.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(w.as_array(), [0.5, 0.25, 0.25, 0.0]);
        assert!(matches!(
            EnsembleWeights::normalized([0.0; 4]),
            Err(EngineError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn combine_is_dot_product() {
        let w = EnsembleWeights::default();
        let p = combine(&votes([1.0, 1.0, -1.0, 1.0]), &w);
        assert!((p - 0.6).abs() < 1e-12);
        assert_eq!(combine(&votes([0.0; 4]), &w), 0.0);
        assert!((combine(&votes([-1.0; 4]), &w) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn serde_uses_named_fields_and_validates() {
        let json = serde_json::to_string(&EnsembleWeights::default()).unwrap();
        assert!(json.contains("\"trend_following\":0.3"));
        let back: EnsembleWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EnsembleWeights::default());

        let bad = r#"{"gradient":0.9,"trend_following":0.9,"mean_reversion":0.0,"regime_adaptive":0.0}"#;
        assert!(serde_json::from_str::<EnsembleWeights>(bad).is_err());
    }
}

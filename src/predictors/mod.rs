// =============================================================================
// Component Predictors
// =============================================================================
//
// Four independent heuristic strategies, each a pure function
// `(bundle, regime) -> vote` with the vote clipped to [-1, 1]:
// - gradient:       fixed table of threshold stumps
// - trend:          momentum weighted by cross-window sign agreement
// - mean_reversion: VWAP deviation combined with RSI extremes
// - adaptive:       picks (or blends) the two above by regime

pub mod adaptive;
pub mod gradient;
pub mod mean_reversion;
pub mod trend;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::features::FeatureBundle;
use crate::regime::Regime;

/// Number of component predictors in the ensemble.
pub const PREDICTOR_COUNT: usize = 4;

/// Identifies one component predictor. The order of [`PredictorKind::ALL`] is
/// the order of every 4-element vote / weight array in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    Gradient,
    TrendFollowing,
    MeanReversion,
    RegimeAdaptive,
}

impl PredictorKind {
    pub const ALL: [PredictorKind; PREDICTOR_COUNT] = [
        PredictorKind::Gradient,
        PredictorKind::TrendFollowing,
        PredictorKind::MeanReversion,
        PredictorKind::RegimeAdaptive,
    ];

    /// Position of this predictor in vote / weight arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Gradient => 0,
            Self::TrendFollowing => 1,
            Self::MeanReversion => 2,
            Self::RegimeAdaptive => 3,
        }
    }
}

impl std::fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gradient => write!(f, "gradient"),
            Self::TrendFollowing => write!(f, "trend_following"),
            Self::MeanReversion => write!(f, "mean_reversion"),
            Self::RegimeAdaptive => write!(f, "regime_adaptive"),
        }
    }
}

/// One vote per component predictor, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentVotes {
    pub gradient: f64,
    pub trend_following: f64,
    pub mean_reversion: f64,
    pub regime_adaptive: f64,
}

impl ComponentVotes {
    pub fn as_array(&self) -> [f64; PREDICTOR_COUNT] {
        [
            self.gradient,
            self.trend_following,
            self.mean_reversion,
            self.regime_adaptive,
        ]
    }

    pub fn get(&self, kind: PredictorKind) -> f64 {
        self.as_array()[kind.index()]
    }
}

/// Run every component predictor over `bundle`.
pub fn predict_all(bundle: &FeatureBundle, regime: Regime) -> ComponentVotes {
    let votes = ComponentVotes {
        gradient: gradient::predict(bundle, regime),
        trend_following: trend::predict(bundle, regime),
        mean_reversion: mean_reversion::predict(bundle, regime),
        regime_adaptive: adaptive::predict(bundle, regime),
    };

    trace!(
        gradient = format!("{:.3}", votes.gradient),
        trend = format!("{:.3}", votes.trend_following),
        mean_reversion = format!("{:.3}", votes.mean_reversion),
        adaptive = format!("{:.3}", votes.regime_adaptive),
        "Component votes"
    );

    votes
}

/// Clip a raw vote into [-1, 1], mapping non-finite input to 0.
pub(crate) fn clip_vote(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

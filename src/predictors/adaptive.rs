// =============================================================================
// Regime-adaptive Predictor
// =============================================================================
//
//   TRENDING → trend-following vote
//   RANGING  → mean-reversion vote
//   VOLATILE → equal-weight blend of both

use crate::features::FeatureBundle;
use crate::predictors::{clip_vote, mean_reversion, trend};
use crate::regime::Regime;

pub fn predict(bundle: &FeatureBundle, regime: Regime) -> f64 {
    match regime {
        Regime::Trending => trend::predict(bundle, regime),
        Regime::Ranging => mean_reversion::predict(bundle, regime),
        Regime::Volatile => clip_vote(
            0.5 * trend::predict(bundle, regime) + 0.5 * mean_reversion::predict(bundle, regime),
        ),
    }
}

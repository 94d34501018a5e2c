// =============================================================================
// Trend-following Predictor
// =============================================================================
//
// vote = direction × tanh(|mean momentum| / MOMENTUM_SCALE) × agreement
//
// `direction` and the agreement share come from the sign of momentum across
// all windows. Agreement maps a 50 % split to 0 and unanimity to 1, so a
// market whose windows disagree is attenuated toward 0.

use crate::features::{FeatureBundle, FEATURE_WINDOWS};
use crate::predictors::clip_vote;
use crate::regime::Regime;

/// Mean momentum at which the vote reaches tanh(1) ≈ 0.76 of full size.
const MOMENTUM_SCALE: f64 = 0.05;

pub fn predict(bundle: &FeatureBundle, _regime: Regime) -> f64 {
    let (direction, consistency) = bundle.momentum_consistency();
    if direction == 0.0 {
        return 0.0;
    }
    let agreement = ((consistency - 0.5) * 2.0).max(0.0);
    let magnitude = (bundle.mean_momentum(&FEATURE_WINDOWS).abs() / MOMENTUM_SCALE).tanh();
    clip_vote(direction * magnitude * agreement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_momenta(momenta: [f64; 6]) -> FeatureBundle {
        let mut bundle = FeatureBundle::neutral();
        for (w, m) in bundle.windows.iter_mut().zip(momenta) {
            w.momentum = m;
        }
        bundle
    }

    #[test]
    fn unanimous_trend_votes_with_it() {
        let up = predict(&with_momenta([0.05; 6]), Regime::Trending);
        assert!((up - 1.0_f64.tanh()).abs() < 1e-12);
        let down = predict(&with_momenta([-0.05; 6]), Regime::Trending);
        assert!((down + 1.0_f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn disagreement_attenuates() {
        let unanimous = predict(&with_momenta([0.04; 6]), Regime::Trending);
        let mixed = predict(
            &with_momenta([0.08, 0.08, 0.08, 0.08, -0.04, -0.04]),
            Regime::Trending,
        );
        assert!(mixed > 0.0);
        assert!(mixed < unanimous);
    }

    #[test]
    fn even_split_is_silent() {
        let bundle = with_momenta([0.05, 0.05, 0.05, -0.05, -0.05, -0.05]);
        assert_eq!(predict(&bundle, Regime::Trending), 0.0);
    }

    #[test]
    fn flat_market_is_silent() {
        assert_eq!(predict(&FeatureBundle::neutral(), Regime::Ranging), 0.0);
    }
}

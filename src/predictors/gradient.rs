// =============================================================================
// Gradient-style Predictor — fixed table of threshold stumps
// =============================================================================
//
// Each stump reads one scalar from the bundle and contributes `+vote` when the
// value is above `threshold`, `-vote` when below `-threshold`, nothing in
// between. The partial votes are summed and clipped to [-1, 1].
//
//   stump                      threshold   vote
//   short momentum (7/14/21)     0.01      0.25
//   long momentum (50/100/200)   0.03      0.20
//   RSI-14 deviation from 50     0.20      0.15
//   trend strength               0.50      0.25
//   confirmed volume surge       1.00      0.10
//   MACD composite (% price)     0.05      0.15

use crate::features::{FeatureBundle, LONG_WINDOWS, SHORT_WINDOWS};
use crate::indicators::rsi::NEUTRAL_RSI;
use crate::predictors::clip_vote;
use crate::regime::Regime;

/// Momentum inside this band has no sign.
const SIGN_DEADBAND: f64 = 1e-9;

struct Stump {
    feature: fn(&FeatureBundle) -> f64,
    threshold: f64,
    vote: f64,
}

impl Stump {
    fn evaluate(&self, bundle: &FeatureBundle) -> f64 {
        let value = (self.feature)(bundle);
        if value > self.threshold {
            self.vote
        } else if value < -self.threshold {
            -self.vote
        } else {
            0.0
        }
    }
}

#[rustfmt::skip]
const STUMPS: [Stump; 6] = [
    Stump { feature: short_momentum, threshold: 0.01, vote: 0.25 },
    Stump { feature: long_momentum, threshold: 0.03, vote: 0.20 },
    Stump { feature: rsi_deviation, threshold: 0.20, vote: 0.15 },
    Stump { feature: trend_strength, threshold: 0.50, vote: 0.25 },
    Stump { feature: confirmed_volume_surge, threshold: 1.00, vote: 0.10 },
    Stump { feature: macd_composite, threshold: 0.05, vote: 0.15 },
];

fn short_momentum(bundle: &FeatureBundle) -> f64 {
    bundle.mean_momentum(&SHORT_WINDOWS)
}

fn long_momentum(bundle: &FeatureBundle) -> f64 {
    bundle.mean_momentum(&LONG_WINDOWS)
}

fn rsi_deviation(bundle: &FeatureBundle) -> f64 {
    (bundle.rsi_14() - NEUTRAL_RSI) / NEUTRAL_RSI
}

fn trend_strength(bundle: &FeatureBundle) -> f64 {
    bundle.trend_strength
}

/// Positive volume surge, signed by the direction of short-term momentum. A
/// surge with no price move carries no direction.
fn confirmed_volume_surge(bundle: &FeatureBundle) -> f64 {
    let momentum = short_momentum(bundle);
    let direction = if momentum > SIGN_DEADBAND {
        1.0
    } else if momentum < -SIGN_DEADBAND {
        -1.0
    } else {
        0.0
    };
    bundle.volume_surge.max(0.0) * direction
}

fn macd_composite(bundle: &FeatureBundle) -> f64 {
    bundle.macd_composite
}

/// Sum of stump votes, clipped to [-1, 1]. The regime is not consulted.
pub fn predict(bundle: &FeatureBundle, _regime: Regime) -> f64 {
    clip_vote(STUMPS.iter().map(|s| s.evaluate(bundle)).sum())
}

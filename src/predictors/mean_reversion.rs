// =============================================================================
// Mean-reversion Predictor
// =============================================================================
//
// Fades stretched prices:
//   - VWAP leg: price above VWAP votes down, below votes up; magnitude grows
//     with distance via tanh(deviation / VWAP_SCALE)
//   - RSI leg:  RSI-14 above 70 votes down, below 30 votes up, linear to the
//     extreme; 0 inside the 30-70 band
//
// vote = clip(0.6 × VWAP leg + 0.4 × RSI leg)

use crate::features::FeatureBundle;
use crate::predictors::clip_vote;
use crate::regime::Regime;

const VWAP_SCALE: f64 = 0.05;
const VWAP_WEIGHT: f64 = 0.6;
const RSI_WEIGHT: f64 = 0.4;

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

fn rsi_component(rsi: f64) -> f64 {
    if rsi > RSI_OVERBOUGHT {
        -(rsi - RSI_OVERBOUGHT) / (100.0 - RSI_OVERBOUGHT)
    } else if rsi < RSI_OVERSOLD {
        (RSI_OVERSOLD - rsi) / RSI_OVERSOLD
    } else {
        0.0
    }
}

pub fn predict(bundle: &FeatureBundle, _regime: Regime) -> f64 {
    let vwap_leg = -(bundle.vwap_deviation / VWAP_SCALE).tanh();
    let rsi_leg = rsi_component(bundle.rsi_14());
    clip_vote(VWAP_WEIGHT * vwap_leg + RSI_WEIGHT * rsi_leg)
}

// =============================================================================
// Weight Adapter — one gradient-style step per realised outcome
// =============================================================================
//
//   error = outcome - prediction
//   w_i  += learning_rate × error × sign(vote_i)
//   w_i   = max(w_i, 0)
//   w     = w / Σw
//
// A predictor that voted the same way as the error gains weight; one that
// voted against it loses weight. Votes within VOTE_DEADBAND of zero leave
// their weight untouched before renormalisation.

use tracing::{trace, warn};

use crate::predictors::{ComponentVotes, PREDICTOR_COUNT};
use crate::signals::EnsembleWeights;

/// |vote| below this has no sign.
pub const VOTE_DEADBAND: f64 = 1e-9;

fn vote_sign(vote: f64) -> f64 {
    if vote > VOTE_DEADBAND {
        1.0
    } else if vote < -VOTE_DEADBAND {
        -1.0
    } else {
        0.0
    }
}

/// Weights after one adaptation step. Falls back to `current` if the step
/// would zero every weight.
pub fn adapt_weights(
    current: &EnsembleWeights,
    votes: &ComponentVotes,
    prediction: f64,
    outcome: f64,
    learning_rate: f64,
) -> EnsembleWeights {
    let error = outcome - prediction;
    let w = current.as_array();
    let v = votes.as_array();

    let raw: [f64; PREDICTOR_COUNT] =
        std::array::from_fn(|i| (w[i] + learning_rate * error * vote_sign(v[i])).max(0.0));

    match EnsembleWeights::normalized(raw) {
        Ok(updated) => {
            trace!(
                error = format!("{:.4}", error),
                before = ?w,
                after = ?updated.as_array(),
                "Ensemble weights adapted"
            );
            updated
        }
        Err(e) => {
            warn!(error = %e, "Weight update rejected; keeping previous weights");
            *current
        }
    }
}

// =============================================================================
// Engine Errors
// =============================================================================
//
// Only caller-contract violations surface as errors. Numerical edge cases
// (zero volume, flat prices, short history) are absorbed inside the feature
// pipeline and show up as a lower-confidence signal instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// `learn` was called before any signal had been generated.
    #[error("no recorded prediction to learn from")]
    NoPrediction,

    /// Realised outcomes must lie in [-1, 1].
    #[error("outcome {outcome} is outside [-1, 1]")]
    OutcomeOutOfRange { outcome: f64 },

    /// The most recent record already carries an outcome.
    #[error("the most recent prediction already has an outcome")]
    OutcomeAlreadyRecorded,

    /// A weight vector could not be normalised (negative, non-finite, or all
    /// zero).
    #[error("invalid ensemble weights: {reason}")]
    InvalidWeights { reason: String },

    /// A candle series failed validation.
    #[error("invalid candle at index {index}: {reason}")]
    InvalidSeries { index: usize, reason: String },
}

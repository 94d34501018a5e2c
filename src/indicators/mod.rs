// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the feature
// extractor aggregates. Functions that can be undefined return `Option<T>`;
// the rest document the neutral value they fall back to.

pub mod bollinger;
pub mod ema;
pub mod roc;
pub mod rsi;
pub mod spectral;
pub mod stats;
pub mod volume;

// =============================================================================
// Regime Detection Module
// =============================================================================
//
// Market regime classification plus the two long-memory / information
// statistics the feature bundle carries:
// - Hurst exponent (persistence vs mean-reversion)
// - Shannon entropy (randomness of the return distribution)

pub mod detector;
pub mod entropy;
pub mod hurst;

pub use detector::{detect_regime, Regime, RegimeThresholds};
pub use entropy::{shannon_entropy, EntropyReading, DEFAULT_BUCKETS};
pub use hurst::{calculate_hurst_exponent, NEUTRAL_HURST};

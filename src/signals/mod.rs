// =============================================================================
// Signals Module
// =============================================================================
//
// From component votes to the published signal:
// - Ensemble weights (normalised smart constructor) and the weighted combiner
// - Signal generation: confidence, label, risk heuristics, feature importance

pub mod ensemble;
pub mod generator;

pub use ensemble::{combine, EnsembleWeights, DEFAULT_WEIGHTS, WEIGHT_SUM_TOLERANCE};
pub use generator::{classify_label, FeatureImportance, RiskMetrics, Signal};

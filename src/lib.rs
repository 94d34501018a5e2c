// =============================================================================
// Adaptive Signal Engine
// =============================================================================
//
// Candle series in, calibrated directional signal out. Multi-window feature
// extraction, regime detection, a four-predictor weighted ensemble and an
// online weight-adaptation loop over a bounded prediction memory.
//
// The engine (`engine::SignalEngine`) is synchronous, does no I/O and holds
// all learned state itself. File handling and multi-symbol hosting live in
// `host`.
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod host;
pub mod indicators;
pub mod learning;
pub mod market_data;
pub mod predictors;
pub mod regime;
pub mod signals;
pub mod types;

pub use config::{ConfidenceWeights, EngineConfig};
pub use engine::{EngineSnapshot, SignalEngine};
pub use error::EngineError;
pub use features::{extract_features, FeatureBundle};
pub use market_data::Candle;
pub use predictors::{ComponentVotes, PredictorKind};
pub use regime::{Regime, RegimeThresholds};
pub use signals::{EnsembleWeights, FeatureImportance, RiskMetrics, Signal};
pub use types::{Direction, SignalLabel};

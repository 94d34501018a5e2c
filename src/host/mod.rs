// =============================================================================
// Host Module
// =============================================================================
//
// Everything around the engine that touches files or threads. The engine
// itself never calls into this module.
// - registry:       one mutex-guarded engine per symbol
// - runtime_config: host settings file (JSON, atomic save)
// - persistence:    engine snapshots and candle files

pub mod persistence;
pub mod registry;
pub mod runtime_config;

pub use registry::{EngineRegistry, SharedEngine};
pub use runtime_config::RuntimeConfig;

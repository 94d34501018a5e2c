// =============================================================================
// Learning Module
// =============================================================================
//
// Online feedback loop of the engine:
// - memory:      bounded FIFO log of predictions and their outcomes
// - adapter:     one weight-update step per realised outcome
// - performance: per-regime error / accuracy scorecard

pub mod adapter;
pub mod memory;
pub mod performance;

pub use adapter::adapt_weights;
pub use memory::{MemoryRecord, MemoryStore, MEMORY_CAPACITY};
pub use performance::{regime_performance, RegimePerformance};

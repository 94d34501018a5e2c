// =============================================================================
// Engine Registry — one engine per symbol
// =============================================================================
//
// Learned weights and memory are per-instrument state, so every symbol gets
// its own `SignalEngine` behind its own mutex. Concurrency notes:
//   - parking_lot::RwLock guards the symbol map (read-mostly)
//   - parking_lot::Mutex serialises calls into a single engine
//   - distinct symbols never contend on the same engine lock

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::SignalEngine;

pub type SharedEngine = Arc<Mutex<SignalEngine>>;

pub struct EngineRegistry {
    config: EngineConfig,
    engines: RwLock<HashMap<String, SharedEngine>>,
}

impl EngineRegistry {
    /// Registry whose engines are created from `config`.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Engine for `symbol`, created on first use.
    pub fn engine(&self, symbol: &str) -> SharedEngine {
        let key = symbol.to_uppercase();
        if let Some(engine) = self.engines.read().get(&key) {
            return Arc::clone(engine);
        }

        let mut engines = self.engines.write();
        Arc::clone(engines.entry(key).or_insert_with_key(|key| {
            info!(symbol = %key, "engine created");
            Arc::new(Mutex::new(SignalEngine::new(self.config.clone())))
        }))
    }

    /// Engine for `symbol` if one exists.
    pub fn get(&self, symbol: &str) -> Option<SharedEngine> {
        self.engines.read().get(&symbol.to_uppercase()).cloned()
    }

    /// Install `engine` for `symbol`, replacing any existing one.
    pub fn insert(&self, symbol: &str, engine: SignalEngine) -> SharedEngine {
        let shared = Arc::new(Mutex::new(engine));
        self.engines
            .write()
            .insert(symbol.to_uppercase(), Arc::clone(&shared));
        shared
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.engines.read().keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.engines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.read().is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

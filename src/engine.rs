// =============================================================================
// Signal Engine — per-instrument owner of weights and memory
// =============================================================================
//
// generate_signal:
//   candles → features → regime → component votes → weighted combine
//           → signal (confidence, label, risk, importance) → memory record
//
// learn:
//   outcome → error vs. latest record → weight step → renormalise
//
// The engine performs no I/O and no locking. A host that shares one engine
// between threads serialises access itself (see `host::registry`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::features::{extract_features, FeatureBundle};
use crate::learning::{
    adapt_weights, regime_performance, MemoryRecord, MemoryStore, RegimePerformance,
};
use crate::market_data::Candle;
use crate::predictors::predict_all;
use crate::regime::{detect_regime, Regime};
use crate::signals::generator::generate;
use crate::signals::{combine, EnsembleWeights, Signal};

/// Serialisable copy of an engine's learned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub weights: EnsembleWeights,
    /// Oldest first.
    pub memories: Vec<MemoryRecord>,
    pub exported_at: DateTime<Utc>,
}

/// Adaptive signal engine for one instrument.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    weights: EnsembleWeights,
    memory: MemoryStore,
}

impl SignalEngine {
    /// Engine with default weights and empty memory.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            weights: EnsembleWeights::default(),
            memory: MemoryStore::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn extract_features(&self, candles: &[Candle]) -> FeatureBundle {
        extract_features(candles, &self.config)
    }

    /// Regime of the current feature bundle.
    pub fn detect_regime(&self, bundle: &FeatureBundle) -> Regime {
        detect_regime(bundle, &self.config.regime)
    }

    /// Produce a signal for `candles` (oldest first) and record the
    /// prediction in memory.
    pub fn generate_signal(&mut self, candles: &[Candle]) -> Signal {
        let bundle = self.extract_features(candles);
        let regime = self.detect_regime(&bundle);
        let votes = predict_all(&bundle, regime);
        let contributions = self.weights.contributions(&votes);
        let prediction = combine(&votes, &self.weights);

        let signal = generate(
            prediction,
            &bundle,
            regime,
            votes,
            &contributions,
            &self.config.confidence,
        );

        self.memory.record(MemoryRecord {
            timestamp: bundle.last_timestamp,
            regime,
            prediction,
            votes,
            feature_vector: bundle.to_vector(),
            weights: self.weights,
            outcome: None,
        });

        debug!(
            regime = %regime,
            label = %signal.label,
            prediction = format!("{:.4}", prediction),
            confidence = format!("{:.3}", signal.confidence),
            memories = self.memory.len(),
            "Signal generated"
        );

        signal
    }

    /// Apply a realised outcome in [-1, 1] to the most recent prediction.
    pub fn learn(&mut self, outcome: f64) -> Result<(), EngineError> {
        if !outcome.is_finite() || !(-1.0..=1.0).contains(&outcome) {
            return Err(EngineError::OutcomeOutOfRange { outcome });
        }
        let record = self.memory.latest_mut().ok_or(EngineError::NoPrediction)?;
        if record.outcome.is_some() {
            return Err(EngineError::OutcomeAlreadyRecorded);
        }
        record.outcome = Some(outcome);

        let updated = adapt_weights(
            &self.weights,
            &record.votes,
            record.prediction,
            outcome,
            self.config.learning_rate,
        );

        debug!(
            outcome = format!("{:.4}", outcome),
            error = format!("{:.4}", outcome - record.prediction),
            weights = ?updated.as_array(),
            "Outcome learned"
        );

        self.weights = updated;
        Ok(())
    }

    pub fn regime_performance(&self) -> BTreeMap<Regime, RegimePerformance> {
        regime_performance(&self.memory)
    }

    pub fn reset_weights(&mut self) {
        info!("Ensemble weights reset to defaults");
        self.weights = EnsembleWeights::default();
    }

    pub fn clear_memories(&mut self) {
        info!(cleared = self.memory.len(), "Memory cleared");
        self.memory.clear();
    }

    pub fn weights(&self) -> EnsembleWeights {
        self.weights
    }

    pub fn set_weights(&mut self, weights: EnsembleWeights) {
        self.weights = weights;
    }

    pub fn memories(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn export_snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            weights: self.weights,
            memories: self.memory.to_vec(),
            exported_at: Utc::now(),
        }
    }

    /// Replace weights and memory with `snapshot`. Records beyond the memory
    /// bound are dropped oldest first. On error the engine is unchanged.
    pub fn import_snapshot(&mut self, snapshot: EngineSnapshot) -> Result<(), EngineError> {
        for record in &snapshot.memories {
            if let Some(outcome) = record.outcome {
                if !outcome.is_finite() || !(-1.0..=1.0).contains(&outcome) {
                    return Err(EngineError::OutcomeOutOfRange { outcome });
                }
            }
        }

        let (memory, dropped) = MemoryStore::from_records(snapshot.memories);
        if dropped > 0 {
            warn!(dropped, "Snapshot exceeds memory capacity; oldest records dropped");
        }

        self.weights = snapshot.weights;
        self.memory = memory;
        info!(
            memories = self.memory.len(),
            exported_at = %snapshot.exported_at,
            "Snapshot imported"
        );
        Ok(())
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

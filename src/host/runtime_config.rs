// =============================================================================
// Runtime Configuration — host settings file with atomic save
// =============================================================================
//
// Wraps the engine configuration with the host-only settings: which symbols
// to run and where learned state is kept between runs. All fields carry
// `#[serde(default)]` so an older or partial file always loads.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::host::persistence::write_atomic;

fn default_state_dir() -> Option<PathBuf> {
    Some(PathBuf::from("state"))
}

/// Host settings loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Symbols the host analyses. Empty means "whatever is on the command
    /// line".
    #[serde(default)]
    pub symbols: Vec<String>,

    /// Directory of per-symbol engine snapshots. `None` disables persistence.
    #[serde(default = "default_state_dir")]
    pub state_dir: Option<PathBuf>,

    /// Settings passed to every engine.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            state_dir: default_state_dir(),
            engine: EngineConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error; the caller decides whether to fall back
    /// to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            learning_rate = config.engine.learning_rate,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;
        write_atomic(path, &content)?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
        assert_eq!(cfg.state_dir, Some(PathBuf::from("state")));
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbols": ["ETHUSDT"], "engine": { "learning_rate": 0.02 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbols, vec!["ETHUSDT"]);
        assert!((cfg.engine.learning_rate - 0.02).abs() < f64::EPSILON);
        assert_eq!(cfg.engine.entropy_buckets, 10);
    }

    #[test]
    fn null_state_dir_disables_persistence() {
        let cfg: RuntimeConfig = serde_json::from_str(r#"{ "state_dir": null }"#).unwrap();
        assert!(cfg.state_dir.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime_config.json");
        let mut cfg = RuntimeConfig::default();
        cfg.symbols = vec!["BTCUSDT".into(), "SOLUSDT".into()];
        cfg.engine.regime.volatility_threshold = 0.04;

        cfg.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(RuntimeConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RuntimeConfig::load(dir.path().join("absent.json")).is_err());
    }
}

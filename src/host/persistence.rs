// =============================================================================
// Persistence — engine snapshots and candle files as JSON
// =============================================================================
//
// Snapshots live at `<state_dir>/<SYMBOL>.json`. Writes go to a `.tmp`
// sibling first and are renamed into place, so a crash never leaves a
// half-written snapshot behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::engine::EngineSnapshot;
use crate::market_data::Candle;

/// Write `content` to `path` via a temporary sibling and a rename.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");

    std::fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write tmp file {}", tmp_path.display()))?;

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp file to {}", path.display()))?;

    Ok(())
}

/// Location of the snapshot for `symbol` inside `state_dir`.
pub fn snapshot_path(state_dir: &Path, symbol: &str) -> PathBuf {
    state_dir.join(format!("{}.json", symbol.to_uppercase()))
}

pub fn save_snapshot(path: &Path, snapshot: &EngineSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create state dir {}", parent.display()))?;
    }

    let content =
        serde_json::to_string_pretty(snapshot).context("failed to serialise engine snapshot")?;
    write_atomic(path, &content)?;

    info!(
        path = %path.display(),
        memories = snapshot.memories.len(),
        "engine snapshot saved (atomic)"
    );
    Ok(())
}

/// Load the snapshot at `path`; `Ok(None)` if there is none yet.
pub fn load_snapshot(path: &Path) -> Result<Option<EngineSnapshot>> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot on disk");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
    let snapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot from {}", path.display()))?;
    Ok(Some(snapshot))
}

/// Read a JSON array of candles, oldest first.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read candles from {}", path.display()))?;
    let candles: Vec<Candle> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse candles from {}", path.display()))?;
    debug!(path = %path.display(), count = candles.len(), "candles loaded");
    Ok(candles)
}

// =============================================================================
// Signal Engine — command-line host
// =============================================================================
//
//   signal-engine SYMBOL=candles.json [SYMBOL=candles.json ...]
//
// For each symbol: restore the engine snapshot (if any), validate the candle
// file, print the signal as JSON on stdout, save the snapshot back.
//
// Environment:
//   SIGNAL_ENGINE_CONFIG     runtime config path (default runtime_config.json)
//   SIGNAL_ENGINE_STATE_DIR  snapshot directory (overrides the config file)
//   RUST_LOG                 log filter (default info)
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use adaptive_signal_engine::host::persistence::{
    load_candles, load_snapshot, save_snapshot, snapshot_path,
};
use adaptive_signal_engine::host::{EngineRegistry, RuntimeConfig};
use adaptive_signal_engine::market_data::validate_series;

const DEFAULT_CONFIG_PATH: &str = "runtime_config.json";

fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var("SIGNAL_ENGINE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(dir) = std::env::var("SIGNAL_ENGINE_STATE_DIR") {
        config.state_dir = (!dir.trim().is_empty()).then(|| PathBuf::from(dir.trim()));
    }

    // ── 2. Jobs from the command line ────────────────────────────────────
    let jobs = std::env::args()
        .skip(1)
        .map(|arg| parse_job(&arg))
        .collect::<Result<Vec<_>>>()?;
    if jobs.is_empty() {
        bail!("usage: signal-engine SYMBOL=candles.json [SYMBOL=candles.json ...]");
    }

    for (symbol, _) in &jobs {
        if !config.symbols.is_empty() && !config.symbols.contains(symbol) {
            warn!(symbol = %symbol, "symbol not listed in runtime config");
        }
    }

    info!(
        symbols = ?jobs.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>(),
        state_dir = ?config.state_dir,
        "Signal engine starting"
    );

    // ── 3. One engine per symbol ─────────────────────────────────────────
    let registry = EngineRegistry::new(config.engine.clone());

    for (symbol, candles_path) in &jobs {
        run_symbol(&registry, config.state_dir.as_deref(), symbol, candles_path)
            .with_context(|| format!("failed to process {symbol}"))?;
    }

    info!(engines = registry.len(), "Signal engine finished");
    Ok(())
}

/// Split `SYMBOL=path` into an upper-cased symbol and a path.
fn parse_job(arg: &str) -> Result<(String, PathBuf)> {
    let Some((symbol, path)) = arg.split_once('=') else {
        bail!("expected SYMBOL=path, got `{arg}`");
    };
    let symbol = symbol.trim().to_uppercase();
    let path = path.trim();
    if symbol.is_empty() || path.is_empty() {
        bail!("expected SYMBOL=path, got `{arg}`");
    }
    Ok((symbol, PathBuf::from(path)))
}

fn run_symbol(
    registry: &EngineRegistry,
    state_dir: Option<&Path>,
    symbol: &str,
    candles_path: &Path,
) -> Result<()> {
    let shared = registry.engine(symbol);
    let mut engine = shared.lock();

    let snapshot_file = state_dir.map(|dir| snapshot_path(dir, symbol));
    if let Some(path) = &snapshot_file {
        if let Some(snapshot) = load_snapshot(path)? {
            engine
                .import_snapshot(snapshot)
                .with_context(|| format!("snapshot {} rejected", path.display()))?;
        }
    }

    let candles = load_candles(candles_path)?;
    validate_series(&candles)
        .with_context(|| format!("invalid candle series in {}", candles_path.display()))?;
    if candles.is_empty() {
        bail!("{} contains no candles", candles_path.display());
    }

    let signal = engine.generate_signal(&candles);
    info!(
        symbol = %symbol,
        label = %signal.label,
        direction = %signal.direction,
        regime = %signal.regime,
        prediction = format!("{:.4}", signal.prediction),
        confidence = format!("{:.3}", signal.confidence),
        "Signal"
    );

    let output = serde_json::json!({ "symbol": symbol, "signal": signal });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to serialise signal")?
    );

    if let Some(path) = &snapshot_file {
        save_snapshot(path, &engine.export_snapshot())?;
    }
    Ok(())
}

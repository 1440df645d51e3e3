//! Engine binary for the Contrail airline simulation.
//!
//! Wires the configuration, reference oracles, and the world runner
//! together and drives AI airlines until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `$CONTRAIL_CONFIG` or `contrail-config.yaml`
//! 3. Build the reference oracles
//! 4. Resume the world from the snapshot file, or found a new one
//! 5. Install the Ctrl-C handler
//! 6. Run the tick loop
//! 7. Log the result and write the snapshot

mod error;
mod log_callback;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use contrail_core::runner::log_simulation_end;
use contrail_core::{
    MemoryStore, OracleSet, RunControls, SimulationConfig, WorldRunner, WorldStore, run_world,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::log_callback::LogCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "contrail-config.yaml";

/// Ticks between progress lines.
const PROGRESS_EVERY_TICKS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("contrail-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        difficulty = %config.world.difficulty,
        era = config.world.era_year,
        tick_interval_ms = config.world.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Reference oracles.
    let oracles = OracleSet::reference().map_err(EngineError::from)?;

    // 4. Resume or found.
    let snapshot_path = config.world.snapshot_path.as_ref().map(PathBuf::from);
    let mut runner = open_world(config, oracles, snapshot_path.as_deref())?;
    info!(
        world = %runner.world_id(),
        airlines = runner.store().airlines(runner.world_id()).len(),
        "World ready, entering tick loop"
    );

    // 5. Ctrl-C requests a clean stop.
    let controls = Arc::new(RunControls::new());
    {
        let controls = Arc::clone(&controls);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after the current tick");
                    controls.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    // 6. Run.
    let mut callback = LogCallback::new(PROGRESS_EVERY_TICKS);
    let result = run_world(&mut runner, &controls, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 7. Report and persist.
    log_simulation_end(&result);
    if let Some(path) = &snapshot_path {
        runner.store().save_snapshot(path).map_err(EngineError::from)?;
        info!(path = %path.display(), "Snapshot written");
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "contrail-engine shutdown complete"
    );
    Ok(())
}

/// Load configuration from `$CONTRAIL_CONFIG`, then the default file, then
/// built-in defaults.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = std::env::var_os("CONTRAIL_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(&config_path)?)
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        let mut config = SimulationConfig::default();
        config.world.apply_env_overrides()?;
        Ok(config)
    }
}

/// Resume the first world in an existing snapshot, or found a new world.
fn open_world(
    config: SimulationConfig,
    oracles: OracleSet,
    snapshot: Option<&Path>,
) -> Result<WorldRunner, EngineError> {
    if let Some(path) = snapshot.filter(|p| p.exists()) {
        let store = MemoryStore::load_snapshot(path)?;
        let world = store
            .worlds()
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::EmptySnapshot {
                path: path.display().to_string(),
            })?;
        info!(path = %path.display(), world = %world.id, "Resuming from snapshot");
        return Ok(WorldRunner::resume(store, world.id, config, oracles)?);
    }

    let (runner, report) = WorldRunner::found(config, oracles)?;
    info!(
        world = %runner.world_id(),
        spawned = report.spawned(),
        identity_failures = report.identity_failures,
        persistence_failures = report.persistence_failures,
        "New world founded"
    );
    Ok(runner)
}

//! Error types for the engine binary.

use contrail_core::StoreError;
use contrail_core::config::ConfigError;
use contrail_core::runner::RunnerError;
use contrail_world::WorldError;

/// Top-level error for the engine binary.
///
/// Each variant wraps one subsystem so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Reference data could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Snapshot load or save failed.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },

    /// A snapshot held no world to resume.
    #[error("snapshot at {path} contains no world")]
    EmptySnapshot {
        /// Snapshot file path.
        path: String,
    },
}

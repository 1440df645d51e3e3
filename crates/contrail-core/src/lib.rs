//! Agent core for the Contrail airline simulation.
//!
//! This crate turns reference data and difficulty presets into a living
//! population of AI airlines and keeps them deciding, tick after tick.
//!
//! # Modules
//!
//! - [`population`] -- Airport ranking, regional quotas, and batch spawning.
//! - [`scheduler`] -- Oldest-first, capped selection of due airlines.
//! - [`decision`] -- The per-airline decision cycle.
//! - [`lifecycle`] -- Durable deferred replacement of bankrupt airlines.
//! - [`runner`] -- Tick driver and async run loop.
//! - [`store`] -- [`WorldStore`] persistence trait and [`MemoryStore`].
//! - [`config`] -- Configuration loading from `contrail-config.yaml`.
//! - [`clock`] -- Accelerated game clock.
//!
//! [`WorldStore`]: store::WorldStore
//! [`MemoryStore`]: store::MemoryStore

pub mod batch;
pub mod clock;
pub mod config;
pub mod context;
pub mod decision;
pub mod founding;
pub mod lifecycle;
pub mod money;
pub mod notify;
pub mod operator;
pub mod population;
pub mod runner;
pub mod scheduler;
pub mod store;

pub use config::SimulationConfig;
pub use context::{OracleSet, Oracles, SimContext};
pub use decision::{DecisionError, DecisionOutcome, run_decision_cycle};
pub use founding::found_world;
pub use lifecycle::{LifecycleReport, process_due_spawns, schedule_replacement};
pub use operator::{RunControls, SimulationEndReason};
pub use population::{SpawnError, SpawnReport, plan_population, spawn_replacement};
pub use runner::{RunnerError, TickCallback, TickSummary, WorldRunner, run_world};
pub use scheduler::{SchedulerReport, run_due_agents};
pub use store::{MemoryStore, StoreError, WorldStore};

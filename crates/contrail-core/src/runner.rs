//! Tick driver for one world.
//!
//! [`WorldRunner::tick`] is one discrete step: advance the game clock by the
//! accelerated wall time, run the agent scheduler, fire due replacement
//! spawns, and every few ticks repair routes whose flight instances are
//! missing. [`run_world`] wraps it in an async loop with pause, stop, and
//! tick-limit handling.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use contrail_types::{WorldId, WorldStatus};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::{ClockError, GameClock};
use crate::config::SimulationConfig;
use crate::context::{OracleSet, SimContext};
use crate::decision::schedule::weekly_flights;
use crate::founding::found_world;
use crate::lifecycle::{LifecycleReport, process_due_spawns};
use crate::operator::{RunControls, SimulationEndReason};
use crate::population::{SpawnError, SpawnReport, plan_population};
use crate::scheduler::{SchedulerReport, run_due_agents};
use crate::store::{MemoryStore, StoreError, WorldStore};

/// Errors that stop the tick loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A store read or write failed outside any per-agent unit.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The game clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Founding or populating the world failed.
    #[error("spawn error: {source}")]
    Spawn {
        /// The underlying spawn error.
        #[from]
        source: SpawnError,
    },
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number.
    pub tick: u64,
    /// Game time after the tick.
    pub game_time: DateTime<Utc>,
    /// Era year after the tick.
    pub era_year: i32,
    /// World status seen by the tick.
    pub status: WorldStatus,
    /// Scheduler totals.
    pub scheduler: SchedulerReport,
    /// Deferred spawn totals.
    pub lifecycle: LifecycleReport,
    /// Routes whose missing flight instances were regenerated.
    pub flights_repaired: usize,
}

/// Result of [`run_world`].
#[derive(Debug)]
pub struct SimulationResult {
    /// Why the loop returned.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick ran.
    pub final_summary: Option<TickSummary>,
    /// Ticks executed by this loop.
    pub total_ticks: u64,
}

/// Callback invoked after each tick.
pub trait TickCallback: Send {
    /// Called with every completed tick.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// One world with its store, collaborators, clock, and random source.
pub struct WorldRunner {
    world_id: WorldId,
    store: MemoryStore,
    oracles: OracleSet,
    config: SimulationConfig,
    rng: StdRng,
    clock: GameClock,
}

impl WorldRunner {
    /// Found a new world in an empty store and plan its population.
    pub fn found(
        config: SimulationConfig,
        oracles: OracleSet,
    ) -> Result<(Self, SpawnReport), RunnerError> {
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let world = found_world(&mut store, &config, oracles.view().airports)?;

        let report = {
            let mut ctx = SimContext {
                store: &mut store,
                oracles: oracles.view(),
                config: &config,
                rng: &mut rng,
                wall_now: Utc::now(),
            };
            plan_population(&mut ctx, &world)?
        };

        let clock = GameClock::from_world(&world)?;
        Ok((
            Self {
                world_id: world.id,
                store,
                oracles,
                config,
                rng,
                clock,
            },
            report,
        ))
    }

    /// Resume a world already present in `store`.
    pub fn resume(
        store: MemoryStore,
        world_id: WorldId,
        config: SimulationConfig,
        oracles: OracleSet,
    ) -> Result<Self, RunnerError> {
        let world = store.world(world_id)?;
        let clock = GameClock::from_world(&world)?;
        let rng = StdRng::seed_from_u64(resume_seed(config.world.seed, world.game_time));
        info!(
            world = %world.id,
            game_time = %world.game_time,
            pending_spawns = store.pending_spawns(world_id).len(),
            "World resumed"
        );
        Ok(Self {
            world_id,
            store,
            oracles,
            config,
            rng,
            clock,
        })
    }

    /// The world this runner drives.
    pub const fn world_id(&self) -> WorldId {
        self.world_id
    }

    /// Read access to the store.
    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Write access to the store, for the player side of the world.
    pub fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    /// The game clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// The active configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Execute one tick at wall-clock `wall_now`, `wall_elapsed` after the
    /// previous one.
    pub fn tick(
        &mut self,
        wall_now: DateTime<Utc>,
        wall_elapsed: Duration,
    ) -> Result<TickSummary, RunnerError> {
        let mut world = self.store.world(self.world_id)?;
        if world.is_running() {
            let now = self.clock.advance(wall_elapsed)?;
            world.game_time = now;
            world.era_year = self.clock.era_year();
            self.store.update_world(&world)?;
        } else {
            self.clock.count_tick()?;
        }
        let tick = self.clock.tick();
        let game_time = self.clock.now();

        let mut ctx = SimContext {
            store: &mut self.store,
            oracles: self.oracles.view(),
            config: &self.config,
            rng: &mut self.rng,
            wall_now,
        };
        let scheduler = run_due_agents(&mut ctx, self.world_id, game_time)?;
        let lifecycle = process_due_spawns(&mut ctx);

        let interval = self.config.scheduler.consistency_interval_ticks;
        let flights_repaired = if interval > 0 && tick.checked_rem(interval) == Some(0) {
            repair_missing_flights(&mut *ctx.store, self.world_id)
        } else {
            0
        };

        debug!(
            tick,
            game_time = %game_time,
            processed = scheduler.processed,
            spawned = lifecycle.spawned,
            "Tick complete"
        );
        Ok(TickSummary {
            tick,
            game_time,
            era_year: world.era_year,
            status: world.status,
            scheduler,
            lifecycle,
            flights_repaired,
        })
    }
}

/// Seed for a resumed world: the configured seed mixed with its stored game
/// time.
const fn resume_seed(seed: u64, game_time: DateTime<Utc>) -> u64 {
    let millis = u64::from_le_bytes(game_time.timestamp_millis().to_le_bytes());
    seed ^ millis.rotate_left(32)
}

/// Regenerate flight instances for active routes that have none.
pub fn repair_missing_flights(store: &mut dyn WorldStore, world_id: WorldId) -> usize {
    let mut repaired = 0usize;
    for route in store.active_routes(world_id) {
        if !store.flights(route.id).is_empty() {
            continue;
        }
        match store.insert_flights(&weekly_flights(&route)) {
            Ok(()) => {
                repaired = repaired.saturating_add(1);
                debug!(route = %route.id, flight = %route.outbound_flight, "Flight instances regenerated");
            }
            Err(e) => warn!(route = %route.id, error = %e, "Consistency repair failed"),
        }
    }
    if repaired > 0 {
        info!(world = %world_id, repaired, "Consistency pass repaired routes");
    }
    repaired
}

/// Drive `runner` until the tick limit, a stop request, or the world ends.
pub async fn run_world(
    runner: &mut WorldRunner,
    controls: &RunControls,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let max_ticks = runner.config.world.max_ticks;
    let interval = Duration::from_millis(runner.config.world.tick_interval_ms);
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut last_tick = Instant::now();

    info!(
        world = %runner.world_id,
        max_ticks,
        tick_interval_ms = runner.config.world.tick_interval_ms,
        "Simulation starting"
    );

    loop {
        if controls.is_paused() {
            info!("Simulation paused, waiting for resume...");
            controls.wait_if_paused().await;
            info!("Simulation resumed");
            last_tick = Instant::now();
        }

        if controls.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::OperatorStop,
                final_summary: last_summary,
                total_ticks,
            });
        }

        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        let summary = runner.tick(Utc::now(), elapsed)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary);

        if summary.status == WorldStatus::Ended {
            info!(tick = summary.tick, "World ended");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::WorldEnded,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        if max_ticks > 0 && summary.tick >= max_ticks {
            info!(tick = summary.tick, max_ticks, "Tick limit reached");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);
        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }
}

/// Log how a run ended.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );
    if let Some(summary) = &result.final_summary {
        info!(
            game_time = %summary.game_time,
            era = summary.era_year,
            "Final game time"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quick_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.tick_interval_ms = 0;
        config
    }

    fn runner(config: SimulationConfig) -> WorldRunner {
        let (runner, report) = WorldRunner::found(config, OracleSet::reference().unwrap()).unwrap();
        assert!(report.spawned() > 0);
        runner
    }

    #[test]
    fn tick_advances_game_time_by_acceleration() {
        let mut runner = runner(quick_config());
        let start = runner.clock().now();
        let summary = runner
            .tick(Utc::now(), Duration::from_secs(60))
            .unwrap();

        assert_eq!(summary.tick, 1);
        assert_eq!(
            summary.game_time.signed_duration_since(start),
            chrono::TimeDelta::days(1)
        );
        let world = runner.store().world(runner.world_id()).unwrap();
        assert_eq!(world.game_time, summary.game_time);
    }

    #[test]
    fn paused_world_keeps_its_time() {
        let mut runner = runner(quick_config());
        let mut world = runner.store().world(runner.world_id()).unwrap();
        world.status = WorldStatus::Paused;
        runner.store_mut().update_world(&world).unwrap();

        let summary = runner
            .tick(Utc::now(), Duration::from_secs(60))
            .unwrap();
        assert_eq!(summary.game_time, world.game_time);
        assert_eq!(summary.scheduler.processed, 0);
    }

    #[test]
    fn resumed_world_draws_a_fresh_sequence() {
        use rand::RngCore;

        let config = quick_config();
        let mut founded = runner(config.clone());
        let world_id = founded.world_id();
        let resume = |store: MemoryStore| {
            WorldRunner::resume(store, world_id, config.clone(), OracleSet::reference().unwrap())
                .unwrap()
        };
        let founding_draw = StdRng::seed_from_u64(config.world.seed).next_u64();

        let at_founding = resume(founded.store().clone()).rng.next_u64();
        assert_ne!(at_founding, founding_draw);

        founded.tick(Utc::now(), Duration::from_secs(60)).unwrap();
        let later = resume(founded.store().clone()).rng.next_u64();
        assert_ne!(later, at_founding);
        assert_eq!(later, resume(founded.store().clone()).rng.next_u64());
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut config = quick_config();
        config.world.max_ticks = 3;
        let mut runner = runner(config);
        let controls = RunControls::new();

        let result = run_world(&mut runner, &controls, &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 3);
    }

    #[tokio::test]
    async fn operator_stop_before_first_tick() {
        let mut runner = runner(quick_config());
        let controls = RunControls::new();
        controls.request_stop();

        let result = run_world(&mut runner, &controls, &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
    }

    #[tokio::test]
    async fn ended_world_stops_the_loop() {
        let mut runner = runner(quick_config());
        let mut world = runner.store().world(runner.world_id()).unwrap();
        world.status = WorldStatus::Ended;
        runner.store_mut().update_world(&world).unwrap();

        let result = run_world(&mut runner, &RunControls::new(), &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::WorldEnded);
        assert_eq!(result.total_ticks, 1);
    }
}

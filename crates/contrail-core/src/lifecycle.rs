//! Deferred replacement of bankrupt airlines.
//!
//! A replacement is a durable [`ScheduledSpawn`] record with a wall-clock
//! fire time, not an in-process timer, so it survives restarts. Nothing
//! captured at schedule time is trusted: when the spawn fires the world
//! status and the population are checked again, and a stale spawn simply
//! completes without effect.

use chrono::TimeDelta;
use contrail_types::{
    Airline, NotificationCategory, NotificationPriority, ScheduledSpawn, ScheduledSpawnId, World,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::LifecycleConfig;
use crate::context::SimContext;
use crate::notify::{NotificationDraft, notify};
use crate::population::{active_ai_count, spawn_replacement};
use crate::store::StoreError;

const SECONDS_PER_DAY: u64 = 86_400;

/// Totals for one pass over due spawns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    /// Spawns whose fire time had passed.
    pub fired: u32,
    /// Replacement airlines created.
    pub spawned: u32,
    /// Spawns dropped because their world is gone, paused, or ended.
    pub skipped_inactive: u32,
    /// Spawns dropped because the population target is already met.
    pub skipped_saturated: u32,
    /// Spawns whose replacement could not be created.
    pub failed: u32,
}

/// Wall-clock wait for a game-time delay of `delay_days`.
///
/// The game delay is divided by the world's time acceleration and clamped
/// to the configured maximum real wait.
pub fn wall_delay_secs(delay_days: u32, acceleration: u32, lifecycle: &LifecycleConfig) -> u64 {
    let game_secs = u64::from(delay_days).saturating_mul(SECONDS_PER_DAY);
    game_secs
        .checked_div(u64::from(acceleration))
        .unwrap_or(game_secs)
        .min(lifecycle.max_real_wait_secs)
}

/// Persist a replacement for `predecessor` after a random game-time delay.
pub fn schedule_replacement(
    ctx: &mut SimContext<'_>,
    world: &World,
    predecessor: &Airline,
) -> Result<ScheduledSpawn, StoreError> {
    let config = ctx.config;
    let lifecycle = &config.lifecycle;
    let (min, max) = if lifecycle.replacement_delay_min_days <= lifecycle.replacement_delay_max_days {
        (
            lifecycle.replacement_delay_min_days,
            lifecycle.replacement_delay_max_days,
        )
    } else {
        (
            lifecycle.replacement_delay_max_days,
            lifecycle.replacement_delay_min_days,
        )
    };
    let delay_days = ctx.rng.random_range(min..=max);
    let wait = wall_delay_secs(delay_days, world.time_acceleration, lifecycle);
    let fire_at = i64::try_from(wait)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| ctx.wall_now.checked_add_signed(delta))
        .unwrap_or(ctx.wall_now);

    let spawn = ScheduledSpawn {
        id: ScheduledSpawnId::new(),
        world_id: world.id,
        fire_at,
        predecessor: predecessor.id,
        predecessor_region: predecessor.region,
        scheduled_at_game: world.game_time,
    };
    ctx.store.schedule_spawn(spawn.clone())?;

    info!(
        world = %world.id,
        predecessor = %predecessor.name,
        delay_days,
        wall_wait_secs = wait,
        "Replacement airline scheduled"
    );
    Ok(spawn)
}

enum FireResult {
    Spawned,
    Inactive,
    Saturated,
    Failed,
}

/// Fire every spawn due at the context's wall-clock time.
///
/// Each due spawn is completed whatever happens to it, so it fires once.
pub fn process_due_spawns(ctx: &mut SimContext<'_>) -> LifecycleReport {
    let mut report = LifecycleReport::default();
    for spawn in ctx.store.due_spawns(ctx.wall_now) {
        report.fired = report.fired.saturating_add(1);
        let counter = match fire(ctx, &spawn) {
            FireResult::Spawned => &mut report.spawned,
            FireResult::Inactive => &mut report.skipped_inactive,
            FireResult::Saturated => &mut report.skipped_saturated,
            FireResult::Failed => &mut report.failed,
        };
        *counter = counter.saturating_add(1);

        if let Err(e) = ctx.store.complete_spawn(spawn.id) {
            warn!(spawn = %spawn.id, error = %e, "Failed to complete scheduled spawn");
        }
    }
    report
}

fn fire(ctx: &mut SimContext<'_>, spawn: &ScheduledSpawn) -> FireResult {
    let config = ctx.config;
    let Ok(world) = ctx.store.world(spawn.world_id) else {
        debug!(spawn = %spawn.id, "World gone, dropping scheduled spawn");
        return FireResult::Inactive;
    };
    if !world.is_running() {
        debug!(spawn = %spawn.id, status = ?world.status, "World not running, dropping scheduled spawn");
        return FireResult::Inactive;
    }
    let target = config.difficulty.get(world.difficulty).population_target();
    let population = active_ai_count(&*ctx.store, &world);
    if population >= target {
        debug!(population, target, "Population target met, dropping scheduled spawn");
        return FireResult::Saturated;
    }

    let airline = match spawn_replacement(ctx, &world) {
        Ok(Some(airline)) => airline,
        Ok(None) => return FireResult::Failed,
        Err(e) => {
            warn!(spawn = %spawn.id, error = %e, "Replacement spawn failed");
            return FireResult::Failed;
        }
    };

    let at_player_base = world.player_base == Some(airline.base_airport);
    let base_code = ctx
        .oracles
        .airports
        .airport(airline.base_airport)
        .map_or_else(|| airline.base_airport.to_string(), |a| a.code);
    notify(
        &mut *ctx.store,
        world.id,
        NotificationDraft {
            title: format!("New competitor: {}", airline.name),
            message: format!(
                "{} ({}) has started operations from {base_code}.",
                airline.name, airline.iata_code
            ),
            category: NotificationCategory::Competitor,
            icon: "new-airline",
            priority: if at_player_base {
                NotificationPriority::High
            } else {
                NotificationPriority::Normal
            },
            link: None,
        },
        world.game_time,
    );
    info!(
        airline = %airline.name,
        base = %base_code,
        replaces = %spawn.predecessor,
        "Replacement airline founded"
    );
    FireResult::Spawned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_delay_divides_by_acceleration() {
        let lifecycle = LifecycleConfig::default();
        assert_eq!(wall_delay_secs(30, 1440, &lifecycle), 1800);
    }

    #[test]
    fn wall_delay_is_clamped() {
        let lifecycle = LifecycleConfig {
            max_real_wait_secs: 600,
            ..LifecycleConfig::default()
        };
        assert_eq!(wall_delay_secs(30, 1440, &lifecycle), 600);
        assert_eq!(wall_delay_secs(30, 1, &LifecycleConfig::default()), 3600);
    }
}

//! Agent scheduler: picks which AI airlines decide on this tick.
//!
//! Due airlines are those whose last decision is at least the difficulty's
//! decision interval old (or who never decided). They are served
//! oldest-first and capped per tick, so with `N` due airlines and a cap of
//! `B` every one of them runs within `ceil(N / B)` ticks.

use chrono::{DateTime, TimeDelta, Utc};
use contrail_types::{Airline, WorldId};
use tracing::{debug, info, warn};

use crate::context::SimContext;
use crate::decision::{DecisionOutcome, run_decision_cycle};
use crate::store::{StoreError, WorldStore};

/// Totals for one scheduler call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    /// Airlines due before the cap was applied.
    pub due: usize,
    /// Cycles that completed.
    pub processed: usize,
    /// Cycles that failed; those airlines retry on a later tick.
    pub failed: usize,
    /// Airlines that went bankrupt.
    pub bankrupt: usize,
    /// Per-airline results, in processing order.
    pub outcomes: Vec<DecisionOutcome>,
}

/// Whether an airline is owed a decision at game time `now`.
pub fn is_due(airline: &Airline, now: DateTime<Utc>, interval: TimeDelta) -> bool {
    airline.is_active
        && airline.is_ai
        && airline
            .last_decision_at
            .is_none_or(|last| now.signed_duration_since(last) >= interval)
}

/// Decision interval for a difficulty, in game hours.
pub fn decision_interval(hours: u32) -> TimeDelta {
    TimeDelta::try_hours(i64::from(hours)).unwrap_or(TimeDelta::MAX)
}

/// Due airlines in processing order: never-decided first, then oldest
/// decision, ties broken by id.
pub fn due_airlines(
    store: &dyn WorldStore,
    world_id: WorldId,
    now: DateTime<Utc>,
    interval: TimeDelta,
) -> Vec<Airline> {
    let mut due: Vec<Airline> = store
        .airlines(world_id)
        .into_iter()
        .filter(|a| is_due(a, now, interval))
        .collect();
    due.sort_by(|a, b| {
        a.last_decision_at
            .cmp(&b.last_decision_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    due
}

/// Run the decision cycle for up to `batch_size` due airlines.
///
/// Returns immediately when the world is not running. A failed cycle is
/// logged and counted without touching the airline's decision time.
pub fn run_due_agents(
    ctx: &mut SimContext<'_>,
    world_id: WorldId,
    now: DateTime<Utc>,
) -> Result<SchedulerReport, StoreError> {
    let config = ctx.config;
    let world = ctx.store.world(world_id)?;
    if !world.is_running() {
        return Ok(SchedulerReport::default());
    }

    let difficulty = config.difficulty.get(world.difficulty);
    let interval = decision_interval(difficulty.decision_interval_hours);
    let due = due_airlines(&*ctx.store, world_id, now, interval);
    let mut report = SchedulerReport {
        due: due.len(),
        ..SchedulerReport::default()
    };
    if due.is_empty() {
        return Ok(report);
    }

    let cap = usize::try_from(config.scheduler.batch_size).unwrap_or(usize::MAX);
    for airline in due.iter().take(cap) {
        match run_decision_cycle(ctx, airline.id, now) {
            Ok(outcome) => {
                report.processed = report.processed.saturating_add(1);
                if outcome.bankrupt {
                    report.bankrupt = report.bankrupt.saturating_add(1);
                }
                report.outcomes.push(outcome);
            }
            Err(e) => {
                report.failed = report.failed.saturating_add(1);
                warn!(airline = %airline.name, error = %e, "Decision cycle failed");
            }
        }
    }

    if report.due > cap {
        debug!(due = report.due, cap, "Due airlines deferred to later ticks");
    }
    info!(
        world = %world_id,
        due = report.due,
        processed = report.processed,
        failed = report.failed,
        bankrupt = report.bankrupt,
        "Scheduler pass complete"
    );
    Ok(report)
}

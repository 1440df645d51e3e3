//! Tick callback that reports progress through `tracing`.

use contrail_core::TickCallback;
use contrail_core::TickSummary;
use tracing::{debug, info};

/// Logs every tick at debug level and a progress line every `every` ticks
/// or whenever the population changed.
pub struct LogCallback {
    every: u64,
}

impl LogCallback {
    /// Report progress every `every` ticks; `0` reports only on activity.
    pub const fn new(every: u64) -> Self {
        Self { every }
    }

    const fn is_milestone(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.every), Some(0))
    }
}

impl TickCallback for LogCallback {
    fn on_tick(&mut self, summary: &TickSummary) {
        debug!(
            tick = summary.tick,
            game_time = %summary.game_time,
            processed = summary.scheduler.processed,
            "Tick complete"
        );

        let population_changed = summary.scheduler.bankrupt > 0 || summary.lifecycle.spawned > 0;
        if population_changed || self.is_milestone(summary.tick) {
            info!(
                tick = summary.tick,
                game_date = %summary.game_time.date_naive(),
                era = summary.era_year,
                decisions = summary.scheduler.processed,
                deferred = summary.scheduler.due.saturating_sub(summary.scheduler.processed),
                bankrupt = summary.scheduler.bankrupt,
                spawned = summary.lifecycle.spawned,
                "Simulation progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_follow_the_interval() {
        let callback = LogCallback::new(10);
        assert!(callback.is_milestone(20));
        assert!(!callback.is_milestone(21));
        assert!(!LogCallback::new(0).is_milestone(10));
    }
}

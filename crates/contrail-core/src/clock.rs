//! Game clock for one world.
//!
//! Wall-clock time elapsed between ticks is multiplied by the world's time
//! acceleration to advance game time. The era year is derived from game
//! time, never stored independently. All arithmetic is checked.

use std::time::Duration;

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use contrail_types::World;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Game time would leave the representable range.
    #[error("game time overflow advancing by {millis} ms")]
    TimeOverflow {
        /// Game milliseconds the clock tried to advance by.
        millis: u128,
    },

    /// Time acceleration must be at least 1.
    #[error("invalid time acceleration: {0}")]
    InvalidAcceleration(u32),
}

/// Tick counter plus accelerated game time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    tick: u64,
    game_time: DateTime<Utc>,
    acceleration: u32,
}

impl GameClock {
    /// Create a clock at tick 0 starting from `game_time`.
    pub const fn new(game_time: DateTime<Utc>, acceleration: u32) -> Result<Self, ClockError> {
        if acceleration == 0 {
            return Err(ClockError::InvalidAcceleration(acceleration));
        }
        Ok(Self {
            tick: 0,
            game_time,
            acceleration,
        })
    }

    /// Create a clock resuming from a stored world.
    pub const fn from_world(world: &World) -> Result<Self, ClockError> {
        Self::new(world.game_time, world.time_acceleration)
    }

    /// Count one tick without moving game time (paused worlds).
    pub fn count_tick(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Count one tick and advance game time by `wall_elapsed × acceleration`.
    pub fn advance(&mut self, wall_elapsed: Duration) -> Result<DateTime<Utc>, ClockError> {
        let millis = wall_elapsed
            .as_millis()
            .saturating_mul(u128::from(self.acceleration));
        let delta = i64::try_from(millis)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .ok_or(ClockError::TimeOverflow { millis })?;
        let next = self
            .game_time
            .checked_add_signed(delta)
            .ok_or(ClockError::TimeOverflow { millis })?;
        self.count_tick()?;
        self.game_time = next;
        Ok(next)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Current game time.
    pub const fn now(&self) -> DateTime<Utc> {
        self.game_time
    }

    /// Current era year.
    pub fn era_year(&self) -> i32 {
        self.game_time.year()
    }

    /// Game seconds per wall second.
    pub const fn acceleration(&self) -> u32 {
        self.acceleration
    }
}

/// January 1st, 00:00 UTC of `year`.
pub fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    chrono::NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_acceleration_is_rejected() {
        let start = start_of_year(1990).unwrap();
        assert!(matches!(
            GameClock::new(start, 0),
            Err(ClockError::InvalidAcceleration(0))
        ));
    }

    #[test]
    fn advance_scales_wall_time() {
        let start = start_of_year(1990).unwrap();
        let mut clock = GameClock::new(start, 1440).unwrap();
        let now = clock.advance(Duration::from_secs(60)).unwrap();
        assert_eq!(now, start.checked_add_signed(TimeDelta::days(1)).unwrap());
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.era_year(), 1990);
    }

    #[test]
    fn era_year_follows_game_time() {
        let start = start_of_year(1990).unwrap();
        let mut clock = GameClock::new(start, 86_400).unwrap();
        clock.advance(Duration::from_secs(366)).unwrap();
        assert_eq!(clock.era_year(), 1991);
    }

    #[test]
    fn count_tick_leaves_time_alone() {
        let start = start_of_year(2000).unwrap();
        let mut clock = GameClock::new(start, 60).unwrap();
        assert_eq!(clock.count_tick().unwrap(), 1);
        assert_eq!(clock.now(), start);
    }
}

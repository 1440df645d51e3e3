//! Bankruptcy staging.
//!
//! A distressed airline is forced to shed a route. A terminal one ceases
//! operations: its routes and flights are withdrawn, its aircraft parked,
//! the player is told, and a replacement may be scheduled.

use chrono::{DateTime, Utc};
use contrail_types::{Airline, NotificationCategory, NotificationPriority, World};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::DifficultyConfig;
use crate::context::SimContext;
use crate::decision::contraction::close_route;
use crate::lifecycle::schedule_replacement;
use crate::money::scale;
use crate::notify::{NotificationDraft, notify};
use crate::store::StoreError;

/// Financial state of an airline at the bankruptcy checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solvency {
    /// Nothing to do.
    Solvent,
    /// Deep enough in debt to force a contraction.
    Distressed,
    /// The airline ceases operations this cycle.
    Terminal,
}

/// Classify an airline. Terminal when the balance is below
/// `-terminal_fraction × capital` or nothing is left to fly.
pub fn assess(
    airline: &Airline,
    active_routes: usize,
    fleet_size: usize,
    capital: Decimal,
    difficulty: &DifficultyConfig,
) -> Solvency {
    let terminal_floor = scale(capital, -difficulty.terminal_fraction);
    let distress_floor = scale(capital, -difficulty.distress_fraction);

    if airline.balance < terminal_floor || (active_routes == 0 && fleet_size == 0) {
        Solvency::Terminal
    } else if airline.balance < distress_floor && active_routes > 0 {
        Solvency::Distressed
    } else {
        Solvency::Solvent
    }
}

/// What a terminal bankruptcy did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindDown {
    /// Routes withdrawn.
    pub routes_closed: u32,
    /// Whether a replacement airline was scheduled.
    pub replacement_scheduled: bool,
}

/// Cease operations for `airline`.
pub fn liquidate(
    ctx: &mut SimContext<'_>,
    world: &World,
    airline: &mut Airline,
    now: DateTime<Utc>,
) -> Result<WindDown, StoreError> {
    let config = ctx.config;
    let difficulty = config.difficulty.get(world.difficulty);
    let mut wind_down = WindDown::default();

    for route in ctx.store.routes(airline.id).iter().filter(|r| r.is_active) {
        close_route(&mut *ctx.store, route, now)?;
        wind_down.routes_closed = wind_down.routes_closed.saturating_add(1);
    }

    airline.is_active = false;
    airline.ceased_at = Some(now);
    ctx.store.update_airline(airline)?;

    info!(
        airline = %airline.name,
        balance = %airline.balance,
        routes_closed = wind_down.routes_closed,
        "Airline ceased operations"
    );
    notify(
        &mut *ctx.store,
        world.id,
        NotificationDraft {
            title: format!("{} ceases operations", airline.name),
            message: format!(
                "{} ({}) has gone bankrupt and withdrawn all of its routes.",
                airline.name, airline.iata_code
            ),
            category: NotificationCategory::Competitor,
            icon: "bankruptcy",
            priority: NotificationPriority::Normal,
            link: None,
        },
        now,
    );

    if difficulty.repopulation {
        match schedule_replacement(ctx, world, airline) {
            Ok(_) => wind_down.replacement_scheduled = true,
            Err(e) => warn!(airline = %airline.name, error = %e, "Replacement not scheduled"),
        }
    }
    Ok(wind_down)
}

#[cfg(test)]
mod tests {
    use contrail_types::{AirlineId, Personality, Region, ServiceChoices, ServiceTier, WorldId};
    use rust_decimal_macros::dec;

    use super::*;

    fn airline(balance: Decimal) -> Airline {
        Airline {
            id: AirlineId::new(),
            world_id: WorldId::new(),
            name: "Test Air".to_owned(),
            icao_code: "TST".to_owned(),
            iata_code: "TS".to_owned(),
            region: Region::Europe,
            base_airport: contrail_world::airport_id_for("LHR"),
            balance,
            personality: Personality::Aggressive,
            service: ServiceChoices {
                catering: ServiceTier::Basic,
                seating: ServiceTier::Basic,
                cabin_crew: ServiceTier::Basic,
            },
            last_decision_at: None,
            is_active: true,
            is_ai: true,
            founded_at: Utc::now(),
            ceased_at: None,
        }
    }

    #[test]
    fn stages_follow_capital_fractions() {
        let normal = DifficultyConfig::normal();
        let capital = dec!(10000);

        assert_eq!(
            assess(&airline(dec!(-1000)), 2, 2, capital, &normal),
            Solvency::Solvent
        );
        assert_eq!(
            assess(&airline(dec!(-6000)), 2, 2, capital, &normal),
            Solvency::Distressed
        );
        assert_eq!(
            assess(&airline(dec!(-15001)), 2, 2, capital, &normal),
            Solvency::Terminal
        );
    }

    #[test]
    fn nothing_left_to_fly_is_terminal() {
        let normal = DifficultyConfig::normal();
        assert_eq!(
            assess(&airline(dec!(50000)), 0, 0, dec!(10000), &normal),
            Solvency::Terminal
        );
    }

    #[test]
    fn distress_without_routes_is_not_forced() {
        let normal = DifficultyConfig::normal();
        assert_eq!(
            assess(&airline(dec!(-6000)), 0, 3, dec!(10000), &normal),
            Solvency::Solvent
        );
    }
}

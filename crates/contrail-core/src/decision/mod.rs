//! One AI airline's decision cycle.
//!
//! Steps run in a fixed order and each may do nothing:
//!
//! 1. put idle aircraft on new routes
//! 2. buy one more aircraft
//! 3. close the worst route when losing money
//! 4. stage bankruptcy, possibly ending the airline
//! 5. reprice one route
//! 6. stamp the decision time
//!
//! Every threshold comes from the world's difficulty preset; the shape of
//! the cycle is identical across difficulties. External oracles are asked
//! fresh at every step since human and AI airlines change the world between
//! ticks.

pub mod bankruptcy;
pub mod contraction;
pub mod expansion;
pub mod pricing;
pub mod schedule;
pub mod utilization;

use chrono::{DateTime, Utc};
use contrail_types::{AirlineId, AirportId, Route};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::context::SimContext;
use crate::store::StoreError;

use self::bankruptcy::Solvency;

/// Errors that abort one airline's cycle. The scheduler contains them.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// A store read or write failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The airline is inactive or not AI-controlled.
    #[error("airline {0} is not an active AI airline")]
    AirlineInactive(AirlineId),

    /// The airline's base is missing from the airport directory.
    #[error("unknown base airport: {0}")]
    UnknownAirport(AirportId),
}

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// Airline the cycle ran for.
    pub airline_id: AirlineId,
    /// Routes created for idle aircraft.
    pub routes_opened: u32,
    /// Aircraft purchased.
    pub aircraft_bought: u32,
    /// Routes closed by contraction or bankruptcy.
    pub routes_closed: u32,
    /// Routes whose fares were recomputed.
    pub fares_updated: u32,
    /// Whether the airline ceased operations.
    pub bankrupt: bool,
    /// Whether a replacement airline was scheduled.
    pub replacement_scheduled: bool,
}

impl DecisionOutcome {
    const fn new(airline_id: AirlineId) -> Self {
        Self {
            airline_id,
            routes_opened: 0,
            aircraft_bought: 0,
            routes_closed: 0,
            fares_updated: 0,
            bankrupt: false,
            replacement_scheduled: false,
        }
    }
}

/// Aggregate revenue and cost over the active routes.
///
/// An airline without routes counts as profitable: it is just starting.
pub fn is_profitable(routes: &[Route]) -> bool {
    let (revenue, cost) = routes.iter().filter(|r| r.is_active).fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(revenue, cost), r| (revenue.saturating_add(r.revenue), cost.saturating_add(r.cost)),
    );
    revenue >= cost
}

fn active(routes: &[Route]) -> Vec<Route> {
    routes.iter().filter(|r| r.is_active).cloned().collect()
}

/// Run the full cycle for one airline at game time `now`.
pub fn run_decision_cycle(
    ctx: &mut SimContext<'_>,
    airline_id: AirlineId,
    now: DateTime<Utc>,
) -> Result<DecisionOutcome, DecisionError> {
    let config = ctx.config;
    let oracles = ctx.oracles;

    let mut airline = ctx.store.airline(airline_id)?;
    if !airline.is_active || !airline.is_ai {
        return Err(DecisionError::AirlineInactive(airline_id));
    }
    let world = ctx.store.world(airline.world_id)?;
    let difficulty = config.difficulty.get(world.difficulty);
    let capital = config.economy.era_capital(world.era_year);
    let base = oracles
        .airports
        .airport(airline.base_airport)
        .ok_or(DecisionError::UnknownAirport(airline.base_airport))?;
    let mut outcome = DecisionOutcome::new(airline_id);

    // 1. Utilization
    outcome.routes_opened = utilization::fill_idle_fleet(ctx, &world, &airline, &base, now);

    // 2. Expansion
    let routes = active(&ctx.store.routes(airline_id));
    if expansion::try_expand(ctx, &world, &mut airline, &base, capital, is_profitable(&routes))? {
        outcome.aircraft_bought = 1;
    }

    // 3. Contraction
    let mut contracted = false;
    if contraction::should_contract(&airline, &routes, capital, difficulty) {
        if let Some(closed) = contraction::close_worst_route(&mut *ctx.store, &routes, now)? {
            info!(
                airline = %airline.name,
                route = %closed.outbound_flight,
                profit = %closed.profit(),
                "Closed worst route"
            );
            outcome.routes_closed = outcome.routes_closed.saturating_add(1);
            contracted = true;
        }
    }

    // 4. Bankruptcy staging
    let routes = active(&ctx.store.routes(airline_id));
    let fleet_size = ctx.store.fleet(airline_id).len();
    match bankruptcy::assess(&airline, routes.len(), fleet_size, capital, difficulty) {
        Solvency::Solvent => {}
        Solvency::Distressed => {
            if !contracted
                && contraction::close_worst_route(&mut *ctx.store, &routes, now)?.is_some()
            {
                debug!(airline = %airline.name, "Forced contraction under distress");
                outcome.routes_closed = outcome.routes_closed.saturating_add(1);
            }
        }
        Solvency::Terminal => {
            let wind_down = bankruptcy::liquidate(ctx, &world, &mut airline, now)?;
            outcome.routes_closed = outcome.routes_closed.saturating_add(wind_down.routes_closed);
            outcome.bankrupt = true;
            outcome.replacement_scheduled = wind_down.replacement_scheduled;
            return Ok(outcome);
        }
    }

    // 5. Pricing
    if pricing::maybe_reprice(ctx, &world, &airline, now)? {
        outcome.fares_updated = 1;
    }

    // 6. Stamp
    airline.last_decision_at = Some(now);
    ctx.store.update_airline(&airline)?;

    debug!(
        airline = %airline.name,
        opened = outcome.routes_opened,
        bought = outcome.aircraft_bought,
        closed = outcome.routes_closed,
        repriced = outcome.fares_updated,
        "Decision cycle complete"
    );
    Ok(outcome)
}

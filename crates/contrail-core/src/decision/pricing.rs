//! Fare quotes and periodic repricing.

use chrono::{DateTime, Utc};
use contrail_agents::{PersonalityBias, roll};
use contrail_types::{
    Airline, CabinClass, Fares, NotificationCategory, NotificationPriority, Route, World,
};
use contrail_world::FareOracle;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::config::DifficultyConfig;
use crate::context::SimContext;
use crate::money::{fare, scale};
use crate::notify::{NotificationDraft, notify};
use crate::store::StoreError;

/// Oracle fares for every cabin, scaled by `factor` and floored.
pub fn quote_fares(oracle: &dyn FareOracle, distance_km: f64, era_year: i32, factor: f64) -> Fares {
    let quote = |cabin| fare(scale(oracle.base_fare(distance_km, era_year, cabin), factor));
    Fares {
        economy: quote(CabinClass::Economy),
        business: quote(CabinClass::Business),
        first: quote(CabinClass::First),
    }
}

/// Fare multiplier for a route's load factor.
pub fn load_adjustment(load_factor: f64, difficulty: &DifficultyConfig) -> f64 {
    if load_factor > difficulty.high_load_factor {
        1.0 + difficulty.fare_adjustment
    } else if load_factor < difficulty.low_load_factor {
        1.0 - difficulty.fare_adjustment
    } else {
        1.0
    }
}

/// With the difficulty's pricing probability, recompute the fares of one
/// random active route. Returns whether a route was repriced.
pub fn maybe_reprice(
    ctx: &mut SimContext<'_>,
    world: &World,
    airline: &Airline,
    now: DateTime<Utc>,
) -> Result<bool, StoreError> {
    let config = ctx.config;
    let oracles = ctx.oracles;
    let difficulty = config.difficulty.get(world.difficulty);

    if !roll(&mut *ctx.rng, difficulty.pricing_probability) {
        return Ok(false);
    }
    let routes: Vec<Route> = ctx
        .store
        .routes(airline.id)
        .into_iter()
        .filter(|r| r.is_active)
        .collect();
    let Some(route) = routes.choose(&mut *ctx.rng) else {
        return Ok(false);
    };

    let factor = difficulty.pricing_modifier
        * load_adjustment(route.load_factor, difficulty)
        * airline.personality.fare_skew();
    let mut repriced = route.clone();
    repriced.fares = quote_fares(oracles.fares, route.distance_km, world.era_year, factor);
    ctx.store.update_route(&repriced)?;
    debug!(
        airline = %airline.name,
        flight = %repriced.outbound_flight,
        economy = %repriced.fares.economy,
        "Fares updated"
    );

    if let Some(undercut) = undercut_player_route(ctx, world, airline, &repriced) {
        notify(
            &mut *ctx.store,
            world.id,
            NotificationDraft {
                title: format!("{} undercuts your fares", airline.name),
                message: format!(
                    "{} now sells economy on {} at {}, below your {}.",
                    airline.name,
                    repriced.outbound_flight,
                    repriced.fares.economy,
                    undercut.fares.economy
                ),
                category: NotificationCategory::Pricing,
                icon: "price-tag",
                priority: NotificationPriority::Normal,
                link: Some(format!("/routes/{}", undercut.id)),
            },
            now,
        );
    }
    Ok(true)
}

/// The player's active route on the same pair that is now more expensive.
fn undercut_player_route(
    ctx: &SimContext<'_>,
    world: &World,
    airline: &Airline,
    repriced: &Route,
) -> Option<Route> {
    let player = world.player_airline.filter(|id| *id != airline.id)?;
    ctx.store.routes(player).into_iter().find(|r| {
        r.is_active
            && r.serves_pair(repriced.origin, repriced.destination)
            && repriced.fares.economy < r.fares.economy
    })
}

#[cfg(test)]
mod tests {
    use contrail_world::DistanceFareOracle;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn load_factor_moves_fares() {
        let normal = DifficultyConfig::normal();
        assert!((load_adjustment(0.9, &normal) - 1.1).abs() < 1e-9);
        assert!((load_adjustment(0.3, &normal) - 0.9).abs() < 1e-9);
        assert!((load_adjustment(0.7, &normal) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn quotes_are_floored_and_ordered_by_cabin() {
        let oracle = DistanceFareOracle::default();
        let fares = quote_fares(&oracle, 1200.0, 1990, 1.0);
        assert!(fares.economy < fares.business);
        assert!(fares.business < fares.first);

        let tiny = quote_fares(&oracle, 1200.0, 1990, 0.0);
        assert_eq!(tiny.economy, Decimal::ONE);
    }
}

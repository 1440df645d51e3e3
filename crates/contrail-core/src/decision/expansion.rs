//! Buy one more aircraft when the airline can afford it.

use std::collections::BTreeSet;

use contrail_agents::{
    EXPANSION_FAMILY_BIAS, PersonalityBias, pick_expansion_type, roll, within_capacity,
};
use contrail_types::{Airline, Airport, FleetUnit, FleetUnitId, World};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::DifficultyConfig;
use crate::context::SimContext;
use crate::money::scale;
use crate::store::StoreError;

/// Whether the airline qualifies for the expansion roll at all.
pub fn may_expand(
    airline: &Airline,
    fleet_size: usize,
    profitable: bool,
    capital: Decimal,
    difficulty: &DifficultyConfig,
) -> bool {
    let max_fleet = usize::try_from(difficulty.max_fleet_size).unwrap_or(usize::MAX);
    profitable
        && airline.balance > scale(capital, difficulty.expansion_balance_fraction)
        && fleet_size < max_fleet
}

/// Roll for and perform one purchase. Returns whether an aircraft was bought.
pub fn try_expand(
    ctx: &mut SimContext<'_>,
    world: &World,
    airline: &mut Airline,
    base: &Airport,
    capital: Decimal,
    profitable: bool,
) -> Result<bool, StoreError> {
    let config = ctx.config;
    let oracles = ctx.oracles;
    let difficulty = config.difficulty.get(world.difficulty);

    let fleet = ctx.store.fleet(airline.id);
    if !may_expand(airline, fleet.len(), profitable, capital, difficulty) {
        return Ok(false);
    }
    let chance = difficulty.expansion_probability * airline.personality.expansion_appetite();
    if !roll(&mut *ctx.rng, chance) {
        return Ok(false);
    }

    let budget = scale(airline.balance, config.economy.budget_fraction);
    let affordable: Vec<_> = oracles
        .catalog
        .eligible_types(world.era_year)
        .into_iter()
        .filter(|t| t.price <= budget)
        .collect();
    let candidates = within_capacity(&affordable, config.airport_classes.max_seats(base.class));
    let owned_families: BTreeSet<String> = fleet
        .iter()
        .filter_map(|u| oracles.catalog.aircraft_type(u.aircraft_type))
        .map(|t| t.family)
        .collect();

    let Some(aircraft) = pick_expansion_type(
        &mut *ctx.rng,
        &candidates,
        &owned_families,
        EXPANSION_FAMILY_BIAS,
        airline.personality.capacity_band(),
    ) else {
        debug!(airline = %airline.name, budget = %budget, "No affordable aircraft");
        return Ok(false);
    };

    let unit = FleetUnit {
        id: FleetUnitId::new(),
        airline_id: airline.id,
        aircraft_type: aircraft.id,
        registration: format!("{}-{:02}", airline.icao_code, fleet.len().saturating_add(1)),
        purchase_price: aircraft.price,
        route_id: None,
    };
    ctx.store.insert_fleet_units(std::slice::from_ref(&unit))?;
    airline.balance = airline.balance.saturating_sub(aircraft.price);
    ctx.store.update_airline(airline)?;

    info!(
        airline = %airline.name,
        aircraft = %aircraft.name,
        price = %aircraft.price,
        balance = %airline.balance,
        "Aircraft purchased"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
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
            personality: Personality::Balanced,
            service: ServiceChoices {
                catering: ServiceTier::Standard,
                seating: ServiceTier::Standard,
                cabin_crew: ServiceTier::Standard,
            },
            last_decision_at: None,
            is_active: true,
            is_ai: true,
            founded_at: Utc::now(),
            ceased_at: None,
        }
    }

    #[test]
    fn expansion_needs_profit_cash_and_fleet_headroom() {
        let normal = DifficultyConfig::normal();
        let capital = dec!(10000);

        assert!(may_expand(&airline(dec!(5000)), 3, true, capital, &normal));
        assert!(!may_expand(&airline(dec!(5000)), 3, false, capital, &normal));
        assert!(!may_expand(&airline(dec!(4000)), 3, true, capital, &normal));
        assert!(!may_expand(&airline(dec!(5000)), 20, true, capital, &normal));
    }
}

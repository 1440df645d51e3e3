//! Put idle aircraft to work on new routes from the airline's base.
//!
//! Every miss (no candidate, out of range, slot denied, store failure) skips
//! one idle aircraft and moves on to the next.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use contrail_agents::roll;
use contrail_types::{AircraftType, Airline, AirportId, Airport, FleetUnit, Route, RouteId, World};
use contrail_world::great_circle_km;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::context::SimContext;
use crate::decision::{pricing, schedule};
use crate::store::StoreError;

/// Highest flight number handed out.
const MAX_FLIGHT_NUMBER: u32 = 9999;

/// Fixed taxi and climb allowance added to every sector, in minutes.
const BLOCK_ALLOWANCE_MINUTES: u32 = 30;

/// Ground time between sectors: 25 minutes plus one per five seats.
pub fn turnaround_minutes(seats: u32) -> u32 {
    seats
        .checked_div(5)
        .unwrap_or(0)
        .saturating_add(25)
        .clamp(30, 120)
}

/// Scheduled gate-to-gate time for one sector.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn block_minutes(distance_km: f64, cruise_speed_kmh: u32) -> u32 {
    let speed = f64::from(cruise_speed_kmh.max(1));
    let airborne = (distance_km / speed * 60.0).ceil().max(0.0);
    (airborne as u32).saturating_add(BLOCK_ALLOWANCE_MINUTES)
}

/// Smallest free pair of flight numbers: odd outbound, the next even inbound.
pub fn next_flight_numbers(iata: &str, routes: &[Route]) -> Option<(String, String)> {
    let used: BTreeSet<&str> = routes
        .iter()
        .flat_map(|r| [r.outbound_flight.as_str(), r.inbound_flight.as_str()])
        .collect();
    (1..MAX_FLIGHT_NUMBER).step_by(2).find_map(|n| {
        let outbound = format!("{iata}{n}");
        let inbound = format!("{iata}{}", n.saturating_add(1));
        (!used.contains(outbound.as_str()) && !used.contains(inbound.as_str()))
            .then_some((outbound, inbound))
    })
}

/// Try to open a route for every idle aircraft. Returns how many opened.
pub fn fill_idle_fleet(
    ctx: &mut SimContext<'_>,
    world: &World,
    airline: &Airline,
    base: &Airport,
    now: DateTime<Utc>,
) -> u32 {
    let idle: Vec<FleetUnit> = ctx
        .store
        .fleet(airline.id)
        .into_iter()
        .filter(FleetUnit::is_idle)
        .collect();
    if idle.is_empty() {
        return 0;
    }

    let mut routes = ctx.store.routes(airline.id);
    let mut opened = 0u32;
    for unit in &idle {
        let Some(aircraft) = ctx.oracles.catalog.aircraft_type(unit.aircraft_type) else {
            warn!(unit = %unit.registration, "Aircraft type missing from catalog");
            continue;
        };
        match open_route(ctx, world, airline, base, unit, &aircraft, &routes, now) {
            Ok(Some(route)) => {
                routes.push(route);
                opened = opened.saturating_add(1);
            }
            Ok(None) => {}
            Err(e) => warn!(
                airline = %airline.name,
                unit = %unit.registration,
                error = %e,
                "Route creation failed"
            ),
        }
    }
    opened
}

#[allow(clippy::too_many_arguments)]
fn open_route(
    ctx: &mut SimContext<'_>,
    world: &World,
    airline: &Airline,
    base: &Airport,
    unit: &FleetUnit,
    aircraft: &AircraftType,
    routes: &[Route],
    now: DateTime<Utc>,
) -> Result<Option<Route>, StoreError> {
    let oracles = ctx.oracles;
    let config = ctx.config;
    let difficulty = config.difficulty.get(world.difficulty);

    let served: BTreeSet<AirportId> = routes
        .iter()
        .filter(|r| r.is_active)
        .map(|r| r.destination)
        .collect();
    let candidates: Vec<AirportId> = oracles
        .demand
        .ranked_destinations(base, world.era_year)
        .into_iter()
        .map(|c| c.airport)
        .filter(|id| *id != base.id && !served.contains(id))
        .collect();

    let accurate = roll(&mut *ctx.rng, difficulty.selection_accuracy);
    let choice = if accurate {
        candidates.first()
    } else {
        let pool = usize::try_from(difficulty.suboptimal_pool)
            .unwrap_or(usize::MAX)
            .max(1)
            .min(candidates.len());
        candidates
            .get(..pool)
            .and_then(|top| top.choose(&mut *ctx.rng))
    };
    let Some(destination) = choice.and_then(|id| oracles.airports.airport(*id)) else {
        debug!(airline = %airline.name, "No destination candidates");
        return Ok(None);
    };

    let distance = great_circle_km(base, &destination);
    if distance > f64::from(aircraft.range_km) {
        debug!(
            airline = %airline.name,
            destination = %destination.code,
            distance_km = distance,
            range_km = aircraft.range_km,
            "Destination out of range"
        );
        return Ok(None);
    }
    if !oracles
        .slots
        .permits_route(ctx.store.census(), world.id, base, &destination)
    {
        debug!(
            airline = %airline.name,
            destination = %destination.code,
            "Slot denied"
        );
        return Ok(None);
    }
    let Some((outbound_flight, inbound_flight)) = next_flight_numbers(&airline.iata_code, routes)
    else {
        warn!(airline = %airline.name, "Flight numbers exhausted");
        return Ok(None);
    };

    let waypoints = oracles
        .router
        .map(|router| router.plot(base, &destination))
        .transpose()
        .unwrap_or_else(|e| {
            debug!(error = %e, "Waypoint overlay unavailable");
            None
        })
        .unwrap_or_default();

    let route = Route {
        id: RouteId::new(),
        world_id: world.id,
        airline_id: airline.id,
        origin: base.id,
        destination: destination.id,
        fleet_unit: Some(unit.id),
        outbound_flight,
        inbound_flight,
        fares: pricing::quote_fares(
            oracles.fares,
            distance,
            world.era_year,
            difficulty.pricing_modifier,
        ),
        distance_km: distance,
        block_minutes: block_minutes(distance, aircraft.cruise_speed_kmh),
        turnaround_minutes: turnaround_minutes(aircraft.seats),
        revenue: Decimal::ZERO,
        cost: Decimal::ZERO,
        load_factor: 0.0,
        waypoints,
        is_active: true,
        opened_at: now,
        closed_at: None,
    };
    ctx.store.insert_route(&route)?;

    let mut assigned = unit.clone();
    assigned.route_id = Some(route.id);
    ctx.store.update_fleet_unit(&assigned)?;

    let flights = schedule::weekly_flights(&route);
    if let Err(e) = ctx.store.insert_flights(&flights) {
        warn!(
            route = %route.id,
            error = %e,
            "Flight instances not created, left for consistency pass"
        );
    }

    info!(
        airline = %airline.name,
        origin = %base.code,
        destination = %destination.code,
        flight = %route.outbound_flight,
        aircraft = %aircraft.name,
        "Route opened"
    );
    Ok(Some(route))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn route_with(outbound: &str, inbound: &str) -> Route {
        Route {
            id: RouteId::new(),
            world_id: contrail_types::WorldId::new(),
            airline_id: contrail_types::AirlineId::new(),
            origin: contrail_world::airport_id_for("LHR"),
            destination: contrail_world::airport_id_for("JFK"),
            fleet_unit: None,
            outbound_flight: outbound.to_owned(),
            inbound_flight: inbound.to_owned(),
            fares: contrail_types::Fares {
                economy: Decimal::ONE,
                business: Decimal::ONE,
                first: Decimal::ONE,
            },
            distance_km: 5500.0,
            block_minutes: 450,
            turnaround_minutes: 90,
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            load_factor: 0.0,
            waypoints: Vec::new(),
            is_active: false,
            opened_at: chrono::Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn turnaround_scales_with_seats_and_is_clamped() {
        assert_eq!(turnaround_minutes(19), 30);
        assert_eq!(turnaround_minutes(180), 61);
        assert_eq!(turnaround_minutes(600), 120);
    }

    #[test]
    fn block_time_adds_allowance() {
        assert_eq!(block_minutes(800.0, 800), 90);
        assert_eq!(block_minutes(0.0, 0), 30);
    }

    #[test]
    fn flight_numbers_start_at_one_and_two() {
        assert_eq!(
            next_flight_numbers("CX", &[]),
            Some(("CX1".to_owned(), "CX2".to_owned()))
        );
    }

    #[test]
    fn flight_numbers_skip_pairs_in_use() {
        let routes = [route_with("CX1", "CX2"), route_with("CX3", "CX4")];
        let (outbound, inbound) = next_flight_numbers("CX", &routes).unwrap();
        assert_eq!(outbound, "CX5");
        assert_eq!(inbound, "CX6");
    }

    #[test]
    fn flight_numbers_reuse_gaps() {
        let routes = [route_with("CX3", "CX4")];
        let (outbound, _) = next_flight_numbers("CX", &routes).unwrap();
        assert_eq!(outbound, "CX1");
    }
}

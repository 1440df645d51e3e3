//! Close the worst-performing route when an airline is losing money.

use chrono::{DateTime, Utc};
use contrail_types::{Airline, Route};
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::DifficultyConfig;
use crate::decision::is_profitable;
use crate::money::scale;
use crate::store::{StoreError, WorldStore};

/// Unprofitable, short of cash, and flying more than one route.
pub fn should_contract(
    airline: &Airline,
    active_routes: &[Route],
    capital: Decimal,
    difficulty: &DifficultyConfig,
) -> bool {
    !is_profitable(active_routes)
        && airline.balance < scale(capital, difficulty.contraction_balance_fraction)
        && active_routes.iter().filter(|r| r.is_active).count() > 1
}

/// The active route with the lowest revenue minus cost.
///
/// Ties go to the most recently opened route.
pub fn worst_route(routes: &[Route]) -> Option<&Route> {
    routes.iter().filter(|r| r.is_active).min_by(|a, b| {
        a.profit()
            .cmp(&b.profit())
            .then_with(|| b.opened_at.cmp(&a.opened_at))
    })
}

/// Deactivate the worst route. Returns the closed route, if any.
pub fn close_worst_route(
    store: &mut dyn WorldStore,
    routes: &[Route],
    now: DateTime<Utc>,
) -> Result<Option<Route>, StoreError> {
    let Some(worst) = worst_route(routes) else {
        return Ok(None);
    };
    close_route(store, worst, now).map(Some)
}

/// Deactivate one route, drop its flight instances, and free its aircraft.
pub fn close_route(
    store: &mut dyn WorldStore,
    route: &Route,
    now: DateTime<Utc>,
) -> Result<Route, StoreError> {
    let mut closed = route.clone();
    closed.is_active = false;
    closed.closed_at = Some(now);
    store.update_route(&closed)?;

    if let Err(e) = store.remove_flights(closed.id) {
        warn!(route = %closed.id, error = %e, "Flight instances not removed");
    }
    if let Some(unit_id) = closed.fleet_unit {
        let assigned = store
            .fleet(closed.airline_id)
            .into_iter()
            .find(|u| u.id == unit_id && u.route_id == Some(closed.id));
        if let Some(mut unit) = assigned {
            unit.route_id = None;
            store.update_fleet_unit(&unit)?;
        }
    }
    Ok(closed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use contrail_types::{AirlineId, Fares, RouteId, WorldId};
    use rust_decimal_macros::dec;

    use super::*;

    fn route(flight: &str, revenue: Decimal, cost: Decimal) -> Route {
        Route {
            id: RouteId::new(),
            world_id: WorldId::new(),
            airline_id: AirlineId::new(),
            origin: contrail_world::airport_id_for("LHR"),
            destination: contrail_world::airport_id_for("AMS"),
            fleet_unit: None,
            outbound_flight: flight.to_owned(),
            inbound_flight: flight.to_owned(),
            fares: Fares {
                economy: Decimal::ONE,
                business: Decimal::ONE,
                first: Decimal::ONE,
            },
            distance_km: 370.0,
            block_minutes: 80,
            turnaround_minutes: 40,
            revenue,
            cost,
            load_factor: 0.6,
            waypoints: Vec::new(),
            is_active: true,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn worst_route_has_lowest_profit() {
        let routes = [
            route("A", dec!(1000), dec!(1500)),
            route("B", dec!(300), dec!(900)),
        ];
        assert_eq!(worst_route(&routes).unwrap().outbound_flight, "B");
    }

    #[test]
    fn inactive_routes_are_never_worst() {
        let mut b = route("B", dec!(0), dec!(5000));
        b.is_active = false;
        let routes = [route("A", dec!(1000), dec!(1500)), b];
        assert_eq!(worst_route(&routes).unwrap().outbound_flight, "A");
    }
}

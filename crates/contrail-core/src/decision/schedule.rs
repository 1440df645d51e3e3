//! Weekly flight instances for a route.
//!
//! Each day the assigned aircraft flies as many out-and-back rotations as
//! fit between 06:00 and midnight, at least one and at most four. Inbound
//! sectors that depart after midnight roll over to the next weekday.

use contrail_types::{FlightDirection, FlightId, FlightInstance, Route};

const MINUTES_PER_DAY: u32 = 1440;
const DAYS_PER_WEEK: u8 = 7;
const FIRST_DEPARTURE_MINUTE: u32 = 360;
const MAX_ROTATIONS_PER_DAY: u32 = 4;

/// Minutes for one full out-and-back rotation.
pub const fn rotation_minutes(route: &Route) -> u32 {
    route
        .block_minutes
        .saturating_add(route.turnaround_minutes)
        .saturating_mul(2)
}

/// Rotations flown per day.
pub fn rotations_per_day(route: &Route) -> u32 {
    MINUTES_PER_DAY
        .saturating_sub(FIRST_DEPARTURE_MINUTE)
        .checked_div(rotation_minutes(route))
        .unwrap_or(1)
        .clamp(1, MAX_ROTATIONS_PER_DAY)
}

/// Split an absolute minute offset from a weekday into (weekday, minute of day).
fn wrap(weekday: u8, minute: u32) -> (u8, u16) {
    let days = minute.checked_div(MINUTES_PER_DAY).unwrap_or(0);
    let minute_of_day = minute.checked_rem(MINUTES_PER_DAY).unwrap_or(0);
    let day_shift = u8::try_from(days.checked_rem(u32::from(DAYS_PER_WEEK)).unwrap_or(0)).unwrap_or(0);
    let weekday = weekday
        .saturating_add(day_shift)
        .checked_rem(DAYS_PER_WEEK)
        .unwrap_or(0);
    (weekday, u16::try_from(minute_of_day).unwrap_or(0))
}

/// Every flight instance the route operates in one week.
pub fn weekly_flights(route: &Route) -> Vec<FlightInstance> {
    let cycle = rotation_minutes(route);
    let outbound_to_inbound = route.block_minutes.saturating_add(route.turnaround_minutes);
    let rotations = rotations_per_day(route);

    let mut flights = Vec::new();
    for weekday in 0..DAYS_PER_WEEK {
        for rotation in 0..rotations {
            let departs = FIRST_DEPARTURE_MINUTE.saturating_add(rotation.saturating_mul(cycle));
            let returns = departs.saturating_add(outbound_to_inbound);
            for (direction, minute, number) in [
                (FlightDirection::Outbound, departs, &route.outbound_flight),
                (FlightDirection::Inbound, returns, &route.inbound_flight),
            ] {
                let (day, departure_minute) = wrap(weekday, minute);
                flights.push(FlightInstance {
                    id: FlightId::new(),
                    route_id: route.id,
                    airline_id: route.airline_id,
                    flight_number: number.clone(),
                    weekday: day,
                    departure_minute,
                    direction,
                });
            }
        }
    }
    flights
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use contrail_types::{AirlineId, Fares, RouteId, WorldId};
    use rust_decimal::Decimal;

    use super::*;

    fn route(block: u32, turnaround: u32) -> Route {
        Route {
            id: RouteId::new(),
            world_id: WorldId::new(),
            airline_id: AirlineId::new(),
            origin: contrail_world::airport_id_for("LHR"),
            destination: contrail_world::airport_id_for("CDG"),
            fleet_unit: None,
            outbound_flight: "CX1".to_owned(),
            inbound_flight: "CX2".to_owned(),
            fares: Fares {
                economy: Decimal::ONE,
                business: Decimal::ONE,
                first: Decimal::ONE,
            },
            distance_km: 350.0,
            block_minutes: block,
            turnaround_minutes: turnaround,
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            load_factor: 0.0,
            waypoints: Vec::new(),
            is_active: true,
            opened_at: chrono::Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn short_haul_is_capped_at_four_rotations() {
        let r = route(60, 40);
        assert_eq!(rotations_per_day(&r), 4);
        assert_eq!(weekly_flights(&r).len(), 7 * 4 * 2);
    }

    #[test]
    fn long_haul_flies_once_a_day() {
        let r = route(480, 120);
        assert_eq!(rotations_per_day(&r), 1);
        let flights = weekly_flights(&r);
        assert_eq!(flights.len(), 14);
        let inbound = flights
            .iter()
            .find(|f| f.direction == FlightDirection::Inbound && f.weekday == 0)
            .unwrap();
        assert_eq!(inbound.departure_minute, 960);
        assert_eq!(inbound.flight_number, "CX2");
    }

    #[test]
    fn late_inbound_rolls_into_next_day() {
        let r = route(1000, 120);
        let flights = weekly_flights(&r);
        let sunday_return = flights
            .iter()
            .filter(|f| f.direction == FlightDirection::Inbound)
            .find(|f| f.departure_minute == 40 && f.weekday == 0);
        assert!(sunday_return.is_some());
        assert!(
            flights
                .iter()
                .filter(|f| f.direction == FlightDirection::Inbound)
                .all(|f| f.departure_minute == 40)
        );
    }

    #[test]
    fn wrap_handles_week_boundary() {
        assert_eq!(wrap(6, 1500), (0, 60));
        assert_eq!(wrap(2, 100), (2, 100));
    }
}

//! Shared type definitions for the Contrail airline simulation.
//!
//! This crate is the single source of truth for the records exchanged
//! between the agent core, the reference data collaborators and any
//! reporting layer. Types flow to `TypeScript` via `ts-rs` for the UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all record identifiers
//! - [`enums`] -- Closed variants (difficulty, region, personality, ...)
//! - [`structs`] -- Worlds, airlines, fleet, routes, flights, notifications

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AirportClass, CabinClass, Difficulty, FlightDirection, NotificationCategory,
    NotificationPriority, Personality, Region, ServiceTier, WorldStatus,
};
pub use ids::{
    AircraftTypeId, AirlineId, AirportId, FleetUnitId, FlightId, NotificationId, RouteId,
    ScheduledSpawnId, WorldId,
};
pub use structs::{
    AircraftType, Airline, Airport, Fares, FleetUnit, FlightInstance, Notification, Route,
    ScheduledSpawn, ServiceChoices, Waypoint, World,
};

#[cfg(test)]
mod tests {
    //! Type export and helper tests.

    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::ids::WorldId::export_all();
        let _ = crate::ids::AirlineId::export_all();
        let _ = crate::ids::AirportId::export_all();
        let _ = crate::ids::RouteId::export_all();
        let _ = crate::ids::FlightId::export_all();

        let _ = crate::enums::Difficulty::export_all();
        let _ = crate::enums::Personality::export_all();
        let _ = crate::enums::NotificationPriority::export_all();

        let _ = crate::structs::World::export_all();
        let _ = crate::structs::Airline::export_all();
        let _ = crate::structs::FleetUnit::export_all();
        let _ = crate::structs::Route::export_all();
        let _ = crate::structs::FlightInstance::export_all();
        let _ = crate::structs::Notification::export_all();
        let _ = crate::structs::ScheduledSpawn::export_all();
    }

    fn sample_type(retired_year: Option<i32>) -> AircraftType {
        AircraftType {
            id: AircraftTypeId::new(),
            name: String::from("Test 100"),
            family: String::from("T"),
            seats: 100,
            range_km: 3000,
            cruise_speed_kmh: 800,
            price: Decimal::from(1_000_000),
            introduced_year: 1970,
            retired_year,
        }
    }

    #[test]
    fn aircraft_availability_window() {
        let in_production = sample_type(None);
        assert!(!in_production.is_available(1969));
        assert!(in_production.is_available(1970));
        assert!(in_production.is_available(2030));

        let retired = sample_type(Some(1990));
        assert!(retired.is_available(1990));
        assert!(!retired.is_available(1991));
    }

    #[test]
    fn route_profit_and_pair() {
        let origin = AirportId::new();
        let destination = AirportId::new();
        let route = Route {
            id: RouteId::new(),
            world_id: WorldId::new(),
            airline_id: AirlineId::new(),
            origin,
            destination,
            fleet_unit: None,
            outbound_flight: String::from("QX101"),
            inbound_flight: String::from("QX102"),
            fares: Fares {
                economy: Decimal::from(100),
                business: Decimal::from(300),
                first: Decimal::from(600),
            },
            distance_km: 1000.0,
            block_minutes: 90,
            turnaround_minutes: 45,
            revenue: Decimal::from(300),
            cost: Decimal::from(900),
            load_factor: 0.5,
            waypoints: Vec::new(),
            is_active: true,
            opened_at: Utc::now(),
            closed_at: None,
        };
        assert_eq!(route.profit(), Decimal::from(-600));
        assert!(route.serves_pair(destination, origin));
        assert!(!route.serves_pair(origin, AirportId::new()));
        assert_eq!(route.fares.for_cabin(CabinClass::Business), Decimal::from(300));
    }
}

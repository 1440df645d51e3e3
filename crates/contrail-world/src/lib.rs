//! Reference data and market oracles for the Contrail simulation.
//!
//! The agent core treats airports, aircraft, demand, fares, slots, and
//! airway routing as external collaborators. This crate defines those
//! collaborators as traits and ships a reference implementation of each.
//!
//! # Modules
//!
//! - [`oracle`] -- The collaborator traits consumed by the agent core.
//! - [`airports`] -- Built-in airport directory across seven regions.
//! - [`catalog`] -- Built-in aircraft catalog with era availability.
//! - [`geo`] -- Great-circle distance and interpolation.
//! - [`reference`] -- Gravity demand, distance fares, class slot caps,
//!   great-circle waypoints.
//! - [`error`] -- Error types for reference data lookups.

pub mod airports;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod oracle;
pub mod reference;

pub use airports::{StaticAirportDirectory, airport_id_for};
pub use catalog::{StaticFleetCatalog, aircraft_type_id_for};
pub use error::WorldError;
pub use geo::great_circle_km;
pub use oracle::{
    AirportDirectory, DemandOracle, DestinationCandidate, FareOracle, FleetCatalog, RouteCensus,
    SlotAuthority, WaypointRouter,
};
pub use reference::{ClassSlotAuthority, DistanceFareOracle, GravityDemandOracle, GreatCircleRouter};

use uuid::Uuid;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic id for seed data, so references survive snapshot reloads.
fn stable_id(namespace: u8, key: &str) -> Uuid {
    let hash = |seed: u64| {
        key.bytes()
            .chain(std::iter::once(namespace))
            .fold(seed, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
    };
    Uuid::from_u64_pair(hash(FNV_OFFSET), hash(FNV_OFFSET.rotate_left(17)))
}

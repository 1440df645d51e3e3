//! Read-only collaborators consulted by the agent core.
//!
//! Fare formulas, demand ranking, slot bookkeeping, and airway routing live
//! behind these traits. Every call is answered fresh; callers never cache
//! results across decision steps because both human and AI airlines mutate
//! the underlying state between ticks.

use contrail_types::{
    AircraftType, AircraftTypeId, Airport, AirportId, CabinClass, Waypoint, WorldId,
};
use rust_decimal::Decimal;

use crate::error::WorldError;

/// Airport reference data: class, region, demand score, coordinates.
pub trait AirportDirectory: Send + Sync {
    /// Look up one airport.
    fn airport(&self, id: AirportId) -> Option<Airport>;

    /// Every airport known to the directory.
    fn airports(&self) -> Vec<Airport>;
}

/// A destination suggested by the [`DemandOracle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestinationCandidate {
    /// Suggested destination airport.
    pub airport: AirportId,
    /// Relative attractiveness; higher is better.
    pub score: f64,
}

/// Ranks destinations reachable from an origin airport.
pub trait DemandOracle: Send + Sync {
    /// Destinations ordered best-first. The origin itself is never included.
    fn ranked_destinations(&self, origin: &Airport, era_year: i32) -> Vec<DestinationCandidate>;
}

/// Counts of currently active routes, as seen by a [`SlotAuthority`].
pub trait RouteCensus {
    /// Active routes (any airline) touching `airport` in `world`.
    fn active_routes_at(&self, world: WorldId, airport: AirportId) -> u32;

    /// Active routes (any airline, either direction) between `a` and `b`.
    fn active_routes_between(&self, world: WorldId, a: AirportId, b: AirportId) -> u32;
}

/// Decides whether one more route may be opened on a pair.
pub trait SlotAuthority: Send + Sync {
    /// `true` when `origin`–`destination` can take one more route right now.
    fn permits_route(
        &self,
        census: &dyn RouteCensus,
        world: WorldId,
        origin: &Airport,
        destination: &Airport,
    ) -> bool;
}

/// Base fare lookup.
pub trait FareOracle: Send + Sync {
    /// One-way base fare for a cabin on a sector of `distance_km`.
    fn base_fare(&self, distance_km: f64, era_year: i32, cabin: CabinClass) -> Decimal;
}

/// Aircraft types on the market.
pub trait FleetCatalog: Send + Sync {
    /// Types that can be bought in `era_year`.
    fn eligible_types(&self, era_year: i32) -> Vec<AircraftType>;

    /// Look up one type regardless of era.
    fn aircraft_type(&self, id: AircraftTypeId) -> Option<AircraftType>;
}

/// Optional airway path overlay. Failures are non-fatal to callers.
pub trait WaypointRouter: Send + Sync {
    /// Path from `origin` to `destination`, endpoints excluded.
    fn plot(&self, origin: &Airport, destination: &Airport) -> Result<Vec<Waypoint>, WorldError>;
}

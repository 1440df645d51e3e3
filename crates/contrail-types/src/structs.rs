//! Core entity structs for the Contrail simulation.
//!
//! Worlds, airlines, fleet units, routes and flight instances are the
//! records the agent core produces; airports and aircraft types are the
//! read-only reference data it consumes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    AirportClass, CabinClass, Difficulty, FlightDirection, NotificationCategory,
    NotificationPriority, Personality, Region, ServiceTier, WorldStatus,
};
use crate::ids::{
    AircraftTypeId, AirlineId, AirportId, FleetUnitId, FlightId, NotificationId, RouteId,
    ScheduledSpawnId, WorldId,
};

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// A persistent game world shared by one human player and many AI airlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct World {
    /// Unique world identifier.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// Simulated seconds that elapse per wall-clock second.
    pub time_acceleration: u32,
    /// Difficulty tier selecting the AI profile.
    pub difficulty: Difficulty,
    /// Current in-game calendar year.
    pub era_year: i32,
    /// Whether the world is running, paused, or over.
    pub status: WorldStatus,
    /// Current simulated time.
    pub game_time: DateTime<Utc>,
    /// The human player's airline, once founded.
    pub player_airline: Option<AirlineId>,
    /// The human player's base airport.
    pub player_base: Option<AirportId>,
}

impl World {
    /// Whether agent work may run in this world.
    pub fn is_running(&self) -> bool {
        self.status == WorldStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// An airport from the airport directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Airport {
    /// Unique airport identifier.
    pub id: AirportId,
    /// Three-letter location code, e.g. `LHR`.
    pub code: String,
    /// Airport name.
    pub name: String,
    /// Region the airport belongs to.
    pub region: Region,
    /// Size class.
    pub class: AirportClass,
    /// Relative passenger demand generated at this airport.
    pub demand_score: u32,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// First year the airport accepts commercial traffic.
    pub opened_year: i32,
}

/// An aircraft type from the fleet catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AircraftType {
    /// Unique type identifier.
    pub id: AircraftTypeId,
    /// Marketing name, e.g. `Boeing 737-800`.
    pub name: String,
    /// Type family used for commonality, e.g. `737`.
    pub family: String,
    /// Typical two-class seat count.
    pub seats: u32,
    /// Maximum range in kilometres.
    pub range_km: u32,
    /// Cruise speed in km/h.
    pub cruise_speed_kmh: u32,
    /// List price of a new airframe.
    #[ts(as = "String")]
    pub price: Decimal,
    /// First year the type can be ordered.
    pub introduced_year: i32,
    /// Last year the type can be ordered, if it has gone out of production.
    pub retired_year: Option<i32>,
}

impl AircraftType {
    /// Whether the type can be ordered in the given year.
    pub fn is_available(&self, year: i32) -> bool {
        self.introduced_year <= year && self.retired_year.is_none_or(|retired| year <= retired)
    }
}

// ---------------------------------------------------------------------------
// Airline
// ---------------------------------------------------------------------------

/// Onboard service choices made when an airline is founded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ServiceChoices {
    /// Meal and drink quality.
    pub catering: ServiceTier,
    /// Seat pitch and comfort.
    pub seating: ServiceTier,
    /// Cabin crew staffing level.
    pub cabin_crew: ServiceTier,
}

/// An airline: the economic actor of the simulation, human or AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Airline {
    /// Unique airline identifier.
    pub id: AirlineId,
    /// World this airline lives in.
    pub world_id: WorldId,
    /// Display name, unique within the world.
    pub name: String,
    /// Three-letter code, unique within the world.
    pub icao_code: String,
    /// Two-letter code, unique within the world. Prefixes flight numbers.
    pub iata_code: String,
    /// Home region.
    pub region: Region,
    /// Base airport all routes start from.
    pub base_airport: AirportId,
    /// Cash balance. Negative balances are allowed and drive bankruptcy.
    #[ts(as = "String")]
    pub balance: Decimal,
    /// Behavioural bias.
    pub personality: Personality,
    /// Service quality choices.
    pub service: ServiceChoices,
    /// Simulated time of the last completed decision cycle.
    pub last_decision_at: Option<DateTime<Utc>>,
    /// `false` once the airline has ceased operations.
    pub is_active: bool,
    /// `true` for autonomously controlled airlines.
    pub is_ai: bool,
    /// Simulated time the airline was founded.
    pub founded_at: DateTime<Utc>,
    /// Simulated time the airline ceased operations.
    pub ceased_at: Option<DateTime<Utc>>,
}

/// A single aircraft owned by an airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FleetUnit {
    /// Unique fleet unit identifier.
    pub id: FleetUnitId,
    /// Owning airline.
    pub airline_id: AirlineId,
    /// Aircraft type from the catalog.
    pub aircraft_type: AircraftTypeId,
    /// Tail registration.
    pub registration: String,
    /// Price paid (zero for founding fleet).
    #[ts(as = "String")]
    pub purchase_price: Decimal,
    /// Route the aircraft currently flies, if any.
    pub route_id: Option<RouteId>,
}

impl FleetUnit {
    /// Whether the aircraft is parked at its base without a route.
    pub const fn is_idle(&self) -> bool {
        self.route_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// Routes and flights
// ---------------------------------------------------------------------------

/// Ticket prices for each cabin of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Fares {
    /// Economy fare.
    #[ts(as = "String")]
    pub economy: Decimal,
    /// Business fare.
    #[ts(as = "String")]
    pub business: Decimal,
    /// First-class fare.
    #[ts(as = "String")]
    pub first: Decimal,
}

impl Fares {
    /// Fare for one cabin.
    pub const fn for_cabin(&self, cabin: CabinClass) -> Decimal {
        match cabin {
            CabinClass::Economy => self.economy,
            CabinClass::Business => self.business,
            CabinClass::First => self.first,
        }
    }
}

/// A point of an airway overlay drawn over a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Waypoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// A scheduled city pair flown by one airline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Route {
    /// Unique route identifier.
    pub id: RouteId,
    /// World the route belongs to.
    pub world_id: WorldId,
    /// Operating airline.
    pub airline_id: AirlineId,
    /// Departure airport (the airline's base).
    pub origin: AirportId,
    /// Arrival airport.
    pub destination: AirportId,
    /// Aircraft flying the route. `None` leaves the route unflown.
    pub fleet_unit: Option<FleetUnitId>,
    /// Flight number origin to destination, e.g. `QX101`.
    pub outbound_flight: String,
    /// Flight number destination to origin, e.g. `QX102`.
    pub inbound_flight: String,
    /// Current fares.
    pub fares: Fares,
    /// Great-circle distance in kilometres.
    pub distance_km: f64,
    /// One-way block time in minutes.
    pub block_minutes: u32,
    /// Ground time between legs in minutes.
    pub turnaround_minutes: u32,
    /// Revenue accumulated since opening.
    #[ts(as = "String")]
    pub revenue: Decimal,
    /// Operating cost accumulated since opening.
    #[ts(as = "String")]
    pub cost: Decimal,
    /// Share of seats sold over the recent period, 0.0 to 1.0.
    pub load_factor: f64,
    /// Airway overlay; empty when no router was available.
    pub waypoints: Vec<Waypoint>,
    /// `false` once the route has been cancelled.
    pub is_active: bool,
    /// Simulated time the route opened.
    pub opened_at: DateTime<Utc>,
    /// Simulated time the route was cancelled.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Route {
    /// Revenue minus cost.
    pub fn profit(&self) -> Decimal {
        self.revenue.saturating_sub(self.cost)
    }

    /// Whether the route connects the two airports in either direction.
    pub fn serves_pair(&self, a: AirportId, b: AirportId) -> bool {
        (self.origin == a && self.destination == b) || (self.origin == b && self.destination == a)
    }
}

/// One recurring weekly departure of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlightInstance {
    /// Unique flight identifier.
    pub id: FlightId,
    /// Route this flight belongs to.
    pub route_id: RouteId,
    /// Operating airline.
    pub airline_id: AirlineId,
    /// Published flight number.
    pub flight_number: String,
    /// Day of week, 0 = Monday.
    pub weekday: u8,
    /// Departure time as minutes after midnight.
    pub departure_minute: u16,
    /// Leg direction.
    pub direction: FlightDirection,
}

// ---------------------------------------------------------------------------
// Notifications and deferred work
// ---------------------------------------------------------------------------

/// A one-way, player-facing event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// World whose player receives the notification.
    pub world_id: WorldId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// UI grouping.
    pub category: NotificationCategory,
    /// UI icon name.
    pub icon: String,
    /// Display priority.
    pub priority: NotificationPriority,
    /// In-app link to the subject of the notification.
    pub link: Option<String>,
    /// Simulated time the notification was raised.
    pub created_at: DateTime<Utc>,
}

/// A durable deferred task that spawns one replacement airline.
///
/// Only the minimum needed to act later is captured here. Everything else
/// is re-read and re-validated when the task fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScheduledSpawn {
    /// Unique task identifier.
    pub id: ScheduledSpawnId,
    /// World the replacement belongs to.
    pub world_id: WorldId,
    /// Wall-clock time at which the task becomes due.
    pub fire_at: DateTime<Utc>,
    /// The bankrupt airline being replaced.
    pub predecessor: AirlineId,
    /// Region of the bankrupt airline.
    pub predecessor_region: Region,
    /// Simulated time at which the task was scheduled.
    pub scheduled_at_game: DateTime<Utc>,
}

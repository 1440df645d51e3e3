//! Persistence model shared by the agent core and any reporting layer.
//!
//! [`WorldStore`] is a synchronous request/response interface: every call
//! is an atomic unit and nothing is held across calls. [`MemoryStore`] is
//! the bundled implementation. It enforces the uniqueness and ownership
//! constraints a relational backend would, and saves to / loads from a
//! JSON snapshot so scheduled replacements survive restarts.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use contrail_types::{
    Airline, AirlineId, AirportId, FleetUnit, FleetUnitId, FlightId, FlightInstance, Notification,
    Route, RouteId, ScheduledSpawn, ScheduledSpawnId, World, WorldId,
};
use contrail_world::RouteCensus;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Id of the missing record.
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("duplicate {field}: {value}")]
    Duplicate {
        /// Constrained field.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// An ownership or consistency constraint was violated.
    #[error("constraint violated: {reason}")]
    Constraint {
        /// Explanation of the violation.
        reason: String,
    },

    /// Snapshot file I/O failed.
    #[error("snapshot I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Snapshot (de)serialization failed.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Records produced and consumed by the agent core.
pub trait WorldStore: Send {
    /// Fetch a world.
    fn world(&self, id: WorldId) -> Result<World, StoreError>;

    /// Create a world.
    fn insert_world(&mut self, world: World) -> Result<(), StoreError>;

    /// Replace a stored world.
    fn update_world(&mut self, world: &World) -> Result<(), StoreError>;

    /// Every stored world.
    fn worlds(&self) -> Vec<World>;

    /// Insert a batch of airlines atomically: all or nothing.
    fn insert_airlines(&mut self, airlines: &[Airline]) -> Result<(), StoreError>;

    /// Fetch an airline.
    fn airline(&self, id: AirlineId) -> Result<Airline, StoreError>;

    /// Replace a stored airline.
    fn update_airline(&mut self, airline: &Airline) -> Result<(), StoreError>;

    /// Every airline ever created in a world, active or not.
    fn airlines(&self, world: WorldId) -> Vec<Airline>;

    /// Insert fleet units atomically.
    fn insert_fleet_units(&mut self, units: &[FleetUnit]) -> Result<(), StoreError>;

    /// Fleet owned by an airline.
    fn fleet(&self, airline: AirlineId) -> Vec<FleetUnit>;

    /// Replace a stored fleet unit.
    fn update_fleet_unit(&mut self, unit: &FleetUnit) -> Result<(), StoreError>;

    /// Create a route.
    fn insert_route(&mut self, route: &Route) -> Result<(), StoreError>;

    /// Replace a stored route.
    fn update_route(&mut self, route: &Route) -> Result<(), StoreError>;

    /// Every route of an airline, active or not.
    fn routes(&self, airline: AirlineId) -> Vec<Route>;

    /// Active routes of every airline in a world.
    fn active_routes(&self, world: WorldId) -> Vec<Route>;

    /// Insert flight instances atomically.
    fn insert_flights(&mut self, flights: &[FlightInstance]) -> Result<(), StoreError>;

    /// Delete a route's flight instances, returning how many were removed.
    fn remove_flights(&mut self, route: RouteId) -> Result<usize, StoreError>;

    /// Flight instances of a route.
    fn flights(&self, route: RouteId) -> Vec<FlightInstance>;

    /// Record a player-facing notification.
    fn push_notification(&mut self, notification: Notification) -> Result<(), StoreError>;

    /// Notifications for a world, oldest first.
    fn notifications(&self, world: WorldId) -> Vec<Notification>;

    /// Persist a deferred replacement.
    fn schedule_spawn(&mut self, spawn: ScheduledSpawn) -> Result<(), StoreError>;

    /// Pending replacements due at or before `now`, earliest first.
    fn due_spawns(&self, now: DateTime<Utc>) -> Vec<ScheduledSpawn>;

    /// Pending replacements for a world.
    fn pending_spawns(&self, world: WorldId) -> Vec<ScheduledSpawn>;

    /// Remove a replacement task.
    fn complete_spawn(&mut self, id: ScheduledSpawnId) -> Result<(), StoreError>;

    /// Route counts as seen by the slot authority.
    fn census(&self) -> &dyn RouteCensus;
}

/// In-memory [`WorldStore`] with JSON snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    worlds: BTreeMap<WorldId, World>,
    airlines: BTreeMap<AirlineId, Airline>,
    fleet: BTreeMap<FleetUnitId, FleetUnit>,
    routes: BTreeMap<RouteId, Route>,
    flights: BTreeMap<FlightId, FlightInstance>,
    notifications: Vec<Notification>,
    spawns: BTreeMap<ScheduledSpawnId, ScheduledSpawn>,
}

/// Serialized form of a [`MemoryStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    worlds: Vec<World>,
    airlines: Vec<Airline>,
    fleet: Vec<FleetUnit>,
    routes: Vec<Route>,
    flights: Vec<FlightInstance>,
    notifications: Vec<Notification>,
    spawns: Vec<ScheduledSpawn>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every record to a JSON snapshot at `path`.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            worlds: self.worlds.values().cloned().collect(),
            airlines: self.airlines.values().cloned().collect(),
            fleet: self.fleet.values().cloned().collect(),
            routes: self.routes.values().cloned().collect(),
            flights: self.flights.values().cloned().collect(),
            notifications: self.notifications.clone(),
            spawns: self.spawns.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;
        info!(
            path = %path.display(),
            airlines = snapshot.airlines.len(),
            pending_spawns = snapshot.spawns.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    /// Load a store from a JSON snapshot at `path`.
    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&json)?;
        let store = Self {
            worlds: snapshot.worlds.into_iter().map(|w| (w.id, w)).collect(),
            airlines: snapshot.airlines.into_iter().map(|a| (a.id, a)).collect(),
            fleet: snapshot.fleet.into_iter().map(|u| (u.id, u)).collect(),
            routes: snapshot.routes.into_iter().map(|r| (r.id, r)).collect(),
            flights: snapshot.flights.into_iter().map(|f| (f.id, f)).collect(),
            notifications: snapshot.notifications,
            spawns: snapshot.spawns.into_iter().map(|s| (s.id, s)).collect(),
        };
        info!(
            path = %path.display(),
            worlds = store.worlds.len(),
            airlines = store.airlines.len(),
            pending_spawns = store.spawns.len(),
            "Snapshot loaded"
        );
        Ok(store)
    }

    /// Reject a batch that would break per-world identity uniqueness.
    fn check_identities(&self, batch: &[Airline]) -> Result<(), StoreError> {
        let mut names = BTreeSet::new();
        let mut icao = BTreeSet::new();
        let mut iata = BTreeSet::new();
        let world_ids: BTreeSet<WorldId> = batch.iter().map(|a| a.world_id).collect();
        for existing in self
            .airlines
            .values()
            .filter(|a| world_ids.contains(&a.world_id))
        {
            names.insert((existing.world_id, existing.name.to_lowercase()));
            icao.insert((existing.world_id, existing.icao_code.clone()));
            iata.insert((existing.world_id, existing.iata_code.clone()));
        }

        for airline in batch {
            if !self.worlds.contains_key(&airline.world_id) {
                return Err(StoreError::not_found("world", airline.world_id));
            }
            if self.airlines.contains_key(&airline.id) {
                return Err(StoreError::Duplicate {
                    field: "airline id",
                    value: airline.id.to_string(),
                });
            }
            if !names.insert((airline.world_id, airline.name.to_lowercase())) {
                return Err(StoreError::Duplicate {
                    field: "airline name",
                    value: airline.name.clone(),
                });
            }
            if !icao.insert((airline.world_id, airline.icao_code.clone())) {
                return Err(StoreError::Duplicate {
                    field: "3-letter code",
                    value: airline.icao_code.clone(),
                });
            }
            if !iata.insert((airline.world_id, airline.iata_code.clone())) {
                return Err(StoreError::Duplicate {
                    field: "2-letter code",
                    value: airline.iata_code.clone(),
                });
            }
        }
        Ok(())
    }
}

impl WorldStore for MemoryStore {
    fn world(&self, id: WorldId) -> Result<World, StoreError> {
        self.worlds
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("world", id))
    }

    fn insert_world(&mut self, world: World) -> Result<(), StoreError> {
        if self.worlds.contains_key(&world.id) {
            return Err(StoreError::Duplicate {
                field: "world id",
                value: world.id.to_string(),
            });
        }
        self.worlds.insert(world.id, world);
        Ok(())
    }

    fn update_world(&mut self, world: &World) -> Result<(), StoreError> {
        let slot = self
            .worlds
            .get_mut(&world.id)
            .ok_or_else(|| StoreError::not_found("world", world.id))?;
        slot.clone_from(world);
        Ok(())
    }

    fn worlds(&self) -> Vec<World> {
        self.worlds.values().cloned().collect()
    }

    fn insert_airlines(&mut self, airlines: &[Airline]) -> Result<(), StoreError> {
        self.check_identities(airlines)?;
        for airline in airlines {
            self.airlines.insert(airline.id, airline.clone());
        }
        Ok(())
    }

    fn airline(&self, id: AirlineId) -> Result<Airline, StoreError> {
        self.airlines
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("airline", id))
    }

    fn update_airline(&mut self, airline: &Airline) -> Result<(), StoreError> {
        let slot = self
            .airlines
            .get_mut(&airline.id)
            .ok_or_else(|| StoreError::not_found("airline", airline.id))?;
        if slot.name != airline.name
            || slot.icao_code != airline.icao_code
            || slot.iata_code != airline.iata_code
        {
            return Err(StoreError::Constraint {
                reason: format!("airline {} identity is immutable", airline.id),
            });
        }
        slot.clone_from(airline);
        Ok(())
    }

    fn airlines(&self, world: WorldId) -> Vec<Airline> {
        self.airlines
            .values()
            .filter(|a| a.world_id == world)
            .cloned()
            .collect()
    }

    fn insert_fleet_units(&mut self, units: &[FleetUnit]) -> Result<(), StoreError> {
        for unit in units {
            if !self.airlines.contains_key(&unit.airline_id) {
                return Err(StoreError::not_found("airline", unit.airline_id));
            }
            if self.fleet.contains_key(&unit.id) {
                return Err(StoreError::Duplicate {
                    field: "fleet unit id",
                    value: unit.id.to_string(),
                });
            }
        }
        for unit in units {
            self.fleet.insert(unit.id, unit.clone());
        }
        Ok(())
    }

    fn fleet(&self, airline: AirlineId) -> Vec<FleetUnit> {
        self.fleet
            .values()
            .filter(|u| u.airline_id == airline)
            .cloned()
            .collect()
    }

    fn update_fleet_unit(&mut self, unit: &FleetUnit) -> Result<(), StoreError> {
        let slot = self
            .fleet
            .get_mut(&unit.id)
            .ok_or_else(|| StoreError::not_found("fleet unit", unit.id))?;
        slot.clone_from(unit);
        Ok(())
    }

    fn insert_route(&mut self, route: &Route) -> Result<(), StoreError> {
        if !self.airlines.contains_key(&route.airline_id) {
            return Err(StoreError::not_found("airline", route.airline_id));
        }
        if let Some(unit_id) = route.fleet_unit {
            let unit = self
                .fleet
                .get(&unit_id)
                .ok_or_else(|| StoreError::not_found("fleet unit", unit_id))?;
            if unit.airline_id != route.airline_id {
                return Err(StoreError::Constraint {
                    reason: format!("fleet unit {unit_id} belongs to another airline"),
                });
            }
        }
        if self.routes.contains_key(&route.id) {
            return Err(StoreError::Duplicate {
                field: "route id",
                value: route.id.to_string(),
            });
        }
        self.routes.insert(route.id, route.clone());
        Ok(())
    }

    fn update_route(&mut self, route: &Route) -> Result<(), StoreError> {
        let slot = self
            .routes
            .get_mut(&route.id)
            .ok_or_else(|| StoreError::not_found("route", route.id))?;
        slot.clone_from(route);
        Ok(())
    }

    fn routes(&self, airline: AirlineId) -> Vec<Route> {
        self.routes
            .values()
            .filter(|r| r.airline_id == airline)
            .cloned()
            .collect()
    }

    fn active_routes(&self, world: WorldId) -> Vec<Route> {
        self.routes
            .values()
            .filter(|r| r.world_id == world && r.is_active)
            .cloned()
            .collect()
    }

    fn insert_flights(&mut self, flights: &[FlightInstance]) -> Result<(), StoreError> {
        for flight in flights {
            if !self.routes.contains_key(&flight.route_id) {
                return Err(StoreError::not_found("route", flight.route_id));
            }
        }
        for flight in flights {
            self.flights.insert(flight.id, flight.clone());
        }
        Ok(())
    }

    fn remove_flights(&mut self, route: RouteId) -> Result<usize, StoreError> {
        let before = self.flights.len();
        self.flights.retain(|_, f| f.route_id != route);
        Ok(before.saturating_sub(self.flights.len()))
    }

    fn flights(&self, route: RouteId) -> Vec<FlightInstance> {
        self.flights
            .values()
            .filter(|f| f.route_id == route)
            .cloned()
            .collect()
    }

    fn push_notification(&mut self, notification: Notification) -> Result<(), StoreError> {
        if !self.worlds.contains_key(&notification.world_id) {
            return Err(StoreError::not_found("world", notification.world_id));
        }
        self.notifications.push(notification);
        Ok(())
    }

    fn notifications(&self, world: WorldId) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|n| n.world_id == world)
            .cloned()
            .collect()
    }

    fn schedule_spawn(&mut self, spawn: ScheduledSpawn) -> Result<(), StoreError> {
        if self.spawns.contains_key(&spawn.id) {
            return Err(StoreError::Duplicate {
                field: "scheduled spawn id",
                value: spawn.id.to_string(),
            });
        }
        self.spawns.insert(spawn.id, spawn);
        Ok(())
    }

    fn due_spawns(&self, now: DateTime<Utc>) -> Vec<ScheduledSpawn> {
        let mut due: Vec<ScheduledSpawn> = self
            .spawns
            .values()
            .filter(|s| s.fire_at <= now)
            .cloned()
            .collect();
        due.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.id.cmp(&b.id)));
        due
    }

    fn pending_spawns(&self, world: WorldId) -> Vec<ScheduledSpawn> {
        self.spawns
            .values()
            .filter(|s| s.world_id == world)
            .cloned()
            .collect()
    }

    fn complete_spawn(&mut self, id: ScheduledSpawnId) -> Result<(), StoreError> {
        self.spawns
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("scheduled spawn", id))
    }

    fn census(&self) -> &dyn RouteCensus {
        self
    }
}

impl RouteCensus for MemoryStore {
    fn active_routes_at(&self, world: WorldId, airport: AirportId) -> u32 {
        let count = self
            .routes
            .values()
            .filter(|r| {
                r.world_id == world
                    && r.is_active
                    && (r.origin == airport || r.destination == airport)
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn active_routes_between(&self, world: WorldId, a: AirportId, b: AirportId) -> u32 {
        let count = self
            .routes
            .values()
            .filter(|r| r.world_id == world && r.is_active && r.serves_pair(a, b))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use contrail_types::{
        Difficulty, Personality, Region, ServiceChoices, ServiceTier, WorldStatus,
    };
    use rust_decimal::Decimal;

    use super::*;
    use crate::clock::start_of_year;

    fn world() -> World {
        World {
            id: WorldId::new(),
            name: "Test".to_owned(),
            time_acceleration: 60,
            difficulty: Difficulty::Normal,
            era_year: 1990,
            status: WorldStatus::Active,
            game_time: start_of_year(1990).unwrap(),
            player_airline: None,
            player_base: None,
        }
    }

    fn airline(world: WorldId, name: &str, icao: &str, iata: &str) -> Airline {
        Airline {
            id: AirlineId::new(),
            world_id: world,
            name: name.to_owned(),
            icao_code: icao.to_owned(),
            iata_code: iata.to_owned(),
            region: Region::Europe,
            base_airport: AirportId::new(),
            balance: Decimal::ZERO,
            personality: Personality::Balanced,
            service: ServiceChoices {
                catering: ServiceTier::Standard,
                seating: ServiceTier::Standard,
                cabin_crew: ServiceTier::Standard,
            },
            last_decision_at: None,
            is_active: true,
            is_ai: true,
            founded_at: start_of_year(1990).unwrap(),
            ceased_at: None,
        }
    }

    #[test]
    fn airline_batches_are_all_or_nothing() {
        let mut store = MemoryStore::new();
        let w = world();
        let wid = w.id;
        store.insert_world(w).unwrap();
        store
            .insert_airlines(&[airline(wid, "Nordic Air", "NOR", "NA")])
            .unwrap();

        let batch = [
            airline(wid, "Coral Jet", "COR", "CJ"),
            airline(wid, "NORDIC AIR", "NRD", "ND"),
        ];
        let err = store.insert_airlines(&batch).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "airline name", .. }));
        assert_eq!(store.airlines(wid).len(), 1);
    }

    #[test]
    fn codes_are_unique_per_world_only() {
        let mut store = MemoryStore::new();
        let (a, b) = (world(), world());
        let (aid, bid) = (a.id, b.id);
        store.insert_world(a).unwrap();
        store.insert_world(b).unwrap();
        store.insert_airlines(&[airline(aid, "Kiwi Hop", "KIW", "KH")]).unwrap();
        store.insert_airlines(&[airline(bid, "Kiwi Hop", "KIW", "KH")]).unwrap();
        assert!(store
            .insert_airlines(&[airline(aid, "Reef Air", "KIW", "RA")])
            .is_err());
    }

    #[test]
    fn snapshot_round_trip_keeps_pending_spawns() {
        let mut store = MemoryStore::new();
        let w = world();
        let wid = w.id;
        store.insert_world(w).unwrap();
        let predecessor = airline(wid, "Jade Fly", "JAD", "JF");
        let fire_at = start_of_year(2030).unwrap();
        store
            .schedule_spawn(ScheduledSpawn {
                id: ScheduledSpawnId::new(),
                world_id: wid,
                fire_at,
                predecessor: predecessor.id,
                predecessor_region: predecessor.region,
                scheduled_at_game: start_of_year(1990).unwrap(),
            })
            .unwrap();
        store.insert_airlines(&[predecessor]).unwrap();

        let dir = std::env::temp_dir().join(format!("contrail-store-{wid}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        store.save_snapshot(&path).unwrap();
        let loaded = MemoryStore::load_snapshot(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded.pending_spawns(wid).len(), 1);
        assert_eq!(loaded.airlines(wid).len(), 1);
        assert!(loaded.due_spawns(start_of_year(2029).unwrap()).is_empty());
        assert_eq!(loaded.due_spawns(fire_at).len(), 1);
    }
}

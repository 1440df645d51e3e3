//! Everything one unit of agent work needs: store, oracles, config, randomness, time.

use chrono::{DateTime, Utc};
use contrail_world::{
    AirportDirectory, ClassSlotAuthority, DemandOracle, DistanceFareOracle, FareOracle,
    FleetCatalog, GravityDemandOracle, GreatCircleRouter, SlotAuthority, StaticAirportDirectory,
    StaticFleetCatalog, WaypointRouter, WorldError,
};
use rand::rngs::StdRng;

use crate::config::SimulationConfig;
use crate::store::WorldStore;

/// Distance decay exponent of the reference demand model.
const REFERENCE_DISTANCE_DECAY: f64 = 0.6;

/// Spacing of reference waypoints in kilometres.
const REFERENCE_WAYPOINT_SPACING_KM: f64 = 400.0;

/// Borrowed view of the external collaborators.
#[derive(Clone, Copy)]
pub struct Oracles<'a> {
    /// Airport reference data.
    pub airports: &'a dyn AirportDirectory,
    /// Destination ranking.
    pub demand: &'a dyn DemandOracle,
    /// Route capacity decisions.
    pub slots: &'a dyn SlotAuthority,
    /// Base fares.
    pub fares: &'a dyn FareOracle,
    /// Aircraft on the market.
    pub catalog: &'a dyn FleetCatalog,
    /// Optional path overlay.
    pub router: Option<&'a dyn WaypointRouter>,
}

/// Owned set of collaborators, lent out as [`Oracles`] each tick.
pub struct OracleSet {
    airports: Box<dyn AirportDirectory>,
    demand: Box<dyn DemandOracle>,
    slots: Box<dyn SlotAuthority>,
    fares: Box<dyn FareOracle>,
    catalog: Box<dyn FleetCatalog>,
    router: Option<Box<dyn WaypointRouter>>,
}

impl OracleSet {
    /// Assemble a set from arbitrary implementations.
    pub fn new(
        airports: Box<dyn AirportDirectory>,
        demand: Box<dyn DemandOracle>,
        slots: Box<dyn SlotAuthority>,
        fares: Box<dyn FareOracle>,
        catalog: Box<dyn FleetCatalog>,
        router: Option<Box<dyn WaypointRouter>>,
    ) -> Self {
        Self {
            airports,
            demand,
            slots,
            fares,
            catalog,
            router,
        }
    }

    /// The bundled reference implementations over the built-in data.
    pub fn reference() -> Result<Self, WorldError> {
        let directory = StaticAirportDirectory::seeded()?;
        let demand = GravityDemandOracle::new(directory.airports(), REFERENCE_DISTANCE_DECAY);
        Ok(Self::new(
            Box::new(directory),
            Box::new(demand),
            Box::new(ClassSlotAuthority::default()),
            Box::new(DistanceFareOracle::default()),
            Box::new(StaticFleetCatalog::seeded()),
            Some(Box::new(GreatCircleRouter::new(
                REFERENCE_WAYPOINT_SPACING_KM,
            ))),
        ))
    }

    /// Borrow every collaborator.
    pub fn view(&self) -> Oracles<'_> {
        Oracles {
            airports: self.airports.as_ref(),
            demand: self.demand.as_ref(),
            slots: self.slots.as_ref(),
            fares: self.fares.as_ref(),
            catalog: self.catalog.as_ref(),
            router: self.router.as_deref(),
        }
    }
}

/// Mutable context threaded through planner, scheduler, and decision cycle.
pub struct SimContext<'a> {
    /// Shared persistence model.
    pub store: &'a mut dyn WorldStore,
    /// External collaborators.
    pub oracles: Oracles<'a>,
    /// Active configuration.
    pub config: &'a SimulationConfig,
    /// Seeded random source.
    pub rng: &'a mut StdRng,
    /// Wall-clock "now" supplied by the time driver.
    pub wall_now: DateTime<Utc>,
}

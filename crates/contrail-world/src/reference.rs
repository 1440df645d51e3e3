//! Reference oracle implementations.
//!
//! Good enough to drive a world end-to-end: a gravity demand model, a
//! distance-based fare curve with era inflation, per-class slot limits, and
//! a great-circle waypoint overlay. Production deployments plug their own
//! implementations into the same traits.

use contrail_types::{Airport, AirportClass, CabinClass, Waypoint, WorldId};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::geo::{great_circle_km, intermediate_point};
use crate::oracle::{
    DemandOracle, DestinationCandidate, FareOracle, RouteCensus, SlotAuthority, WaypointRouter,
};

// ---------------------------------------------------------------------------
// Demand
// ---------------------------------------------------------------------------

/// Sectors shorter than this are not worth flying.
const MIN_SECTOR_KM: f64 = 150.0;

/// Gravity model: demand product over a distance decay.
#[derive(Debug, Clone)]
pub struct GravityDemandOracle {
    airports: Vec<Airport>,
    distance_decay: f64,
}

impl GravityDemandOracle {
    /// Build the oracle over a fixed airport set.
    pub const fn new(airports: Vec<Airport>, distance_decay: f64) -> Self {
        Self {
            airports,
            distance_decay,
        }
    }
}

impl DemandOracle for GravityDemandOracle {
    fn ranked_destinations(&self, origin: &Airport, era_year: i32) -> Vec<DestinationCandidate> {
        let mut scored: Vec<(DestinationCandidate, &str)> = self
            .airports
            .iter()
            .filter(|a| a.id != origin.id && a.opened_year <= era_year)
            .filter_map(|a| {
                let distance = great_circle_km(origin, a);
                if distance < MIN_SECTOR_KM {
                    return None;
                }
                let mass = f64::from(origin.demand_score) * f64::from(a.demand_score);
                let score = mass / distance.powf(self.distance_decay);
                Some((
                    DestinationCandidate {
                        airport: a.id,
                        score,
                    },
                    a.code.as_str(),
                ))
            })
            .collect();

        scored.sort_by(|(a, a_code), (b, b_code)| {
            b.score.total_cmp(&a.score).then_with(|| a_code.cmp(b_code))
        });
        scored.into_iter().map(|(c, _)| c).collect()
    }
}

// ---------------------------------------------------------------------------
// Fares
// ---------------------------------------------------------------------------

/// Distance-based fare curve, deflated for earlier eras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceFareOracle {
    /// Fixed component of an economy fare in reference-year money.
    pub base: f64,
    /// Per-kilometre component of an economy fare.
    pub per_km: f64,
    /// Year whose price level the constants are expressed in.
    pub reference_year: i32,
    /// Compound yearly price growth.
    pub annual_inflation: f64,
}

impl Default for DistanceFareOracle {
    fn default() -> Self {
        Self {
            base: 45.0,
            per_km: 0.11,
            reference_year: 2020,
            annual_inflation: 0.03,
        }
    }
}

impl DistanceFareOracle {
    const fn cabin_multiplier(cabin: CabinClass) -> f64 {
        match cabin {
            CabinClass::Economy => 1.0,
            CabinClass::Business => 3.2,
            CabinClass::First => 5.5,
        }
    }
}

impl FareOracle for DistanceFareOracle {
    fn base_fare(&self, distance_km: f64, era_year: i32, cabin: CabinClass) -> Decimal {
        let years = era_year.saturating_sub(self.reference_year);
        let price_level = (1.0 + self.annual_inflation).powi(years).clamp(0.05, 5.0);
        let fare = (self.base + self.per_km * distance_km.max(0.0))
            * price_level
            * Self::cabin_multiplier(cabin);
        Decimal::from_f64(fare)
            .unwrap_or(Decimal::ONE)
            .round_dp(2)
            .max(Decimal::ONE)
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Per-class cap on routes touching an airport, plus a cap per pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassSlotAuthority {
    /// Route cap at hub airports.
    pub hub: u32,
    /// Route cap at major airports.
    pub major: u32,
    /// Route cap at regional airports.
    pub regional: u32,
    /// Route cap on one origin-destination pair, either direction.
    pub per_pair: u32,
}

impl Default for ClassSlotAuthority {
    fn default() -> Self {
        Self {
            hub: 60,
            major: 30,
            regional: 12,
            per_pair: 3,
        }
    }
}

impl ClassSlotAuthority {
    const fn limit(&self, class: AirportClass) -> u32 {
        match class {
            AirportClass::Hub => self.hub,
            AirportClass::Major => self.major,
            AirportClass::Regional => self.regional,
        }
    }
}

impl SlotAuthority for ClassSlotAuthority {
    fn permits_route(
        &self,
        census: &dyn RouteCensus,
        world: WorldId,
        origin: &Airport,
        destination: &Airport,
    ) -> bool {
        census.active_routes_between(world, origin.id, destination.id) < self.per_pair
            && census.active_routes_at(world, origin.id) < self.limit(origin.class)
            && census.active_routes_at(world, destination.id) < self.limit(destination.class)
    }
}

// ---------------------------------------------------------------------------
// Waypoints
// ---------------------------------------------------------------------------

/// Evenly spaced points along the great circle.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleRouter {
    spacing_km: f64,
}

impl GreatCircleRouter {
    /// Router emitting one point every `spacing_km` (at least 50 km).
    pub const fn new(spacing_km: f64) -> Self {
        Self {
            spacing_km: if spacing_km < 50.0 { 50.0 } else { spacing_km },
        }
    }
}

impl WaypointRouter for GreatCircleRouter {
    fn plot(&self, origin: &Airport, destination: &Airport) -> Result<Vec<Waypoint>, WorldError> {
        if origin.id == destination.id {
            return Err(WorldError::DegenerateRoute(origin.id));
        }
        let distance = great_circle_km(origin, destination);
        let mut points = Vec::new();
        let mut travelled = self.spacing_km;
        while travelled < distance {
            points.push(intermediate_point(origin, destination, travelled / distance));
            travelled += self.spacing_km;
        }
        Ok(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use contrail_types::AirportId;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::airports::StaticAirportDirectory;
    use crate::oracle::AirportDirectory;

    struct FixedCensus {
        at: BTreeMap<AirportId, u32>,
        between: u32,
    }

    impl RouteCensus for FixedCensus {
        fn active_routes_at(&self, _world: WorldId, airport: AirportId) -> u32 {
            self.at.get(&airport).copied().unwrap_or(0)
        }

        fn active_routes_between(&self, _world: WorldId, _a: AirportId, _b: AirportId) -> u32 {
            self.between
        }
    }

    #[test]
    fn demand_ranking_excludes_origin_and_unopened_airports() {
        let directory = StaticAirportDirectory::seeded().unwrap();
        let oracle = GravityDemandOracle::new(directory.airports(), 0.6);
        let lhr = directory.by_code("LHR").unwrap();
        let ist = directory.by_code("IST").unwrap();

        let ranked = oracle.ranked_destinations(lhr, 2000);
        assert!(!ranked.is_empty());
        assert!(ranked.iter().all(|c| c.airport != lhr.id));
        assert!(ranked.iter().all(|c| c.airport != ist.id));
        assert!(ranked.windows(2).all(|w| w.first().unwrap().score >= w.last().unwrap().score));
    }

    #[test]
    fn fares_grow_with_distance_cabin_and_era() {
        let oracle = DistanceFareOracle::default();
        let short = oracle.base_fare(500.0, 2020, CabinClass::Economy);
        let long = oracle.base_fare(5000.0, 2020, CabinClass::Economy);
        let business = oracle.base_fare(500.0, 2020, CabinClass::Business);
        let older = oracle.base_fare(500.0, 1980, CabinClass::Economy);
        assert_eq!(short, dec!(100.00));
        assert!(long > short);
        assert!(business > short);
        assert!(older < short);
        assert!(older >= Decimal::ONE);
    }

    #[test]
    fn slot_authority_enforces_pair_and_airport_caps() {
        let directory = StaticAirportDirectory::seeded().unwrap();
        let lhr = directory.by_code("LHR").unwrap();
        let edi = directory.by_code("EDI").unwrap();
        let authority = ClassSlotAuthority {
            per_pair: 1,
            ..ClassSlotAuthority::default()
        };
        let world = WorldId::new();

        let open = FixedCensus {
            at: BTreeMap::new(),
            between: 0,
        };
        assert!(authority.permits_route(&open, world, lhr, edi));

        let pair_full = FixedCensus {
            at: BTreeMap::new(),
            between: 1,
        };
        assert!(!authority.permits_route(&pair_full, world, lhr, edi));

        let regional_full = FixedCensus {
            at: BTreeMap::from([(edi.id, 12)]),
            between: 0,
        };
        assert!(!authority.permits_route(&regional_full, world, lhr, edi));
    }

    #[test]
    fn router_plots_interior_points_and_rejects_self_routes() {
        let directory = StaticAirportDirectory::seeded().unwrap();
        let lhr = directory.by_code("LHR").unwrap();
        let jfk = directory.by_code("JFK").unwrap();
        let router = GreatCircleRouter::new(500.0);

        let path = router.plot(lhr, jfk).unwrap();
        assert_eq!(path.len(), 11);
        assert!(matches!(router.plot(lhr, lhr), Err(WorldError::DegenerateRoute(_))));
    }
}

//! Population planner: decides where AI airlines are based and creates them.
//!
//! World creation ranks airports, allocates regional quotas, guarantees
//! competition at the human player's base, and then walks the spawn tiers.
//! Every created airline goes through [`spawn_batch`], which writes through a
//! bounded [`BatchWriter`] so one bad record never sinks the whole batch.
//! The single-agent path [`spawn_replacement`] is used by the lifecycle
//! manager when a bankrupt airline is replaced.

use std::cmp::Reverse;

use contrail_agents::{
    AirlineIdentity, IdentityError, TakenIdentities, draw_personality, draw_service,
    generate_identity, pick_initial_fleet, roll, within_capacity,
};
use contrail_types::{
    AircraftType, Airline, AirlineId, Airport, AirportId, FleetUnit, FleetUnitId, Region, World,
};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::batch::{BatchSink, BatchWriter};
use crate::config::{DifficultyConfig, RegionWeight, SpawnTier};
use crate::context::SimContext;
use crate::money::scale;
use crate::store::{StoreError, WorldStore};

/// Chance of basing a replacement at the player's airport once the minimum
/// competitor count is met but the maximum is not.
const BASE_PROXIMITY_PROBABILITY: f64 = 0.5;

/// Errors that abort a planning call as a whole.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The store rejected a read or a write that cannot be skipped.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// An airport id is missing from the directory.
    #[error("unknown airport: {0}")]
    UnknownAirport(AirportId),

    /// An airport code is missing from the directory.
    #[error("unknown airport code: {0}")]
    UnknownAirportCode(String),

    /// The configured era year has no representable start date.
    #[error("invalid era year: {0}")]
    InvalidEra(i32),

    /// No airport is open in the world's era.
    #[error("no eligible airports in era {0}")]
    NoEligibleAirports(i32),
}

/// One airline to create.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    /// Base airport.
    pub base: Airport,
    /// Smallest starting fleet.
    pub fleet_min: u32,
    /// Largest starting fleet.
    pub fleet_max: u32,
}

impl SpawnRequest {
    fn new(base: &Airport, tier: Option<&SpawnTier>) -> Self {
        let (fleet_min, fleet_max) = tier.map_or((1, 1), |t| {
            (t.fleet_min.min(t.fleet_max), t.fleet_max.max(t.fleet_min))
        });
        Self {
            base: base.clone(),
            fleet_min,
            fleet_max,
        }
    }
}

/// Totals for one planning call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Airlines asked for.
    pub requested: usize,
    /// Airlines persisted, in creation order.
    pub airline_ids: Vec<AirlineId>,
    /// Slots skipped because no unique identity could be found.
    pub identity_failures: usize,
    /// Slots skipped because the store rejected the record.
    pub persistence_failures: usize,
}

impl SpawnReport {
    /// Number of airlines persisted.
    pub fn spawned(&self) -> usize {
        self.airline_ids.len()
    }
}

/// Source of airline identities.
pub trait IdentityIssuer {
    /// Issue and reserve one identity.
    fn issue(
        &mut self,
        rng: &mut StdRng,
        taken: &mut TakenIdentities,
        region: Region,
        era_year: i32,
    ) -> Result<AirlineIdentity, IdentityError>;
}

/// Issues identities from the random name and code generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedIdentities;

impl IdentityIssuer for GeneratedIdentities {
    fn issue(
        &mut self,
        rng: &mut StdRng,
        taken: &mut TakenIdentities,
        region: Region,
        era_year: i32,
    ) -> Result<AirlineIdentity, IdentityError> {
        generate_identity(rng, taken, region, era_year)
    }
}

// ---------------------------------------------------------------------------
// Airport selection
// ---------------------------------------------------------------------------

fn rank_key(airport: &Airport) -> (contrail_types::AirportClass, Reverse<u32>, &str) {
    (airport.class, Reverse(airport.demand_score), &airport.code)
}

fn sort_by_rank(airports: &mut [Airport]) {
    airports.sort_by(|a, b| rank_key(a).cmp(&rank_key(b)));
}

/// Airports open in `era_year`, hubs first, then by demand.
pub fn rank_airports(airports: Vec<Airport>, era_year: i32) -> Vec<Airport> {
    let mut ranked: Vec<Airport> = airports
        .into_iter()
        .filter(|a| a.opened_year <= era_year)
        .collect();
    sort_by_rank(&mut ranked);
    ranked
}

/// `round(total × weight / sum)`, rounding halves up.
fn regional_quota(total: usize, weight: u32, sum: u64) -> usize {
    let total = u64::try_from(total).unwrap_or(u64::MAX);
    let numerator = total
        .saturating_mul(u64::from(weight))
        .saturating_mul(2)
        .saturating_add(sum);
    let quota = numerator.checked_div(sum.saturating_mul(2)).unwrap_or(0);
    usize::try_from(quota).unwrap_or(usize::MAX)
}

/// Pick the airports that receive tier airlines.
///
/// Each region gets its weighted share of `total` from its best airports.
/// Rounding overshoot is trimmed from the tail of the ranking and any
/// shortfall is backfilled from the global ranking, so the result holds
/// `min(total, ranked.len())` airports. The player's base is always present,
/// replacing the lowest-ranked pick when the set is full.
pub fn select_airports(
    ranked: &[Airport],
    total: usize,
    weights: &[RegionWeight],
    base: Option<&Airport>,
) -> Vec<Airport> {
    let target = total.min(ranked.len());
    let sum = weights
        .iter()
        .fold(0u64, |acc, w| acc.saturating_add(u64::from(w.weight)));

    let mut picked: Vec<Airport> = Vec::with_capacity(target);
    for weight in weights {
        let quota = regional_quota(total, weight.weight, sum);
        let share: Vec<Airport> = ranked
            .iter()
            .filter(|a| a.region == weight.region && !picked.iter().any(|p| p.id == a.id))
            .take(quota)
            .cloned()
            .collect();
        picked.extend(share);
    }

    sort_by_rank(&mut picked);
    picked.truncate(target);

    for airport in ranked {
        if picked.len() >= target {
            break;
        }
        if !picked.iter().any(|p| p.id == airport.id) {
            picked.push(airport.clone());
        }
    }

    if let Some(base) = base.filter(|b| !picked.iter().any(|p| p.id == b.id)) {
        if picked.len() >= total.max(1) {
            sort_by_rank(&mut picked);
            picked.pop();
        }
        picked.push(base.clone());
    }

    sort_by_rank(&mut picked);
    debug!(
        requested = total,
        selected = picked.len(),
        "Selected spawn airports"
    );
    picked
}

fn count_ai_at(store: &dyn WorldStore, world: &World, airport: AirportId) -> u32 {
    let n = store
        .airlines(world.id)
        .iter()
        .filter(|a| a.is_ai && a.is_active && a.base_airport == airport)
        .count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Active AI airlines in a world.
pub fn active_ai_count(store: &dyn WorldStore, world: &World) -> u32 {
    let n = store
        .airlines(world.id)
        .iter()
        .filter(|a| a.is_ai && a.is_active)
        .count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Populate a freshly founded world with its initial AI airlines.
pub fn plan_population(ctx: &mut SimContext<'_>, world: &World) -> Result<SpawnReport, SpawnError> {
    let config = ctx.config;
    let oracles = ctx.oracles;
    let difficulty = config.difficulty.get(world.difficulty);

    let ranked = rank_airports(oracles.airports.airports(), world.era_year);
    if ranked.is_empty() {
        return Err(SpawnError::NoEligibleAirports(world.era_year));
    }
    let base = match world.player_base {
        Some(id) => Some(
            oracles
                .airports
                .airport(id)
                .ok_or(SpawnError::UnknownAirport(id))?,
        ),
        None => None,
    };

    let total = usize::try_from(difficulty.total_airport_slots()).unwrap_or(usize::MAX);
    let selected = select_airports(&ranked, total, &difficulty.region_weights, base.as_ref());

    let mut requests = Vec::new();
    if let Some(base) = &base {
        let (min, max) = difficulty.base_guarantee.for_class(base.class).ordered();
        let count = ctx.rng.random_range(min..=max);
        let first_tier = difficulty.spawn_tiers.first();
        for _ in 0..count {
            requests.push(SpawnRequest::new(base, first_tier));
        }
        info!(
            base = %base.code,
            guaranteed = count,
            "Guaranteeing competition at player base"
        );
    }
    for (rank, airport) in selected.iter().enumerate() {
        let tier = difficulty.tier_for_rank(rank);
        let per_airport = tier.map_or(0, |t| t.airlines_per_airport);
        for _ in 0..per_airport {
            requests.push(SpawnRequest::new(airport, tier));
        }
    }

    let report = spawn_batch(ctx, world, &requests, &mut GeneratedIdentities)?;
    info!(
        world = %world.id,
        airports = selected.len(),
        requested = report.requested,
        spawned = report.spawned(),
        identity_failures = report.identity_failures,
        persistence_failures = report.persistence_failures,
        "Population planned"
    );
    Ok(report)
}

/// Choose a base for a single replacement airline.
///
/// The player's base is chosen while its AI competitor count is below the
/// guaranteed minimum, half the time while below the maximum, and otherwise
/// a random airport among the top-ranked spawn slots is used.
fn replacement_request(
    ctx: &mut SimContext<'_>,
    world: &World,
    difficulty: &DifficultyConfig,
) -> Result<SpawnRequest, SpawnError> {
    let oracles = ctx.oracles;
    let ranked = rank_airports(oracles.airports.airports(), world.era_year);
    let rank_of = |id: AirportId| ranked.iter().position(|a| a.id == id).unwrap_or(0);

    if let Some(base_id) = world.player_base {
        let base = oracles
            .airports
            .airport(base_id)
            .ok_or(SpawnError::UnknownAirport(base_id))?;
        let (min, max) = difficulty.base_guarantee.for_class(base.class).ordered();
        let competitors = count_ai_at(&*ctx.store, world, base_id);
        let at_base = competitors < min
            || (competitors < max && roll(&mut *ctx.rng, BASE_PROXIMITY_PROBABILITY));
        if at_base {
            let tier = difficulty.tier_for_rank(rank_of(base_id));
            return Ok(SpawnRequest::new(&base, tier));
        }
    }

    let slots = usize::try_from(difficulty.total_airport_slots())
        .unwrap_or(usize::MAX)
        .max(1);
    let top = ranked.get(..slots.min(ranked.len())).unwrap_or(&[]);
    let airport = top
        .choose(&mut *ctx.rng)
        .ok_or(SpawnError::NoEligibleAirports(world.era_year))?;
    let tier = difficulty.tier_for_rank(rank_of(airport.id));
    Ok(SpawnRequest::new(airport, tier))
}

/// Create one replacement airline. Returns `None` when its identity or its
/// record could not be created; the reason has already been logged.
pub fn spawn_replacement(
    ctx: &mut SimContext<'_>,
    world: &World,
) -> Result<Option<Airline>, SpawnError> {
    let config = ctx.config;
    let difficulty = config.difficulty.get(world.difficulty);
    let request = replacement_request(ctx, world, difficulty)?;
    let report = spawn_batch(
        ctx,
        world,
        std::slice::from_ref(&request),
        &mut GeneratedIdentities,
    )?;
    match report.airline_ids.first() {
        Some(id) => Ok(Some(ctx.store.airline(*id)?)),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Batch spawning
// ---------------------------------------------------------------------------

/// An airline and its starting fleet awaiting persistence.
#[derive(Debug, Clone)]
struct PendingAirline {
    airline: Airline,
    fleet: Vec<FleetUnit>,
}

/// Writes airlines, then the fleets of the airlines that were written.
struct AirlineSink<'s> {
    store: &'s mut dyn WorldStore,
    persisted: Vec<AirlineId>,
}

impl BatchSink<PendingAirline> for AirlineSink<'_> {
    type Error = StoreError;

    fn write_batch(&mut self, items: &[PendingAirline]) -> Result<(), StoreError> {
        let airlines: Vec<Airline> = items.iter().map(|p| p.airline.clone()).collect();
        self.store.insert_airlines(&airlines)?;
        for pending in items {
            self.persisted.push(pending.airline.id);
            if let Err(e) = self.store.insert_fleet_units(&pending.fleet) {
                warn!(
                    airline = %pending.airline.id,
                    error = %e,
                    "Starting fleet could not be stored"
                );
            }
        }
        Ok(())
    }
}

/// Create one airline per request, skipping slots whose identity or record
/// cannot be created.
///
/// Identity exhaustion after `K` of `N` requests yields exactly `K`
/// airlines; it is never an error for the batch.
pub fn spawn_batch(
    ctx: &mut SimContext<'_>,
    world: &World,
    requests: &[SpawnRequest],
    issuer: &mut impl IdentityIssuer,
) -> Result<SpawnReport, SpawnError> {
    let config = ctx.config;
    let oracles = ctx.oracles;
    let difficulty = config.difficulty.get(world.difficulty);
    let balance = scale(
        config.economy.era_capital(world.era_year),
        difficulty.balance_multiplier,
    );
    let personalities = difficulty.personality_weights.table();
    let eligible = oracles.catalog.eligible_types(world.era_year);

    let mut taken = TakenIdentities::from_airlines(&ctx.store.airlines(world.id));
    let mut report = SpawnReport {
        requested: requests.len(),
        ..SpawnReport::default()
    };
    let mut identities = Vec::with_capacity(requests.len());
    let mut sink = AirlineSink {
        store: &mut *ctx.store,
        persisted: Vec::new(),
    };
    let mut writer = BatchWriter::new(config.scheduler.persist_batch_size);

    for request in requests {
        let identity = match issuer.issue(
            &mut *ctx.rng,
            &mut taken,
            request.base.region,
            world.era_year,
        ) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(base = %request.base.code, error = %e, "Skipping spawn slot");
                report.identity_failures = report.identity_failures.saturating_add(1);
                continue;
            }
        };

        let max_seats = config.airport_classes.max_seats(request.base.class);
        let candidates = fleet_candidates(&eligible, max_seats);
        let size = ctx.rng.random_range(request.fleet_min..=request.fleet_max);
        let aircraft = pick_initial_fleet(&mut *ctx.rng, &candidates, size);

        let airline = Airline {
            id: AirlineId::new(),
            world_id: world.id,
            name: identity.name.clone(),
            icao_code: identity.icao_code.clone(),
            iata_code: identity.iata_code.clone(),
            region: request.base.region,
            base_airport: request.base.id,
            balance,
            personality: draw_personality(&mut *ctx.rng, &personalities),
            service: draw_service(&mut *ctx.rng),
            last_decision_at: None,
            is_active: true,
            is_ai: true,
            founded_at: world.game_time,
            ceased_at: None,
        };
        let fleet = starting_fleet(&airline, &aircraft);
        debug!(
            airline = %airline.name,
            base = %request.base.code,
            personality = %airline.personality,
            fleet = fleet.len(),
            "Prepared airline"
        );
        identities.push((airline.id, identity));
        writer.push(PendingAirline { airline, fleet }, &mut sink);
    }

    let batch = writer.finish(&mut sink);
    for failed in &batch.failed {
        if let Some((_, identity)) = identities.iter().find(|(id, _)| *id == failed.airline.id) {
            taken.release(identity);
        }
    }
    report.persistence_failures = batch.failed.len();
    report.airline_ids = sink.persisted;
    Ok(report)
}

/// Era types that fit the base; the smallest era type when none fit.
fn fleet_candidates(eligible: &[AircraftType], max_seats: u32) -> Vec<AircraftType> {
    let fitting = within_capacity(eligible, max_seats);
    if fitting.is_empty() {
        eligible
            .iter()
            .min_by_key(|t| t.seats)
            .cloned()
            .into_iter()
            .collect()
    } else {
        fitting
    }
}

fn starting_fleet(airline: &Airline, aircraft: &[AircraftType]) -> Vec<FleetUnit> {
    aircraft
        .iter()
        .zip(1u32..)
        .map(|(t, n)| FleetUnit {
            id: FleetUnitId::new(),
            airline_id: airline.id,
            aircraft_type: t.id,
            registration: format!("{}-{n:02}", airline.icao_code),
            purchase_price: Decimal::ZERO,
            route_id: None,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use contrail_types::{AirportClass, Region};
    use contrail_world::airport_id_for;

    use super::*;

    fn airport(code: &str, region: Region, class: AirportClass, demand: u32) -> Airport {
        Airport {
            id: airport_id_for(code),
            code: code.to_owned(),
            name: code.to_owned(),
            region,
            class,
            demand_score: demand,
            latitude: 0.0,
            longitude: 0.0,
            opened_year: 1950,
        }
    }

    fn sample() -> Vec<Airport> {
        vec![
            airport("AAA", Region::Europe, AirportClass::Hub, 90),
            airport("BBB", Region::Europe, AirportClass::Major, 80),
            airport("CCC", Region::Europe, AirportClass::Regional, 70),
            airport("DDD", Region::Asia, AirportClass::Hub, 95),
            airport("EEE", Region::Asia, AirportClass::Major, 60),
            airport("FFF", Region::NorthAmerica, AirportClass::Hub, 85),
            airport("GGG", Region::NorthAmerica, AirportClass::Regional, 20),
        ]
    }

    fn weights(pairs: &[(Region, u32)]) -> Vec<RegionWeight> {
        pairs
            .iter()
            .map(|&(region, weight)| RegionWeight { region, weight })
            .collect()
    }

    #[test]
    fn ranking_puts_hubs_first_then_demand() {
        let ranked = rank_airports(sample(), 1990);
        let codes: Vec<&str> = ranked.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, ["DDD", "AAA", "FFF", "BBB", "EEE", "CCC", "GGG"]);
    }

    #[test]
    fn ranking_drops_unopened_airports() {
        let mut airports = sample();
        airports[0].opened_year = 2005;
        assert_eq!(rank_airports(airports, 1990).len(), 6);
    }

    #[test]
    fn quotas_round_to_nearest() {
        assert_eq!(regional_quota(10, 1, 3), 3);
        assert_eq!(regional_quota(10, 2, 3), 7);
        assert_eq!(regional_quota(5, 1, 2), 3);
        assert_eq!(regional_quota(5, 1, 0), 0);
    }

    #[test]
    fn selection_size_matches_slots_after_backfill() {
        let ranked = rank_airports(sample(), 1990);
        // Oceania has no airports, so its share must be backfilled.
        let w = weights(&[(Region::Europe, 1), (Region::Oceania, 3)]);
        let picked = select_airports(&ranked, 5, &w, None);
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn selection_is_capped_by_eligible_airports() {
        let ranked = rank_airports(sample(), 1990);
        let w = weights(&[(Region::Europe, 1)]);
        assert_eq!(select_airports(&ranked, 50, &w, None).len(), 7);
    }

    #[test]
    fn base_replaces_lowest_pick_when_full() {
        let ranked = rank_airports(sample(), 1990);
        let base = ranked.iter().find(|a| a.code == "GGG").cloned().unwrap();
        let w = weights(&[(Region::Asia, 1), (Region::Europe, 1)]);
        let picked = select_airports(&ranked, 3, &w, Some(&base));

        assert_eq!(picked.len(), 3);
        assert!(picked.iter().any(|a| a.code == "GGG"));
    }

    #[test]
    fn replacement_fleet_falls_back_to_smallest_type() {
        let catalog = contrail_world::StaticFleetCatalog::seeded();
        let eligible = contrail_world::FleetCatalog::eligible_types(&catalog, 1990);
        let smallest = eligible.iter().map(|t| t.seats).min().unwrap();
        let candidates = fleet_candidates(&eligible, 1);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].seats, smallest);
    }
}

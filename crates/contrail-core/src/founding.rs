//! Founding a new world and its human player airline.

use contrail_types::{
    Airline, AirlineId, Personality, ServiceChoices, ServiceTier, World, WorldId, WorldStatus,
};
use contrail_world::AirportDirectory;
use tracing::info;

use crate::clock::start_of_year;
use crate::config::SimulationConfig;
use crate::population::SpawnError;
use crate::store::WorldStore;

/// Create an active world at January 1st of the configured era together
/// with the player's airline at the configured base.
pub fn found_world(
    store: &mut dyn WorldStore,
    config: &SimulationConfig,
    airports: &dyn AirportDirectory,
) -> Result<World, SpawnError> {
    let settings = &config.world;
    let base = airports
        .airports()
        .into_iter()
        .find(|a| a.code.eq_ignore_ascii_case(&settings.player_base))
        .ok_or_else(|| SpawnError::UnknownAirportCode(settings.player_base.clone()))?;
    let game_time =
        start_of_year(settings.era_year).ok_or(SpawnError::InvalidEra(settings.era_year))?;

    let world_id = WorldId::new();
    let player_id = AirlineId::new();
    let world = World {
        id: world_id,
        name: settings.name.clone(),
        time_acceleration: settings.time_acceleration,
        difficulty: settings.difficulty,
        era_year: settings.era_year,
        status: WorldStatus::Active,
        game_time,
        player_airline: Some(player_id),
        player_base: Some(base.id),
    };
    store.insert_world(world.clone())?;

    let player = Airline {
        id: player_id,
        world_id,
        name: settings.player_name.clone(),
        icao_code: settings.player_icao.clone(),
        iata_code: settings.player_iata.clone(),
        region: base.region,
        base_airport: base.id,
        balance: config.economy.era_capital(settings.era_year),
        personality: Personality::Balanced,
        service: ServiceChoices {
            catering: ServiceTier::Standard,
            seating: ServiceTier::Standard,
            cabin_crew: ServiceTier::Standard,
        },
        last_decision_at: None,
        is_active: true,
        is_ai: false,
        founded_at: game_time,
        ceased_at: None,
    };
    store.insert_airlines(std::slice::from_ref(&player))?;

    info!(
        world = %world.id,
        name = %world.name,
        difficulty = %world.difficulty,
        era = world.era_year,
        base = %base.code,
        "World founded"
    );
    Ok(world)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use contrail_world::StaticAirportDirectory;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn founding_creates_world_and_player() {
        let mut store = MemoryStore::new();
        let config = SimulationConfig::default();
        let airports = StaticAirportDirectory::seeded().unwrap();

        let world = found_world(&mut store, &config, &airports).unwrap();
        let airlines = store.airlines(world.id);

        assert_eq!(airlines.len(), 1);
        assert!(!airlines[0].is_ai);
        assert_eq!(world.player_airline, Some(airlines[0].id));
        assert_eq!(world.player_base, Some(contrail_world::airport_id_for("LHR")));
    }

    #[test]
    fn unknown_base_code_is_rejected() {
        let mut store = MemoryStore::new();
        let mut config = SimulationConfig::default();
        config.world.player_base = "ZZZ".to_owned();
        let airports = StaticAirportDirectory::seeded().unwrap();

        assert!(matches!(
            found_world(&mut store, &config, &airports),
            Err(SpawnError::UnknownAirportCode(_))
        ));
    }
}

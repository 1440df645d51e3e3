//! Configuration loading and typed config structures for Contrail.
//!
//! The canonical configuration lives in `contrail-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file)
//! yields a runnable normal-difficulty world. Difficulty presets differ in
//! their numbers only; the algorithms reading them are identical.

use std::path::Path;

use contrail_types::{AirportClass, Difficulty, Personality, Region};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::money::scale;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {variable}: {value}")]
    InvalidOverride {
        /// Environment variable name.
        variable: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World creation and tick pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Era capital and purchase budgets.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Per-tick agent batch and consistency cadence.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Deferred replacement timing.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Largest aircraft each airport class can handle.
    #[serde(default)]
    pub airport_classes: AirportClassConfig,

    /// Per-difficulty presets.
    #[serde(default)]
    pub difficulty: DifficultyTable,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `CONTRAIL_SEED` overrides `world.seed`
    /// - `CONTRAIL_SNAPSHOT` overrides `world.snapshot_path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.world.apply_env_overrides()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// World creation and tick pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Display name of the world.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the simulation random source.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Difficulty tier for newly created worlds.
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,

    /// Starting era year.
    #[serde(default = "default_era_year")]
    pub era_year: i32,

    /// Game seconds per wall-clock second.
    #[serde(default = "default_time_acceleration")]
    pub time_acceleration: u32,

    /// Wall-clock milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Location code of the human player's base airport.
    #[serde(default = "default_player_base")]
    pub player_base: String,

    /// Display name of the human player's airline.
    #[serde(default = "default_player_name")]
    pub player_name: String,

    /// 3-letter code of the human player's airline.
    #[serde(default = "default_player_icao")]
    pub player_icao: String,

    /// 2-letter code of the human player's airline.
    #[serde(default = "default_player_iata")]
    pub player_iata: String,

    /// Where to load and save the JSON world snapshot, if anywhere.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            difficulty: default_difficulty(),
            era_year: default_era_year(),
            time_acceleration: default_time_acceleration(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            player_base: default_player_base(),
            player_name: default_player_name(),
            player_icao: default_player_icao(),
            player_iata: default_player_iata(),
            snapshot_path: None,
        }
    }
}

impl WorldConfig {
    /// Apply `CONTRAIL_SEED` and `CONTRAIL_SNAPSHOT` overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("CONTRAIL_SEED") {
            self.seed = val.parse().map_err(|_| ConfigError::InvalidOverride {
                variable: "CONTRAIL_SEED",
                value: val.clone(),
            })?;
        }
        if let Ok(val) = std::env::var("CONTRAIL_SNAPSHOT") {
            self.snapshot_path = Some(val);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// Capital multiplier in effect from a given year onward.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EraStep {
    /// First year the multiplier applies.
    pub from_year: i32,
    /// Fraction of base capital available in this era.
    pub multiplier: f64,
}

/// Era capital and purchase budgets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EconomyConfig {
    /// Starting capital in the most recent era, in whole currency units.
    #[serde(default = "default_base_capital")]
    pub base_capital: u64,

    /// Era scaling steps applied to `base_capital`.
    #[serde(default = "default_era_steps")]
    pub era_steps: Vec<EraStep>,

    /// Largest share of the balance one aircraft purchase may use.
    #[serde(default = "default_budget_fraction")]
    pub budget_fraction: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_capital: default_base_capital(),
            era_steps: default_era_steps(),
            budget_fraction: default_budget_fraction(),
        }
    }
}

impl EconomyConfig {
    /// Starting capital for `era_year`.
    ///
    /// Uses the latest step at or before the year; years before every step
    /// use the earliest step. No steps means no scaling.
    pub fn era_capital(&self, era_year: i32) -> Decimal {
        let multiplier = self
            .era_steps
            .iter()
            .filter(|s| s.from_year <= era_year)
            .max_by_key(|s| s.from_year)
            .or_else(|| self.era_steps.iter().min_by_key(|s| s.from_year))
            .map_or(1.0, |s| s.multiplier);
        scale(Decimal::from(self.base_capital), multiplier)
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Per-tick work bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    /// Most airlines processed per tick.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Records per persistence batch when spawning.
    #[serde(default = "default_persist_batch_size")]
    pub persist_batch_size: usize,

    /// Ticks between flight-instance consistency passes.
    #[serde(default = "default_consistency_interval_ticks")]
    pub consistency_interval_ticks: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            persist_batch_size: default_persist_batch_size(),
            consistency_interval_ticks: default_consistency_interval_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Deferred replacement timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifecycleConfig {
    /// Shortest game-time delay before a replacement, in days.
    #[serde(default = "default_replacement_delay_min_days")]
    pub replacement_delay_min_days: u32,

    /// Longest game-time delay before a replacement, in days.
    #[serde(default = "default_replacement_delay_max_days")]
    pub replacement_delay_max_days: u32,

    /// Upper bound on the wall-clock wait, in seconds.
    #[serde(default = "default_max_real_wait_secs")]
    pub max_real_wait_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            replacement_delay_min_days: default_replacement_delay_min_days(),
            replacement_delay_max_days: default_replacement_delay_max_days(),
            max_real_wait_secs: default_max_real_wait_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Airport classes
// ---------------------------------------------------------------------------

/// Largest aircraft (by seats) each airport class can handle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AirportClassConfig {
    /// Seat cap at hubs.
    #[serde(default = "default_hub_max_seats")]
    pub hub_max_seats: u32,
    /// Seat cap at major airports.
    #[serde(default = "default_major_max_seats")]
    pub major_max_seats: u32,
    /// Seat cap at regional airports.
    #[serde(default = "default_regional_max_seats")]
    pub regional_max_seats: u32,
}

impl Default for AirportClassConfig {
    fn default() -> Self {
        Self {
            hub_max_seats: default_hub_max_seats(),
            major_max_seats: default_major_max_seats(),
            regional_max_seats: default_regional_max_seats(),
        }
    }
}

impl AirportClassConfig {
    /// Seat cap for an airport class.
    pub const fn max_seats(&self, class: AirportClass) -> u32 {
        match class {
            AirportClass::Hub => self.hub_max_seats,
            AirportClass::Major => self.major_max_seats,
            AirportClass::Regional => self.regional_max_seats,
        }
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// One spawn tier: how many airports, how dense, how big the fleets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpawnTier {
    /// Airports consumed by this tier.
    pub airports: u32,
    /// Airlines spawned at each of those airports.
    pub airlines_per_airport: u32,
    /// Smallest founding fleet.
    pub fleet_min: u32,
    /// Largest founding fleet.
    pub fleet_max: u32,
}

/// Target share of spawn airports for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RegionWeight {
    /// Region the weight applies to.
    pub region: Region,
    /// Relative weight.
    pub weight: u32,
}

/// Inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountRange {
    /// Lower bound.
    pub min: u32,
    /// Upper bound.
    pub max: u32,
}

impl CountRange {
    /// Bounds in ascending order, whatever order they were configured in.
    pub const fn ordered(self) -> (u32, u32) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }
}

/// Extra AI competitors placed at the player's base, by base class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BaseGuarantee {
    /// Rule when the player's base is a hub.
    pub hub: CountRange,
    /// Rule when the player's base is a major airport.
    pub major: CountRange,
    /// Rule when the player's base is a regional airport.
    pub regional: CountRange,
}

impl BaseGuarantee {
    /// Rule for an airport class.
    pub const fn for_class(&self, class: AirportClass) -> CountRange {
        match class {
            AirportClass::Hub => self.hub,
            AirportClass::Major => self.major,
            AirportClass::Regional => self.regional,
        }
    }
}

/// Relative personality weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PersonalityWeights {
    /// Weight of conservative airlines.
    pub conservative: u32,
    /// Weight of balanced airlines.
    pub balanced: u32,
    /// Weight of aggressive airlines.
    pub aggressive: u32,
}

impl PersonalityWeights {
    /// Weights as a categorical table.
    pub const fn table(&self) -> [(Personality, u32); 3] {
        [
            (Personality::Conservative, self.conservative),
            (Personality::Balanced, self.balanced),
            (Personality::Aggressive, self.aggressive),
        ]
    }
}

/// Presets for each difficulty tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DifficultyTable {
    /// Easy preset.
    #[serde(default = "DifficultyConfig::easy")]
    pub easy: DifficultyConfig,
    /// Normal preset.
    #[serde(default = "DifficultyConfig::normal")]
    pub normal: DifficultyConfig,
    /// Hard preset.
    #[serde(default = "DifficultyConfig::hard")]
    pub hard: DifficultyConfig,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyConfig::easy(),
            normal: DifficultyConfig::normal(),
            hard: DifficultyConfig::hard(),
        }
    }
}

impl DifficultyTable {
    /// Preset for a difficulty tier.
    pub const fn get(&self, difficulty: Difficulty) -> &DifficultyConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// Every threshold and probability the agent core reads for one tier.
///
/// Fields missing from a YAML section fall back to the normal preset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Ordered spawn tiers, densest first.
    pub spawn_tiers: Vec<SpawnTier>,
    /// Regional share of spawn airports.
    pub region_weights: Vec<RegionWeight>,
    /// Extra competitors at the player's base.
    pub base_guarantee: BaseGuarantee,
    /// Active AI airlines the lifecycle manager tops up to. When unset the
    /// target is the largest population planning can create.
    pub target_population: Option<u32>,
    /// Starting balance as a multiple of era capital.
    pub balance_multiplier: f64,
    /// Personality mix of spawned airlines.
    pub personality_weights: PersonalityWeights,
    /// Game hours between two decision cycles of one airline.
    pub decision_interval_hours: u32,
    /// Largest fleet an AI airline grows to.
    pub max_fleet_size: u32,
    /// Chance of taking the best-ranked destination.
    pub selection_accuracy: f64,
    /// How many top destinations a suboptimal pick draws from.
    pub suboptimal_pool: u32,
    /// Multiplier applied to oracle fares.
    pub pricing_modifier: f64,
    /// Whether bankrupt airlines are replaced.
    pub repopulation: bool,
    /// Chance per cycle of buying an aircraft.
    pub expansion_probability: f64,
    /// Balance must exceed this share of era capital to expand.
    pub expansion_balance_fraction: f64,
    /// Balance below this share of era capital allows contraction.
    pub contraction_balance_fraction: f64,
    /// Balance below minus this share of era capital forces contraction.
    pub distress_fraction: f64,
    /// Balance below minus this share of era capital is terminal.
    pub terminal_fraction: f64,
    /// Chance per cycle of repricing one route.
    pub pricing_probability: f64,
    /// Fare step applied for high or low load factors.
    pub fare_adjustment: f64,
    /// Load factor above which fares rise.
    pub high_load_factor: f64,
    /// Load factor below which fares fall.
    pub low_load_factor: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl DifficultyConfig {
    /// Easy preset: sparse competition, no repopulation.
    pub fn easy() -> Self {
        Self {
            spawn_tiers: vec![tier(3, 2, 2, 4), tier(6, 1, 1, 3)],
            base_guarantee: BaseGuarantee {
                hub: range(1, 2),
                major: range(1, 1),
                regional: range(0, 1),
            },
            balance_multiplier: 0.6,
            personality_weights: PersonalityWeights {
                conservative: 50,
                balanced: 40,
                aggressive: 10,
            },
            decision_interval_hours: 48,
            max_fleet_size: 12,
            selection_accuracy: 0.5,
            pricing_modifier: 1.10,
            repopulation: false,
            expansion_probability: 0.15,
            expansion_balance_fraction: 0.5,
            pricing_probability: 0.2,
            ..Self::normal()
        }
    }

    /// Normal preset.
    pub fn normal() -> Self {
        Self {
            spawn_tiers: vec![tier(4, 2, 3, 6), tier(8, 1, 2, 4), tier(8, 1, 1, 2)],
            region_weights: default_region_weights(),
            target_population: None,
            base_guarantee: BaseGuarantee {
                hub: range(2, 3),
                major: range(1, 2),
                regional: range(1, 1),
            },
            balance_multiplier: 0.8,
            personality_weights: PersonalityWeights {
                conservative: 30,
                balanced: 50,
                aggressive: 20,
            },
            decision_interval_hours: 24,
            max_fleet_size: 20,
            selection_accuracy: 0.75,
            suboptimal_pool: 5,
            pricing_modifier: 1.0,
            repopulation: true,
            expansion_probability: 0.25,
            expansion_balance_fraction: 0.4,
            contraction_balance_fraction: 0.1,
            distress_fraction: 0.5,
            terminal_fraction: 1.5,
            pricing_probability: 0.3,
            fare_adjustment: 0.1,
            high_load_factor: 0.85,
            low_load_factor: 0.5,
        }
    }

    /// Hard preset: dense, well-funded, sharp competition.
    pub fn hard() -> Self {
        Self {
            spawn_tiers: vec![tier(5, 3, 4, 8), tier(10, 2, 2, 5), tier(15, 1, 1, 3)],
            base_guarantee: BaseGuarantee {
                hub: range(3, 4),
                major: range(2, 3),
                regional: range(1, 2),
            },
            balance_multiplier: 1.0,
            personality_weights: PersonalityWeights {
                conservative: 15,
                balanced: 40,
                aggressive: 45,
            },
            decision_interval_hours: 12,
            max_fleet_size: 35,
            selection_accuracy: 0.9,
            pricing_modifier: 0.95,
            expansion_probability: 0.35,
            expansion_balance_fraction: 0.3,
            pricing_probability: 0.4,
            ..Self::normal()
        }
    }

    /// Sum of airports across all spawn tiers.
    pub fn total_airport_slots(&self) -> u32 {
        self.spawn_tiers
            .iter()
            .fold(0u32, |acc, t| acc.saturating_add(t.airports))
    }

    /// Most AI airlines planning can create: every tier slot filled plus
    /// the largest base guarantee of any airport class.
    pub fn planned_ceiling(&self) -> u32 {
        let tiered = self.spawn_tiers.iter().fold(0u32, |acc, t| {
            acc.saturating_add(t.airports.saturating_mul(t.airlines_per_airport))
        });
        let guarantee = [
            self.base_guarantee.hub,
            self.base_guarantee.major,
            self.base_guarantee.regional,
        ]
        .into_iter()
        .map(|r| r.ordered().1)
        .max()
        .unwrap_or(0);
        tiered.saturating_add(guarantee)
    }

    /// Active AI airlines the lifecycle manager tops up to.
    pub fn population_target(&self) -> u32 {
        self.target_population.unwrap_or_else(|| self.planned_ceiling())
    }

    /// Tier covering the airport at `rank` (0-based) in the spawn order.
    ///
    /// Ranks past the last tier fall into the last tier.
    pub fn tier_for_rank(&self, rank: usize) -> Option<&SpawnTier> {
        let mut end = 0usize;
        for t in &self.spawn_tiers {
            end = end.saturating_add(usize::try_from(t.airports).unwrap_or(usize::MAX));
            if rank < end {
                return Some(t);
            }
        }
        self.spawn_tiers.last()
    }
}

const fn tier(airports: u32, airlines_per_airport: u32, fleet_min: u32, fleet_max: u32) -> SpawnTier {
    SpawnTier {
        airports,
        airlines_per_airport,
        fleet_min,
        fleet_max,
    }
}

const fn range(min: u32, max: u32) -> CountRange {
    CountRange { min, max }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Contrail".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_difficulty() -> Difficulty {
    Difficulty::Normal
}

const fn default_era_year() -> i32 {
    1990
}

const fn default_time_acceleration() -> u32 {
    1440
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_player_base() -> String {
    "LHR".to_owned()
}

fn default_player_name() -> String {
    "Contrail Player Airways".to_owned()
}

fn default_player_icao() -> String {
    "CPA".to_owned()
}

fn default_player_iata() -> String {
    "CP".to_owned()
}

const fn default_base_capital() -> u64 {
    400_000_000
}

fn default_era_steps() -> Vec<EraStep> {
    vec![
        EraStep {
            from_year: 1930,
            multiplier: 0.02,
        },
        EraStep {
            from_year: 1950,
            multiplier: 0.05,
        },
        EraStep {
            from_year: 1970,
            multiplier: 0.15,
        },
        EraStep {
            from_year: 1990,
            multiplier: 0.45,
        },
        EraStep {
            from_year: 2010,
            multiplier: 1.0,
        },
    ]
}

const fn default_budget_fraction() -> f64 {
    0.4
}

const fn default_batch_size() -> u32 {
    10
}

const fn default_persist_batch_size() -> usize {
    50
}

const fn default_consistency_interval_ticks() -> u64 {
    30
}

const fn default_replacement_delay_min_days() -> u32 {
    14
}

const fn default_replacement_delay_max_days() -> u32 {
    45
}

const fn default_max_real_wait_secs() -> u64 {
    3600
}

const fn default_hub_max_seats() -> u32 {
    450
}

const fn default_major_max_seats() -> u32 {
    300
}

const fn default_regional_max_seats() -> u32 {
    120
}

fn default_region_weights() -> Vec<RegionWeight> {
    [
        (Region::NorthAmerica, 25),
        (Region::Europe, 25),
        (Region::Asia, 25),
        (Region::MiddleEast, 8),
        (Region::SouthAmerica, 7),
        (Region::Africa, 5),
        (Region::Oceania, 5),
    ]
    .into_iter()
    .map(|(region, weight)| RegionWeight { region, weight })
    .collect()
}

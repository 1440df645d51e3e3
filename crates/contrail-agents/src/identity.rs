//! Collision-free airline identities.
//!
//! An identity is a display name plus a 3-letter and a 2-letter code, all
//! unique within one world. Names combine a region-weighted prefix with an
//! era suffix. Codes favour pronounceable consonant-vowel shapes before
//! falling back to uniform letters. Every attempt is bounded and exhaustion
//! is reported as an [`IdentityError`] value.

use std::collections::BTreeSet;

use contrail_types::{Airline, Region};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::error::IdentityError;
use crate::weighted::roll;

/// Simple `prefix suffix` name attempts before switching to compounds.
pub const NAME_ATTEMPTS: u32 = 25;

/// Compound `prefix prefix suffix` name attempts.
pub const COMPOUND_NAME_ATTEMPTS: u32 = 25;

/// Pattern-biased code attempts.
pub const PATTERN_CODE_ATTEMPTS: u32 = 60;

/// Uniform-letter code attempts after the pattern-biased ones.
pub const UNIFORM_CODE_ATTEMPTS: u32 = 200;

/// Chance of drawing a prefix from the airline's own region.
const REGIONAL_PREFIX_PROBABILITY: f64 = 0.7;

/// Chance of a patterned code on each pattern-biased attempt.
const PATTERN_PROBABILITY: f64 = 0.8;

/// First era year that uses casual suffixes.
pub const CASUAL_SUFFIX_YEAR: i32 = 1978;

const CONSONANTS: &[u8] = b"BCDFGHJKLMNPQRSTVWXZ";
const VOWELS: &[u8] = b"AEIOU";

pub(crate) const GLOBAL_PREFIXES: &[&str] = &[
    "Sky", "Star", "Horizon", "Aurora", "Blue", "Silver", "Golden", "Global", "Vista", "Apex",
    "Nova", "Zenith", "Polar", "Sun", "Comet", "Swift", "Crown", "Royal", "Trans", "Meridian",
];

pub(crate) const FORMAL_SUFFIXES: &[&str] = &[
    "Airways",
    "Air Lines",
    "Air Transport",
    "Aviation Company",
    "Air Services",
    "Aerial Transport",
    "Airlines Corporation",
];

pub(crate) const CASUAL_SUFFIXES: &[&str] =
    &["Air", "Jet", "Fly", "Wings", "Express", "Connect", "Hop"];

pub(crate) const fn regional_prefixes(region: Region) -> &'static [&'static str] {
    match region {
        Region::NorthAmerica => &[
            "Liberty", "Pioneer", "Frontier", "Eagle", "Prairie", "Atlantic", "Pacific", "Summit",
            "Lakeshore", "Sierra", "Cascade", "Maple",
        ],
        Region::SouthAmerica => &[
            "Andes", "Condor", "Pampas", "Amazonia", "Austral", "Tango", "Patagonia", "Caribe",
            "Cordillera", "Solaris",
        ],
        Region::Europe => &[
            "Hanseatic", "Danube", "Rhine", "Celtic", "Adriatic", "Aegean", "Alpine", "Nordic",
            "Baltic", "Continental", "Lusitania", "Carpathian",
        ],
        Region::Africa => &[
            "Savanna", "Kilimanjaro", "Sahara", "Zambezi", "Nile", "Atlas", "Kalahari", "Serengeti",
            "Congo", "Baobab",
        ],
        Region::MiddleEast => &[
            "Oasis", "Falcon", "Crescent", "Levant", "Arabian", "Mirage", "Zephyr", "Dune", "Pearl",
            "Saffron",
        ],
        Region::Asia => &[
            "Lotus", "Jade", "Orient", "Dragon", "Sakura", "Monsoon", "Himalaya", "Mekong",
            "Silk Road", "Bamboo", "Phoenix",
        ],
        Region::Oceania => &[
            "Southern Cross", "Coral", "Outback", "Kiwi", "Tasman", "Reef", "Pacifica", "Koala",
            "Kauri", "Boomerang",
        ],
    }
}

/// Which code space an airline code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// Three-letter ICAO-style code.
    Icao,
    /// Two-letter IATA-style code.
    Iata,
}

impl CodeKind {
    /// Number of letters in a code of this kind.
    pub const fn letters(self) -> usize {
        match self {
            Self::Icao => 3,
            Self::Iata => 2,
        }
    }

    const fn pattern(self) -> &'static [&'static [u8]] {
        match self {
            Self::Icao => &[CONSONANTS, VOWELS, CONSONANTS],
            Self::Iata => &[CONSONANTS, VOWELS],
        }
    }
}

impl core::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Icao => write!(f, "3-letter"),
            Self::Iata => write!(f, "2-letter"),
        }
    }
}

/// A freshly issued airline identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirlineIdentity {
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Unique 3-letter code.
    pub icao_code: String,
    /// Unique 2-letter code.
    pub iata_code: String,
}

/// Names and codes already in use within one world.
///
/// Identities are reserved the moment they are issued, so airlines still
/// waiting in an unflushed batch are protected from collisions.
#[derive(Debug, Clone, Default)]
pub struct TakenIdentities {
    names: BTreeSet<String>,
    icao_codes: BTreeSet<String>,
    iata_codes: BTreeSet<String>,
}

impl TakenIdentities {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the identities of every airline ever created in a world.
    pub fn from_airlines<'a>(airlines: impl IntoIterator<Item = &'a Airline>) -> Self {
        let mut taken = Self::new();
        for airline in airlines {
            taken.reserve(&AirlineIdentity {
                name: airline.name.clone(),
                icao_code: airline.icao_code.clone(),
                iata_code: airline.iata_code.clone(),
            });
        }
        taken
    }

    /// Whether `name` is in use, ignoring case.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Whether `code` is in use in the given code space.
    pub fn is_code_taken(&self, kind: CodeKind, code: &str) -> bool {
        self.codes(kind).contains(code)
    }

    /// Mark an identity as in use.
    pub fn reserve(&mut self, identity: &AirlineIdentity) {
        self.names.insert(identity.name.to_lowercase());
        self.icao_codes.insert(identity.icao_code.clone());
        self.iata_codes.insert(identity.iata_code.clone());
    }

    /// Return an identity that was never persisted.
    pub fn release(&mut self, identity: &AirlineIdentity) {
        self.names.remove(&identity.name.to_lowercase());
        self.icao_codes.remove(&identity.icao_code);
        self.iata_codes.remove(&identity.iata_code);
    }

    /// Number of reserved names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is reserved.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    const fn codes(&self, kind: CodeKind) -> &BTreeSet<String> {
        match kind {
            CodeKind::Icao => &self.icao_codes,
            CodeKind::Iata => &self.iata_codes,
        }
    }
}

/// Generate and reserve a unique identity for an airline based in `region`.
///
/// Nothing is reserved when any part of the identity cannot be resolved.
pub fn generate_identity(
    rng: &mut impl Rng,
    taken: &mut TakenIdentities,
    region: Region,
    era_year: i32,
) -> Result<AirlineIdentity, IdentityError> {
    let name = generate_name(rng, taken, region, era_year)?;
    let icao_code = generate_code(rng, taken, CodeKind::Icao)?;
    let iata_code = generate_code(rng, taken, CodeKind::Iata)?;

    let identity = AirlineIdentity {
        name,
        icao_code,
        iata_code,
    };
    taken.reserve(&identity);

    debug!(
        name = %identity.name,
        icao = %identity.icao_code,
        iata = %identity.iata_code,
        "Issued airline identity"
    );
    Ok(identity)
}

fn generate_name(
    rng: &mut impl Rng,
    taken: &TakenIdentities,
    region: Region,
    era_year: i32,
) -> Result<String, IdentityError> {
    let suffixes = if era_year < CASUAL_SUFFIX_YEAR {
        FORMAL_SUFFIXES
    } else {
        CASUAL_SUFFIXES
    };

    for _ in 0..NAME_ATTEMPTS {
        let name = format!("{} {}", prefix(rng, region), pick(rng, suffixes));
        if !taken.is_name_taken(&name) {
            return Ok(name);
        }
    }

    for _ in 0..COMPOUND_NAME_ATTEMPTS {
        let first = prefix(rng, region);
        let second = prefix(rng, region);
        if first == second {
            continue;
        }
        let name = format!("{first} {second} {}", pick(rng, suffixes));
        if !taken.is_name_taken(&name) {
            return Ok(name);
        }
    }

    Err(IdentityError::NameExhausted {
        attempts: NAME_ATTEMPTS.saturating_add(COMPOUND_NAME_ATTEMPTS),
    })
}

fn generate_code(
    rng: &mut impl Rng,
    taken: &TakenIdentities,
    kind: CodeKind,
) -> Result<String, IdentityError> {
    for _ in 0..PATTERN_CODE_ATTEMPTS {
        let code = if roll(rng, PATTERN_PROBABILITY) {
            patterned_code(rng, kind)
        } else {
            uniform_code(rng, kind)
        };
        if !taken.is_code_taken(kind, &code) {
            return Ok(code);
        }
    }

    for _ in 0..UNIFORM_CODE_ATTEMPTS {
        let code = uniform_code(rng, kind);
        if !taken.is_code_taken(kind, &code) {
            return Ok(code);
        }
    }

    Err(IdentityError::CodeExhausted {
        kind,
        attempts: PATTERN_CODE_ATTEMPTS.saturating_add(UNIFORM_CODE_ATTEMPTS),
    })
}

fn prefix(rng: &mut impl Rng, region: Region) -> &'static str {
    if roll(rng, REGIONAL_PREFIX_PROBABILITY) {
        pick(rng, regional_prefixes(region))
    } else {
        pick(rng, GLOBAL_PREFIXES)
    }
}

fn pick<'a>(rng: &mut impl Rng, list: &[&'a str]) -> &'a str {
    list.choose(rng).copied().unwrap_or_default()
}

fn patterned_code(rng: &mut impl Rng, kind: CodeKind) -> String {
    kind.pattern()
        .iter()
        .filter_map(|letters| letters.choose(rng))
        .map(|&b| char::from(b))
        .collect()
}

fn uniform_code(rng: &mut impl Rng, kind: CodeKind) -> String {
    (0..kind.letters())
        .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn all_simple_names(region: Region, suffixes: &[&str]) -> Vec<String> {
        regional_prefixes(region)
            .iter()
            .chain(GLOBAL_PREFIXES)
            .flat_map(|p| suffixes.iter().map(move |s| format!("{p} {s}")))
            .collect()
    }

    #[test]
    fn identities_are_unique_across_many_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut taken = TakenIdentities::new();
        let mut names = BTreeSet::new();
        let mut icao = BTreeSet::new();
        let mut iata = BTreeSet::new();

        for i in 0..300 {
            let region = Region::ALL.get(i % Region::ALL.len()).copied().unwrap();
            let id = generate_identity(&mut rng, &mut taken, region, 1995).unwrap();
            assert!(names.insert(id.name.to_lowercase()));
            assert!(icao.insert(id.icao_code.clone()));
            assert!(iata.insert(id.iata_code.clone()));
            assert_eq!(id.icao_code.len(), 3);
            assert_eq!(id.iata_code.len(), 2);
            assert!(id.icao_code.chars().all(|c| c.is_ascii_uppercase()));
        }
        assert_eq!(taken.len(), 300);
    }

    #[test]
    fn era_selects_suffix_register() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut taken = TakenIdentities::new();
        for _ in 0..20 {
            let old = generate_identity(&mut rng, &mut taken, Region::Europe, 1960).unwrap();
            assert!(FORMAL_SUFFIXES.iter().any(|s| old.name.ends_with(s)), "{}", old.name);
            let new = generate_identity(&mut rng, &mut taken, Region::Europe, 2005).unwrap();
            assert!(CASUAL_SUFFIXES.iter().any(|s| new.name.ends_with(s)), "{}", new.name);
        }
    }

    #[test]
    fn name_collisions_are_case_insensitive() {
        let mut taken = TakenIdentities::new();
        taken.reserve(&AirlineIdentity {
            name: String::from("Nordic Air"),
            icao_code: String::from("NOR"),
            iata_code: String::from("NA"),
        });
        assert!(taken.is_name_taken("NORDIC AIR"));
        assert!(taken.is_code_taken(CodeKind::Icao, "NOR"));
        assert!(!taken.is_code_taken(CodeKind::Iata, "NOR"));
    }

    #[test]
    fn falls_back_to_compound_names() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut taken = TakenIdentities::new();
        for name in all_simple_names(Region::Oceania, CASUAL_SUFFIXES) {
            taken.names.insert(name.to_lowercase());
        }

        let id = generate_identity(&mut rng, &mut taken, Region::Oceania, 2010).unwrap();
        let simple = all_simple_names(Region::Oceania, CASUAL_SUFFIXES);
        assert!(!simple.iter().any(|n| n.eq_ignore_ascii_case(&id.name)));
    }

    #[test]
    fn exhausted_code_space_is_an_error_value() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut taken = TakenIdentities::new();
        for a in b'A'..=b'Z' {
            for b in b'A'..=b'Z' {
                taken
                    .iata_codes
                    .insert([char::from(a), char::from(b)].iter().collect());
            }
        }

        let result = generate_identity(&mut rng, &mut taken, Region::Asia, 2000);
        assert_eq!(
            result,
            Err(IdentityError::CodeExhausted {
                kind: CodeKind::Iata,
                attempts: 260,
            })
        );
        assert!(taken.names.is_empty(), "nothing reserved on failure");
    }

    #[test]
    fn release_frees_an_identity() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut taken = TakenIdentities::new();
        let id = generate_identity(&mut rng, &mut taken, Region::Africa, 1990).unwrap();
        taken.release(&id);
        assert!(!taken.is_name_taken(&id.name));
        assert!(taken.is_empty());
    }
}

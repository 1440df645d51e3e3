//! Built-in aircraft catalog spanning the piston era to current types.

use std::collections::BTreeMap;

use contrail_types::{AircraftType, AircraftTypeId};
use rust_decimal::Decimal;

use crate::oracle::FleetCatalog;
use crate::stable_id;

/// Namespace byte for aircraft type ids.
const AIRCRAFT_NAMESPACE: u8 = 0xC7;

/// Seed row: name, family, seats, range km, cruise km/h, list price, introduced, retired.
type SeedRow = (&'static str, &'static str, u32, u32, u32, i64, i32, Option<i32>);

#[rustfmt::skip]
const SEED: &[SeedRow] = &[
    ("Douglas DC-3", "DC-3", 32, 2_400, 270, 150_000, 1936, Some(1955)),
    ("Lockheed L-749 Constellation", "Constellation", 81, 7_000, 480, 1_200_000, 1947, Some(1960)),
    ("Vickers Viscount 800", "Viscount", 65, 2_200, 500, 900_000, 1950, Some(1966)),
    ("Boeing 707-320", "707", 180, 9_300, 960, 6_000_000, 1959, Some(1979)),
    ("Douglas DC-9-30", "DC-9", 105, 2_800, 800, 4_500_000, 1967, Some(1982)),
    ("Boeing 727-200", "727", 150, 4_000, 880, 5_500_000, 1967, Some(1984)),
    ("Boeing 737-200", "737", 115, 3_500, 780, 6_000_000, 1968, Some(1988)),
    ("Boeing 747-100", "747", 366, 9_800, 900, 24_000_000, 1970, Some(1986)),
    ("McDonnell Douglas DC-10-30", "DC-10", 270, 9_600, 880, 20_000_000, 1972, Some(1989)),
    ("Airbus A300B4", "A300", 250, 5_400, 840, 22_000_000, 1974, Some(2007)),
    ("Fokker 100", "Fokker", 100, 3_100, 760, 20_000_000, 1988, Some(1997)),
    ("Airbus A320", "A320", 165, 6_100, 830, 45_000_000, 1988, None),
    ("Boeing 767-300ER", "767", 260, 11_000, 850, 90_000_000, 1988, None),
    ("ATR 72-600", "ATR", 70, 1_500, 510, 18_000_000, 1989, None),
    ("Boeing 747-400", "747", 416, 13_400, 910, 160_000_000, 1989, Some(2009)),
    ("Bombardier CRJ200", "CRJ", 50, 3_000, 810, 22_000_000, 1992, Some(2006)),
    ("Airbus A330-300", "A330", 290, 11_700, 870, 120_000_000, 1994, None),
    ("Boeing 737-800", "737", 170, 5_400, 840, 55_000_000, 1998, Some(2020)),
    ("Boeing 777-300ER", "777", 365, 13_600, 905, 200_000_000, 2004, None),
    ("Embraer E175", "E-Jet", 78, 3_700, 830, 32_000_000, 2005, None),
    ("Boeing 787-9", "787", 290, 14_000, 900, 180_000_000, 2014, None),
    ("Airbus A350-900", "A350", 315, 15_000, 900, 190_000_000, 2015, None),
    ("Airbus A321neo", "A320", 200, 7_400, 830, 70_000_000, 2016, None),
];

/// Stable id for an aircraft type name.
pub fn aircraft_type_id_for(name: &str) -> AircraftTypeId {
    AircraftTypeId::from(stable_id(AIRCRAFT_NAMESPACE, name))
}

/// In-memory aircraft catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticFleetCatalog {
    types: BTreeMap<AircraftTypeId, AircraftType>,
}

impl StaticFleetCatalog {
    /// Catalog populated with the built-in aircraft list.
    pub fn seeded() -> Self {
        Self::from_types(SEED.iter().map(
            |&(name, family, seats, range_km, cruise_speed_kmh, price, introduced_year, retired_year)| {
                AircraftType {
                    id: aircraft_type_id_for(name),
                    name: name.to_owned(),
                    family: family.to_owned(),
                    seats,
                    range_km,
                    cruise_speed_kmh,
                    price: Decimal::from(price),
                    introduced_year,
                    retired_year,
                }
            },
        ))
    }

    /// Catalog built from an arbitrary type list.
    pub fn from_types(types: impl IntoIterator<Item = AircraftType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id, t)).collect(),
        }
    }
}

impl FleetCatalog for StaticFleetCatalog {
    fn eligible_types(&self, era_year: i32) -> Vec<AircraftType> {
        self.types
            .values()
            .filter(|t| t.is_available(era_year))
            .cloned()
            .collect()
    }

    fn aircraft_type(&self, id: AircraftTypeId) -> Option<AircraftType> {
        self.types.get(&id).cloned()
    }
}

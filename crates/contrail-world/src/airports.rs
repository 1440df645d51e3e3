//! Built-in airport directory.
//!
//! Sixty real airports spread across all seven regions, each with a
//! hub/major/regional class, a relative demand score, coordinates, and
//! the year it opened to commercial traffic. Ids are derived from the
//! location code so they stay stable across snapshot reloads.

use std::collections::BTreeMap;

use contrail_types::{Airport, AirportClass, AirportId, Region};

use crate::error::WorldError;
use crate::oracle::AirportDirectory;
use crate::stable_id;

/// Namespace byte for airport ids.
const AIRPORT_NAMESPACE: u8 = 0xA1;

/// Seed row: code, name, region, class, demand, latitude, longitude, opened.
type SeedRow = (&'static str, &'static str, Region, AirportClass, u32, f64, f64, i32);

#[rustfmt::skip]
const SEED: &[SeedRow] = &[
    ("ATL", "Hartsfield-Jackson Atlanta", Region::NorthAmerica, AirportClass::Hub, 98, 33.6407, -84.4277, 1926),
    ("LAX", "Los Angeles International", Region::NorthAmerica, AirportClass::Hub, 95, 33.9416, -118.4085, 1928),
    ("ORD", "Chicago O'Hare", Region::NorthAmerica, AirportClass::Hub, 94, 41.9742, -87.9073, 1944),
    ("JFK", "New York John F. Kennedy", Region::NorthAmerica, AirportClass::Hub, 96, 40.6413, -73.7781, 1948),
    ("DFW", "Dallas/Fort Worth", Region::NorthAmerica, AirportClass::Hub, 88, 32.8998, -97.0403, 1974),
    ("YYZ", "Toronto Pearson", Region::NorthAmerica, AirportClass::Hub, 82, 43.6777, -79.6248, 1939),
    ("DEN", "Denver International", Region::NorthAmerica, AirportClass::Major, 80, 39.8561, -104.6737, 1995),
    ("SFO", "San Francisco International", Region::NorthAmerica, AirportClass::Major, 84, 37.6213, -122.3790, 1927),
    ("MIA", "Miami International", Region::NorthAmerica, AirportClass::Major, 78, 25.7959, -80.2870, 1928),
    ("SEA", "Seattle-Tacoma", Region::NorthAmerica, AirportClass::Major, 74, 47.4502, -122.3088, 1944),
    ("YVR", "Vancouver International", Region::NorthAmerica, AirportClass::Major, 66, 49.1967, -123.1815, 1931),
    ("MEX", "Mexico City International", Region::NorthAmerica, AirportClass::Major, 76, 19.4361, -99.0719, 1952),
    ("BOS", "Boston Logan", Region::NorthAmerica, AirportClass::Major, 72, 42.3656, -71.0096, 1923),
    ("PDX", "Portland International", Region::NorthAmerica, AirportClass::Regional, 48, 45.5898, -122.5951, 1940),
    ("ABQ", "Albuquerque Sunport", Region::NorthAmerica, AirportClass::Regional, 30, 35.0402, -106.6090, 1939),
    ("GRU", "Sao Paulo Guarulhos", Region::SouthAmerica, AirportClass::Hub, 85, -23.4356, -46.4731, 1985),
    ("EZE", "Buenos Aires Ezeiza", Region::SouthAmerica, AirportClass::Major, 68, -34.8222, -58.5358, 1949),
    ("BOG", "Bogota El Dorado", Region::SouthAmerica, AirportClass::Major, 70, 4.7016, -74.1469, 1959),
    ("SCL", "Santiago Arturo Merino Benitez", Region::SouthAmerica, AirportClass::Major, 62, -33.3930, -70.7858, 1967),
    ("LIM", "Lima Jorge Chavez", Region::SouthAmerica, AirportClass::Major, 60, -12.0219, -77.1143, 1960),
    ("CUZ", "Cusco Alejandro Velasco Astete", Region::SouthAmerica, AirportClass::Regional, 25, -13.5357, -71.9388, 1964),
    ("LHR", "London Heathrow", Region::Europe, AirportClass::Hub, 97, 51.4700, -0.4543, 1946),
    ("CDG", "Paris Charles de Gaulle", Region::Europe, AirportClass::Hub, 93, 49.0097, 2.5479, 1974),
    ("FRA", "Frankfurt am Main", Region::Europe, AirportClass::Hub, 90, 50.0379, 8.5622, 1936),
    ("AMS", "Amsterdam Schiphol", Region::Europe, AirportClass::Hub, 89, 52.3105, 4.7683, 1916),
    ("IST", "Istanbul", Region::Europe, AirportClass::Hub, 87, 41.2753, 28.7519, 2018),
    ("MAD", "Madrid Barajas", Region::Europe, AirportClass::Major, 80, 40.4983, -3.5676, 1931),
    ("FCO", "Rome Fiumicino", Region::Europe, AirportClass::Major, 76, 41.8003, 12.2389, 1961),
    ("MUC", "Munich", Region::Europe, AirportClass::Major, 75, 48.3538, 11.7861, 1992),
    ("ZRH", "Zurich", Region::Europe, AirportClass::Major, 64, 47.4582, 8.5555, 1948),
    ("CPH", "Copenhagen Kastrup", Region::Europe, AirportClass::Major, 62, 55.6180, 12.6508, 1925),
    ("DUB", "Dublin", Region::Europe, AirportClass::Major, 60, 53.4264, -6.2499, 1940),
    ("EDI", "Edinburgh", Region::Europe, AirportClass::Regional, 45, 55.9508, -3.3615, 1947),
    ("BRS", "Bristol", Region::Europe, AirportClass::Regional, 32, 51.3827, -2.7191, 1957),
    ("JNB", "Johannesburg O. R. Tambo", Region::Africa, AirportClass::Hub, 72, -26.1367, 28.2411, 1952),
    ("CAI", "Cairo International", Region::Africa, AirportClass::Major, 66, 30.1219, 31.4056, 1963),
    ("ADD", "Addis Ababa Bole", Region::Africa, AirportClass::Major, 58, 8.9779, 38.7993, 1961),
    ("LOS", "Lagos Murtala Muhammed", Region::Africa, AirportClass::Major, 60, 6.5774, 3.3212, 1979),
    ("NBO", "Nairobi Jomo Kenyatta", Region::Africa, AirportClass::Major, 55, -1.3192, 36.9278, 1958),
    ("CPT", "Cape Town International", Region::Africa, AirportClass::Regional, 48, -33.9715, 18.6021, 1954),
    ("DXB", "Dubai International", Region::MiddleEast, AirportClass::Hub, 95, 25.2532, 55.3657, 1960),
    ("DOH", "Doha Hamad", Region::MiddleEast, AirportClass::Hub, 80, 25.2731, 51.6081, 2014),
    ("AUH", "Abu Dhabi International", Region::MiddleEast, AirportClass::Major, 66, 24.4330, 54.6511, 1982),
    ("TLV", "Tel Aviv Ben Gurion", Region::MiddleEast, AirportClass::Major, 58, 32.0055, 34.8854, 1936),
    ("AMM", "Amman Queen Alia", Region::MiddleEast, AirportClass::Regional, 40, 31.7226, 35.9932, 1983),
    ("HND", "Tokyo Haneda", Region::Asia, AirportClass::Hub, 96, 35.5494, 139.7798, 1931),
    ("PEK", "Beijing Capital", Region::Asia, AirportClass::Hub, 94, 40.0799, 116.6031, 1958),
    ("SIN", "Singapore Changi", Region::Asia, AirportClass::Hub, 92, 1.3644, 103.9915, 1981),
    ("HKG", "Hong Kong International", Region::Asia, AirportClass::Hub, 91, 22.3080, 113.9185, 1998),
    ("ICN", "Seoul Incheon", Region::Asia, AirportClass::Hub, 88, 37.4602, 126.4407, 2001),
    ("BKK", "Bangkok Suvarnabhumi", Region::Asia, AirportClass::Hub, 86, 13.6900, 100.7501, 2006),
    ("DEL", "Delhi Indira Gandhi", Region::Asia, AirportClass::Hub, 87, 28.5562, 77.1000, 1962),
    ("BOM", "Mumbai Chhatrapati Shivaji", Region::Asia, AirportClass::Major, 82, 19.0896, 72.8656, 1942),
    ("KUL", "Kuala Lumpur International", Region::Asia, AirportClass::Major, 76, 2.7456, 101.7072, 1998),
    ("MNL", "Manila Ninoy Aquino", Region::Asia, AirportClass::Major, 70, 14.5086, 121.0194, 1948),
    ("CTS", "Sapporo New Chitose", Region::Asia, AirportClass::Regional, 50, 42.7752, 141.6923, 1988),
    ("SYD", "Sydney Kingsford Smith", Region::Oceania, AirportClass::Hub, 84, -33.9399, 151.1753, 1920),
    ("MEL", "Melbourne Tullamarine", Region::Oceania, AirportClass::Major, 74, -37.6690, 144.8410, 1970),
    ("AKL", "Auckland", Region::Oceania, AirportClass::Major, 62, -37.0082, 174.7850, 1966),
    ("BNE", "Brisbane", Region::Oceania, AirportClass::Major, 60, -27.3842, 153.1175, 1988),
    ("PER", "Perth", Region::Oceania, AirportClass::Regional, 50, -31.9385, 115.9672, 1944),
    ("NAN", "Nadi International", Region::Oceania, AirportClass::Regional, 28, -17.7554, 177.4431, 1939),
];

/// Stable id for an airport location code.
pub fn airport_id_for(code: &str) -> AirportId {
    AirportId::from(stable_id(AIRPORT_NAMESPACE, code))
}

/// In-memory airport directory keyed by id with a code index.
#[derive(Debug, Clone, Default)]
pub struct StaticAirportDirectory {
    airports: BTreeMap<AirportId, Airport>,
    by_code: BTreeMap<String, AirportId>,
}

impl StaticAirportDirectory {
    /// Build a directory from the built-in airport list.
    pub fn seeded() -> Result<Self, WorldError> {
        let airports = SEED.iter().map(
            |&(code, name, region, class, demand_score, latitude, longitude, opened_year)| {
                Airport {
                    id: airport_id_for(code),
                    code: code.to_owned(),
                    name: name.to_owned(),
                    region,
                    class,
                    demand_score,
                    latitude,
                    longitude,
                    opened_year,
                }
            },
        );
        Self::from_airports(airports)
    }

    /// Build a directory from an arbitrary airport list.
    ///
    /// Fails if two airports share a location code.
    pub fn from_airports(airports: impl IntoIterator<Item = Airport>) -> Result<Self, WorldError> {
        let mut directory = Self::default();
        for airport in airports {
            if directory.by_code.contains_key(&airport.code) {
                return Err(WorldError::DuplicateAirportCode(airport.code));
            }
            directory.by_code.insert(airport.code.clone(), airport.id);
            directory.airports.insert(airport.id, airport);
        }
        Ok(directory)
    }

    /// Look up an airport by its location code.
    pub fn by_code(&self, code: &str) -> Option<&Airport> {
        self.by_code.get(code).and_then(|id| self.airports.get(id))
    }

    /// Number of airports in the directory.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl AirportDirectory for StaticAirportDirectory {
    fn airport(&self, id: AirportId) -> Option<Airport> {
        self.airports.get(&id).cloned()
    }

    fn airports(&self) -> Vec<Airport> {
        self.airports.values().cloned().collect()
    }
}

//! Compile-time registry of the cities the rate model was trained on.
//!
//! The table is embedded from `data/cities.toml` via `include_str!`. A
//! deployment may override it with a CSV file (see
//! [`crate::tables::load_cities`]), but the embedded table is always
//! available so the city view works without any external files.

use crime_risk_geography_models::{City, Coordinate, names};
use serde::Deserialize;

/// Number of embedded cities. Enforced by a test.
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 19;

const CITIES_TOML: &str = include_str!("../data/cities.toml");

#[derive(Debug, Deserialize)]
struct CityFile {
    cities: Vec<CityEntry>,
}

#[derive(Debug, Deserialize)]
struct CityEntry {
    id: u32,
    name: String,
    population: f64,
    latitude: f64,
    longitude: f64,
}

impl From<CityEntry> for City {
    fn from(entry: CityEntry) -> Self {
        Self {
            id: entry.id,
            name: names::title_case(&entry.name),
            population: entry.population,
            location: Coordinate::new(entry.latitude, entry.longitude),
        }
    }
}

/// Returns the embedded city table, ordered by id.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a compile-time
/// constant, a parse failure is a development error caught by the tests.
#[must_use]
pub fn builtin_cities() -> Vec<City> {
    let file: CityFile = toml::de::from_str(CITIES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded city table: {e}"));

    let mut cities: Vec<City> = file.cities.into_iter().map(City::from).collect();
    cities.sort_by_key(|c| c.id);
    cities
}

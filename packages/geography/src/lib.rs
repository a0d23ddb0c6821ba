#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference table loading and lookup.
//!
//! Loads the city table, per-district crime counts, and district
//! coordinates once at startup into a read-only [`ReferenceData`]. Every
//! view borrows from the same instance for the lifetime of the process.

pub mod registry;
pub mod tables;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crime_risk_geography_models::{City, DistrictLocation, DistrictRecord, names};
use thiserror::Error;

/// Errors that can occur while loading reference tables.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// A configured reference file does not exist.
    #[error("Reference table not found: {}", path.display())]
    MissingArtifact {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// I/O error while reading a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from a table header.
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn {
        /// Table being read.
        table: &'static str,
        /// Canonical name of the missing column.
        column: &'static str,
    },

    /// A cell could not be parsed.
    #[error("Invalid value '{value}' for column '{column}' on line {row}")]
    InvalidValue {
        /// Line number in the source file.
        row: u64,
        /// Column being parsed.
        column: String,
        /// Raw cell contents.
        value: String,
    },
}

/// Locations of the reference tables on disk.
#[derive(Debug, Clone, Default)]
pub struct TablePaths {
    /// Optional CSV overriding the embedded city table.
    pub cities: Option<PathBuf>,
    /// Per-district crime counts.
    pub districts: PathBuf,
    /// District coordinates.
    pub locations: PathBuf,
}

/// All reference tables, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    cities: Vec<City>,
    districts: Vec<DistrictRecord>,
    locations: Vec<DistrictLocation>,
}

impl ReferenceData {
    /// Builds reference data from already-loaded tables.
    #[must_use]
    pub fn new(
        cities: Vec<City>,
        districts: Vec<DistrictRecord>,
        locations: Vec<DistrictLocation>,
    ) -> Self {
        Self {
            cities,
            districts,
            locations,
        }
    }

    /// Loads every table from disk. The embedded city table is used when
    /// no city override is configured.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError::MissingArtifact`] if a configured file is
    /// absent, or another [`GeographyError`] if a table cannot be parsed.
    pub fn load(paths: &TablePaths) -> Result<Self, GeographyError> {
        let cities = match &paths.cities {
            Some(path) => tables::load_cities(path)?,
            None => registry::builtin_cities(),
        };
        log::info!("Loaded {} cities", cities.len());

        let districts = tables::load_districts(&paths.districts)?;
        log::info!(
            "Loaded {} district records from {}",
            districts.len(),
            paths.districts.display()
        );

        let locations = tables::load_locations(&paths.locations)?;
        log::info!(
            "Loaded {} district locations from {}",
            locations.len(),
            paths.locations.display()
        );

        Ok(Self::new(cities, districts, locations))
    }

    /// All cities, ordered by id.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// All district records in file order.
    #[must_use]
    pub fn districts(&self) -> &[DistrictRecord] {
        &self.districts
    }

    /// All district locations in file order.
    #[must_use]
    pub fn locations(&self) -> &[DistrictLocation] {
        &self.locations
    }

    /// Looks up a city by feature code.
    #[must_use]
    pub fn city_by_id(&self, id: u32) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// Looks up a city by code or case-insensitive name.
    #[must_use]
    pub fn resolve_city(&self, input: &str) -> Option<&City> {
        let trimmed = input.trim();
        if let Ok(id) = trimmed.parse::<u32>() {
            return self.city_by_id(id);
        }
        self.cities
            .iter()
            .find(|c| names::same_place(&c.name, trimmed))
    }

    /// Distinct states present in the district table, sorted.
    #[must_use]
    pub fn states(&self) -> Vec<&str> {
        self.districts
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct districts of a state, sorted.
    #[must_use]
    pub fn districts_in(&self, state: &str) -> Vec<&str> {
        self.districts
            .iter()
            .filter(|r| names::same_place(&r.state, state))
            .map(|r| r.district.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct reporting years in the district table, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.districts
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The record for a district in a given year.
    ///
    /// If the table holds several rows for the same key the first one wins.
    #[must_use]
    pub fn record(&self, state: &str, district: &str, year: i32) -> Option<&DistrictRecord> {
        self.districts.iter().find(|r| {
            r.year == year
                && names::same_place(&r.state, state)
                && names::same_place(&r.district, district)
        })
    }

    /// Every record for a district, ordered by year.
    #[must_use]
    pub fn history(&self, state: &str, district: &str) -> Vec<&DistrictRecord> {
        let mut records: Vec<&DistrictRecord> = self
            .districts
            .iter()
            .filter(|r| {
                names::same_place(&r.state, state) && names::same_place(&r.district, district)
            })
            .collect();
        records.sort_by_key(|r| r.year);
        records.dedup_by_key(|r| r.year);
        records
    }

    /// The coordinate of a district, if known.
    #[must_use]
    pub fn location(&self, state: &str, district: &str) -> Option<&DistrictLocation> {
        self.locations.iter().find(|l| {
            names::same_place(&l.state, state) && names::same_place(&l.district, district)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crime_risk_geography_models::{Coordinate, CrimeCounts};

    fn record(state: &str, district: &str, year: i32, murder: u64) -> DistrictRecord {
        DistrictRecord {
            state: state.to_string(),
            district: district.to_string(),
            year,
            counts: [("murder", murder)].into_iter().collect::<CrimeCounts>(),
        }
    }

    fn sample() -> ReferenceData {
        ReferenceData::new(
            registry::builtin_cities(),
            vec![
                record("Maharashtra", "Pune", 2002, 40),
                record("Maharashtra", "Pune", 2001, 30),
                record("Maharashtra", "Nagpur", 2001, 20),
                record("Goa", "North Goa", 2001, 5),
            ],
            vec![DistrictLocation {
                state: "Maharashtra".to_string(),
                district: "Pune".to_string(),
                location: Coordinate::new(18.5204, 73.8567),
            }],
        )
    }

    #[test]
    fn resolves_cities_by_name_or_code() {
        let data = sample();
        assert_eq!(data.resolve_city("pune").map(|c| c.id), Some(17));
        assert_eq!(
            data.resolve_city("14").map(|c| c.name.as_str()),
            Some("Mumbai")
        );
        assert!(data.resolve_city("Atlantis").is_none());
        assert!(data.resolve_city("99").is_none());
    }

    #[test]
    fn lists_states_districts_and_years() {
        let data = sample();
        assert_eq!(data.states(), vec!["Goa", "Maharashtra"]);
        assert_eq!(data.districts_in("MAHARASHTRA"), vec!["Nagpur", "Pune"]);
        assert_eq!(data.years(), vec![2001, 2002]);
    }

    #[test]
    fn history_is_sorted_by_year() {
        let data = sample();
        let years: Vec<i32> = data
            .history("maharashtra", "pune")
            .iter()
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![2001, 2002]);
    }

    #[test]
    fn missing_rows_are_none() {
        let data = sample();
        assert!(data.record("Goa", "North Goa", 2001).is_some());
        assert!(data.record("Goa", "North Goa", 2002).is_none());
        assert!(data.location("Goa", "North Goa").is_none());
        assert!(data.location("maharashtra", "PUNE").is_some());
    }
}

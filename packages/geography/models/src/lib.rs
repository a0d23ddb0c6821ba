#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City, district, and location reference types.
//!
//! These types describe the static reference tables the dashboard loads
//! once at startup: the city table used for rate predictions, per-district
//! crime counts used for the severity index, and district coordinates used
//! for proximity searches.

pub mod names;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are finite and within the valid
    /// latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A city the rate model can predict for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Model feature code for this city.
    pub id: u32,
    /// Display name (title case).
    pub name: String,
    /// Base population in lakhs (hundred-thousands).
    pub population: f64,
    /// City-centre coordinate.
    pub location: Coordinate,
}

/// Raw crime counts for one district and year, keyed by normalized column
/// name (see [`names::normalize_column`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrimeCounts(BTreeMap<String, u64>);

impl CrimeCounts {
    /// Creates an empty set of counts.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets the count for a column. The column name is normalized first.
    pub fn insert(&mut self, column: &str, count: u64) {
        self.0.insert(names::normalize_column(column), count);
    }

    /// Returns the count for a normalized column name, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<u64> {
        self.0.get(column).copied()
    }

    /// Iterates over `(column, count)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of columns present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no columns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for CrimeCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (column, count) in iter {
            counts.insert(column.as_ref(), count);
        }
        counts
    }
}

/// Crime counts for a single district in a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRecord {
    /// State or union territory (title case).
    pub state: String,
    /// District name (title case).
    pub district: String,
    /// Reporting year.
    pub year: i32,
    /// Per-category counts.
    pub counts: CrimeCounts,
}

/// Geographic coordinate of a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictLocation {
    /// State or union territory (title case).
    pub state: String,
    /// District name (title case).
    pub district: String,
    /// District coordinate.
    pub location: Coordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_normalize_columns_on_insert() {
        let counts: CrimeCounts = [("MURDER", 3), ("KIDNAPPING & ABDUCTION", 7)]
            .into_iter()
            .collect();
        assert_eq!(counts.get("murder"), Some(3));
        assert_eq!(counts.get("kidnapping_abduction"), Some(7));
        assert_eq!(counts.get("MURDER"), None);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn coordinate_validation() {
        assert!(Coordinate::new(28.61, 77.21).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }
}

//! CSV loaders for the reference tables.
//!
//! Headers are matched after [`names::normalize_column`], so `"STATE/UT"`,
//! `"State_UT"` and `"state ut"` all resolve to the same column. String
//! fields are trimmed and title-cased on load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crime_risk_geography_models::{
    City, Coordinate, CrimeCounts, DistrictLocation, DistrictRecord, names,
};

use crate::GeographyError;

const STATE_COLUMNS: &[&str] = &["state_ut", "state", "states_uts", "state_name"];
const DISTRICT_COLUMNS: &[&str] = &["district", "district_name"];
const YEAR_COLUMNS: &[&str] = &["year"];
const LATITUDE_COLUMNS: &[&str] = &["latitude", "lat"];
const LONGITUDE_COLUMNS: &[&str] = &["longitude", "lon", "lng", "long"];

/// Normalized header name -> column index.
struct Headers {
    index: BTreeMap<String, usize>,
}

impl Headers {
    fn read<R: Read>(reader: &mut csv::Reader<R>) -> Result<Self, GeographyError> {
        let mut index = BTreeMap::new();
        for (i, header) in reader.headers()?.iter().enumerate() {
            let key = names::normalize_column(header);
            if let Some(first) = index.get(&key) {
                log::warn!(
                    "Ignoring column {i} ({header:?}): it normalizes to {key:?} like column {first}"
                );
                continue;
            }
            index.insert(key, i);
        }
        Ok(Self { index })
    }

    fn find(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|c| self.index.get(*c).copied())
    }

    fn require(
        &self,
        table: &'static str,
        candidates: &[&'static str],
    ) -> Result<usize, GeographyError> {
        self.find(candidates)
            .ok_or(GeographyError::MissingColumn {
                table,
                column: candidates[0],
            })
    }
}

fn open(path: &Path) -> Result<File, GeographyError> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GeographyError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            GeographyError::Io(e)
        }
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}

fn parse_f64(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<f64, GeographyError> {
    let raw = field(record, idx);
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeographyError::InvalidValue {
            row: line_of(record),
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Parses a crime count cell. Empty cells yield `None`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<Option<u64>, GeographyError> {
    if field(record, idx).is_empty() {
        return Ok(None);
    }
    let value = parse_f64(record, idx, column)?;
    if value < 0.0 {
        return Err(GeographyError::InvalidValue {
            row: line_of(record),
            column: column.to_string(),
            value: field(record, idx).to_string(),
        });
    }
    Ok(Some(value.round() as u64))
}

/// Aggregate rows such as `"TOTAL"` or `"ZZ TOTAL"` are not districts.
fn is_total_row(district: &str) -> bool {
    names::normalize_column(district)
        .split('_')
        .any(|part| part == "total")
}

/// Loads a city table from a CSV file with columns
/// `id,name,population,latitude,longitude`.
///
/// # Errors
///
/// Returns [`GeographyError::MissingArtifact`] if the file does not exist,
/// or another [`GeographyError`] if it cannot be parsed.
pub fn load_cities(path: &Path) -> Result<Vec<City>, GeographyError> {
    read_cities(open(path)?)
}

/// Reads a city table from CSV.
///
/// # Errors
///
/// Returns [`GeographyError`] if a required column is missing or a value
/// cannot be parsed.
pub fn read_cities<R: Read>(reader: R) -> Result<Vec<City>, GeographyError> {
    let mut reader = csv_reader(reader);
    let headers = Headers::read(&mut reader)?;
    let id_idx = headers.require("cities", &["id", "code"])?;
    let name_idx = headers.require("cities", &["name", "city"])?;
    let pop_idx = headers.require("cities", &["population"])?;
    let lat_idx = headers.require("cities", LATITUDE_COLUMNS)?;
    let lon_idx = headers.require("cities", LONGITUDE_COLUMNS)?;

    let mut cities = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw_id = field(&record, id_idx);
        let id = raw_id
            .parse::<u32>()
            .map_err(|_| GeographyError::InvalidValue {
                row: line_of(&record),
                column: "id".to_string(),
                value: raw_id.to_string(),
            })?;

        cities.push(City {
            id,
            name: names::title_case(field(&record, name_idx)),
            population: parse_f64(&record, pop_idx, "population")?,
            location: Coordinate::new(
                parse_f64(&record, lat_idx, "latitude")?,
                parse_f64(&record, lon_idx, "longitude")?,
            ),
        });
    }

    cities.sort_by_key(|c| c.id);
    log::debug!("Read {} cities", cities.len());
    Ok(cities)
}

/// Loads per-district crime counts from a CSV file with columns
/// `STATE/UT,DISTRICT,YEAR,<crime columns...>`.
///
/// # Errors
///
/// Returns [`GeographyError::MissingArtifact`] if the file does not exist,
/// or another [`GeographyError`] if it cannot be parsed.
pub fn load_districts(path: &Path) -> Result<Vec<DistrictRecord>, GeographyError> {
    read_districts(open(path)?)
}

/// Reads per-district crime counts from CSV.
///
/// Every column other than state, district, and year is treated as a
/// crime count. Aggregate "total" rows are skipped.
///
/// # Errors
///
/// Returns [`GeographyError`] if a required column is missing or a value
/// cannot be parsed.
pub fn read_districts<R: Read>(reader: R) -> Result<Vec<DistrictRecord>, GeographyError> {
    let mut reader = csv_reader(reader);
    let headers = Headers::read(&mut reader)?;
    let state_idx = headers.require("districts", STATE_COLUMNS)?;
    let district_idx = headers.require("districts", DISTRICT_COLUMNS)?;
    let year_idx = headers.require("districts", YEAR_COLUMNS)?;

    let count_columns: Vec<(String, usize)> = headers
        .index
        .iter()
        .filter(|(_, idx)| ![state_idx, district_idx, year_idx].contains(idx))
        .map(|(name, idx)| (name.clone(), *idx))
        .collect();

    let mut records = Vec::new();
    let mut skipped = 0_usize;

    for record in reader.records() {
        let record = record?;
        let district = field(&record, district_idx);

        if is_total_row(district) {
            skipped += 1;
            continue;
        }

        let raw_year = field(&record, year_idx);
        let year = raw_year
            .parse::<i32>()
            .map_err(|_| GeographyError::InvalidValue {
                row: line_of(&record),
                column: "year".to_string(),
                value: raw_year.to_string(),
            })?;

        let mut counts = CrimeCounts::new();
        for (column, idx) in &count_columns {
            if let Some(count) = parse_count(&record, *idx, column)? {
                counts.insert(column, count);
            }
        }

        records.push(DistrictRecord {
            state: names::title_case(field(&record, state_idx)),
            district: names::title_case(district),
            year,
            counts,
        });
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} aggregate row(s) in district table");
    }
    log::debug!("Read {} district records", records.len());
    Ok(records)
}

/// Loads district coordinates from a CSV file with columns
/// `State,District,Latitude,Longitude`.
///
/// # Errors
///
/// Returns [`GeographyError::MissingArtifact`] if the file does not exist,
/// or another [`GeographyError`] if it cannot be parsed.
pub fn load_locations(path: &Path) -> Result<Vec<DistrictLocation>, GeographyError> {
    read_locations(open(path)?)
}

/// Reads district coordinates from CSV.
///
/// Rows whose coordinate is blank, not a number, or out of range are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`GeographyError`] if a required column is missing or the CSV
/// is malformed.
pub fn read_locations<R: Read>(reader: R) -> Result<Vec<DistrictLocation>, GeographyError> {
    let mut reader = csv_reader(reader);
    let headers = Headers::read(&mut reader)?;
    let state_idx = headers.require("locations", STATE_COLUMNS)?;
    let district_idx = headers.require("locations", DISTRICT_COLUMNS)?;
    let lat_idx = headers.require("locations", LATITUDE_COLUMNS)?;
    let lon_idx = headers.require("locations", LONGITUDE_COLUMNS)?;

    let mut locations = Vec::new();
    for record in reader.records() {
        let record = record?;
        let district = names::title_case(field(&record, district_idx));
        let (Ok(latitude), Ok(longitude)) = (
            parse_f64(&record, lat_idx, "latitude"),
            parse_f64(&record, lon_idx, "longitude"),
        ) else {
            log::warn!(
                "Skipping {district}: coordinate ({:?}, {:?}) is not a number (line {})",
                field(&record, lat_idx),
                field(&record, lon_idx),
                line_of(&record)
            );
            continue;
        };
        let location = Coordinate::new(latitude, longitude);

        if !location.is_valid() {
            log::warn!(
                "Skipping {district}: coordinate {location} is out of range (line {})",
                line_of(&record)
            );
            continue;
        }

        locations.push(DistrictLocation {
            state: names::title_case(field(&record, state_idx)),
            district,
            location,
        });
    }

    log::debug!("Read {} district locations", locations.len());
    Ok(locations)
}

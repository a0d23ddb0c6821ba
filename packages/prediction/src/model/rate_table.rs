//! Lookup-table model: a base rate per city and crime category, adjusted
//! by a linear yearly trend.

use serde::{Deserialize, Serialize};

use super::{CrimeRateModel, Features, ensure_finite};
use crate::PredictionError;

/// One row of the rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// City feature code.
    pub city: u32,
    /// Crime category feature code.
    pub category: u32,
    /// Rate in `base_year`.
    pub base_rate: f64,
    /// Change in rate per year after `base_year`.
    #[serde(default)]
    pub yearly_change: f64,
}

/// `rate = base_rate + yearly_change * (year - base_year)`, floored at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableModel {
    /// Year the base rates were measured in.
    pub base_year: i32,
    /// Table rows.
    pub rates: Vec<RateEntry>,
}

impl RateTableModel {
    pub(crate) fn validate(&self) -> Result<(), PredictionError> {
        if self.rates.is_empty() {
            return Err(PredictionError::InvalidArtifact {
                message: "rate table is empty".to_string(),
            });
        }
        if let Some(bad) = self
            .rates
            .iter()
            .find(|r| !r.base_rate.is_finite() || !r.yearly_change.is_finite())
        {
            return Err(PredictionError::InvalidArtifact {
                message: format!(
                    "rate table entry for city {} / category {} is not finite",
                    bad.city, bad.category
                ),
            });
        }
        Ok(())
    }

    fn lookup(&self, city: u32, category: u32) -> Option<&RateEntry> {
        self.rates
            .iter()
            .find(|r| r.city == city && r.category == category)
    }
}

/// Interprets a feature as a non-negative integer code.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_code(value: f64, name: &str) -> Result<u32, PredictionError> {
    if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(PredictionError::Model {
            message: format!("{name} feature {value} is not a valid code"),
        })
    }
}

impl CrimeRateModel for RateTableModel {
    fn kind(&self) -> &'static str {
        "rate_table"
    }

    fn predict(&self, features: &Features) -> Result<f64, PredictionError> {
        ensure_finite(features)?;
        let [year, city, _population, category] = *features;
        let city = as_code(city, "city")?;
        let category = as_code(category, "category")?;

        let entry = self
            .lookup(city, category)
            .ok_or_else(|| PredictionError::Model {
                message: format!("no rate for city {city} / category {category}"),
            })?;

        let elapsed = year - f64::from(self.base_year);
        Ok(entry.yearly_change.mul_add(elapsed, entry.base_rate).max(0.0))
    }
}

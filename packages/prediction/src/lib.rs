#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime-rate prediction for a city, crime category, and year.
//!
//! [`Predictor`] projects the city population to the requested year, asks
//! the injected [`CrimeRateModel`] for a rate, and derives the estimated
//! case count and severity tier. A model failure aborts the prediction;
//! there is no retry and no partial result.

pub mod model;

use std::path::PathBuf;

use crime_risk_crime_models::{CrimeCategory, SeverityTier};
use crime_risk_geography_models::City;
use crime_risk_severity::{ThresholdTable, estimated_cases, project_population};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use model::{CrimeRateModel, Features, load_model};

/// Errors that can occur while loading a model or predicting.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The configured model artifact does not exist.
    #[error("Model artifact not found: {}", path.display())]
    MissingArtifact {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// I/O error while reading the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact is not valid JSON or has the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact parsed but its parameters are unusable.
    #[error("Invalid model artifact: {message}")]
    InvalidArtifact {
        /// Description of what went wrong.
        message: String,
    },

    /// The model could not evaluate the given features.
    #[error("Model error: {message}")]
    Model {
        /// Description of what went wrong.
        message: String,
    },

    /// The model returned `NaN` or an infinity.
    #[error("Model returned a non-finite rate ({rate})")]
    NonFinite {
        /// The rate returned.
        rate: f64,
    },
}

/// Inputs handed to the model for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    /// Target year.
    pub year: i32,
    /// City feature code.
    pub city_code: u32,
    /// Population projected to `year`, in lakhs.
    pub adjusted_population: f64,
    /// Crime category feature code.
    pub crime_code: u32,
}

impl PredictionRequest {
    /// Feature vector in model order:
    /// `[year, city_code, adjusted_population, crime_code]`.
    #[must_use]
    pub fn features(&self) -> Features {
        [
            f64::from(self.year),
            f64::from(self.city_code),
            self.adjusted_population,
            f64::from(self.crime_code),
        ]
    }
}

/// Outcome of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// The request the model was evaluated on.
    pub request: PredictionRequest,
    /// City display name.
    pub city: String,
    /// Crime category.
    pub category: CrimeCategory,
    /// Predicted crime rate.
    pub crime_rate: f64,
    /// `ceil(crime_rate * adjusted_population)`.
    pub cases: u64,
    /// Severity tier of `crime_rate`.
    pub tier: SeverityTier,
}

/// One point of a predicted rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Year.
    pub year: i32,
    /// Predicted rate for that year.
    pub crime_rate: f64,
}

/// Assembles predictions from a model, a threshold table, and a base year.
#[derive(Clone, Copy)]
pub struct Predictor<'a> {
    model: &'a dyn CrimeRateModel,
    thresholds: ThresholdTable,
    base_year: i32,
}

impl<'a> Predictor<'a> {
    /// Creates a predictor.
    #[must_use]
    pub const fn new(
        model: &'a dyn CrimeRateModel,
        thresholds: ThresholdTable,
        base_year: i32,
    ) -> Self {
        Self {
            model,
            thresholds,
            base_year,
        }
    }

    /// Year the city populations were measured in.
    #[must_use]
    pub const fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Cut points used for tier classification.
    #[must_use]
    pub const fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// Builds the model request for a city, category, and year.
    #[must_use]
    pub fn request(&self, city: &City, category: CrimeCategory, year: i32) -> PredictionRequest {
        PredictionRequest {
            year,
            city_code: city.id,
            adjusted_population: project_population(city.population, self.base_year, year),
            crime_code: category.code(),
        }
    }

    fn rate(&self, request: &PredictionRequest) -> Result<f64, PredictionError> {
        let rate = self.model.predict(&request.features())?;
        if rate.is_finite() {
            Ok(rate)
        } else {
            Err(PredictionError::NonFinite { rate })
        }
    }

    /// Predicts the crime rate for a city, category, and year.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if the model fails or returns a
    /// non-finite rate.
    pub fn predict(
        &self,
        city: &City,
        category: CrimeCategory,
        year: i32,
    ) -> Result<PredictionResult, PredictionError> {
        let request = self.request(city, category, year);
        let crime_rate = self.rate(&request)?;
        let cases = estimated_cases(crime_rate, request.adjusted_population);
        let tier = self.thresholds.classify(crime_rate);

        log::debug!(
            "{} / {} / {year}: rate={crime_rate:.4} cases={cases} tier={tier}",
            city.name,
            category.display_name()
        );

        Ok(PredictionResult {
            request,
            city: city.name.clone(),
            category,
            crime_rate,
            cases,
            tier,
        })
    }

    /// Predicts the rate for every year between the base year and `year`,
    /// inclusive, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if the model fails for any year.
    pub fn trend(
        &self,
        city: &City,
        category: CrimeCategory,
        year: i32,
    ) -> Result<Vec<TrendPoint>, PredictionError> {
        let (from, to) = if year >= self.base_year {
            (self.base_year, year)
        } else {
            (year, self.base_year)
        };

        (from..=to)
            .map(|y| {
                let request = self.request(city, category, y);
                Ok(TrendPoint {
                    year: y,
                    crime_rate: self.rate(&request)?,
                })
            })
            .collect()
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime risk dashboard.
//!
//! [`App`] owns everything loaded at startup: the configuration, the
//! reference tables, and the crime-rate model. [`App::dashboard`] borrows
//! them into a [`Dashboard`], which turns a [`View`] into a [`Render`].
//!
//! Failures fall into three classes:
//! - missing artifacts and bad config are fatal and surface as
//!   [`DashboardError`] from [`App::load`];
//! - model failures become a [`Panel::Error`](crime_risk_dashboard_models::Panel::Error)
//!   and abort only the current view;
//! - missing reference rows become a
//!   [`Panel::Warning`](crime_risk_dashboard_models::Panel::Warning) and
//!   skip the panels that depend on them.

pub mod config;
pub mod interactive;
pub mod text;
pub mod views;

use crime_risk_dashboard_models::{Render, Session, View};
use crime_risk_geography::{GeographyError, ReferenceData};
use crime_risk_prediction::{CrimeRateModel, PredictionError, Predictor, load_model};
use crime_risk_spatial::ProximityIndex;
use thiserror::Error;

pub use config::{ConfigError, DashboardConfig};

/// Fatal errors raised while starting the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A reference table is missing or malformed.
    #[error(transparent)]
    Reference(#[from] GeographyError),

    /// The model artifact is missing or malformed.
    #[error(transparent)]
    Model(#[from] PredictionError),
}

/// Everything loaded once per process.
pub struct App {
    config: DashboardConfig,
    data: ReferenceData,
    model: Box<dyn CrimeRateModel>,
}

impl App {
    /// Assembles an application from already-loaded parts.
    #[must_use]
    pub fn new(config: DashboardConfig, data: ReferenceData, model: Box<dyn CrimeRateModel>) -> Self {
        Self {
            config,
            data,
            model,
        }
    }

    /// Loads the model artifact and reference tables named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the model or any table is missing or
    /// cannot be parsed.
    pub fn load(config: DashboardConfig) -> Result<Self, DashboardError> {
        let model = load_model(&config.model.path)?;
        let data = ReferenceData::load(&config.data.table_paths())?;
        Ok(Self::new(config, data, model))
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loaded reference tables.
    #[must_use]
    pub const fn data(&self) -> &ReferenceData {
        &self.data
    }

    /// Builds the view context. Clustering, when configured, runs here.
    #[must_use]
    pub fn dashboard(&self) -> Dashboard<'_> {
        let predictor = Predictor::new(
            self.model.as_ref(),
            self.config.severity.table(),
            self.config.projection.base_year,
        );

        let locations = self.data.locations();
        let proximity = match self.config.proximity.cluster {
            Some(params) => ProximityIndex::clustered(locations, params),
            None => ProximityIndex::new(locations),
        };

        Dashboard {
            config: &self.config,
            data: &self.data,
            predictor,
            proximity,
        }
    }
}

/// Read-only context shared by every view.
pub struct Dashboard<'a> {
    config: &'a DashboardConfig,
    data: &'a ReferenceData,
    predictor: Predictor<'a>,
    proximity: ProximityIndex<'a>,
}

impl<'a> Dashboard<'a> {
    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &'a DashboardConfig {
        self.config
    }

    /// Loaded reference tables.
    #[must_use]
    pub const fn data(&self) -> &'a ReferenceData {
        self.data
    }

    /// Prediction assembly over the loaded model.
    #[must_use]
    pub const fn predictor(&self) -> &Predictor<'a> {
        &self.predictor
    }

    /// Proximity index over the location table.
    #[must_use]
    pub const fn proximity(&self) -> &ProximityIndex<'a> {
        &self.proximity
    }

    /// Computes one view.
    #[must_use]
    pub fn render(&self, session: &Session, view: &View) -> Render {
        log::debug!("Rendering {}", view.label());
        match view {
            View::CityWise(query) => views::city::render(self, session, query),
            View::DistrictWise(query) => views::district::render(self, session, query),
            View::LocationWise(query) => views::location::render(self, session, query),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crime_risk_geography::registry::builtin_cities;
    use crime_risk_geography_models::{Coordinate, CrimeCounts, DistrictLocation, DistrictRecord};
    use crime_risk_prediction::{Features, PredictionError};

    use super::*;

    /// Returns `rate` for every request.
    pub struct FixedRate(pub f64);

    impl CrimeRateModel for FixedRate {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn predict(&self, _features: &Features) -> Result<f64, PredictionError> {
            Ok(self.0)
        }
    }

    /// Fails every request.
    pub struct Broken;

    impl CrimeRateModel for Broken {
        fn kind(&self) -> &'static str {
            "broken"
        }

        fn predict(&self, _features: &Features) -> Result<f64, PredictionError> {
            Err(PredictionError::Model {
                message: "model offline".to_string(),
            })
        }
    }

    pub fn record(state: &str, district: &str, year: i32, murder: u64, robbery: u64) -> DistrictRecord {
        DistrictRecord {
            state: state.to_string(),
            district: district.to_string(),
            year,
            counts: [("murder", murder), ("robbery", robbery), ("theft", 900)]
                .into_iter()
                .collect::<CrimeCounts>(),
        }
    }

    pub fn location(state: &str, district: &str, lat: f64, lng: f64) -> DistrictLocation {
        DistrictLocation {
            state: state.to_string(),
            district: district.to_string(),
            location: Coordinate::new(lat, lng),
        }
    }

    /// Three Maharashtra districts: Pune and Pimpri close together, Satara
    /// ~100 km south. Nagpur has records but no coordinate.
    pub fn sample_data() -> ReferenceData {
        ReferenceData::new(
            builtin_cities(),
            vec![
                record("Maharashtra", "Pune", 2011, 110, 220),
                record("Maharashtra", "Pune", 2012, 220, 440),
                record("Maharashtra", "Pimpri", 2012, 22, 0),
                record("Maharashtra", "Satara", 2012, 55, 55),
                record("Maharashtra", "Nagpur", 2012, 10, 10),
            ],
            vec![
                location("Maharashtra", "Pune", 18.5204, 73.8567),
                location("Maharashtra", "Pimpri", 18.6298, 73.7997),
                location("Maharashtra", "Satara", 17.6805, 74.0183),
                location("Maharashtra", "Lonavala", 18.7546, 73.4062),
            ],
        )
    }

    pub fn app(model: Box<dyn CrimeRateModel>) -> App {
        App::new(DashboardConfig::embedded(), sample_data(), model)
    }
}

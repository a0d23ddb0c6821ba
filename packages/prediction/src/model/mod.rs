//! Crime-rate model abstraction and artifact loading.
//!
//! The dashboard treats the trained model as a black box with a single
//! operation, [`CrimeRateModel::predict`]. Concrete models are loaded from a
//! JSON artifact whose `type` tag selects the implementation. Exactly one
//! artifact is loaded per deployment.

pub mod linear;
pub mod rate_table;

use std::path::Path;

use serde::Deserialize;

use crate::PredictionError;

/// Number of features the model consumes:
/// `[year, city_code, adjusted_population, crime_code]`.
pub const FEATURE_COUNT: usize = 4;

/// Feature vector passed to a model.
pub type Features = [f64; FEATURE_COUNT];

/// Trait for crime-rate models.
pub trait CrimeRateModel: Send + Sync {
    /// Short identifier of the model kind, used in log messages.
    fn kind(&self) -> &'static str;

    /// Predicts a crime rate from a feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Model`] if the features are outside what
    /// the model can evaluate.
    fn predict(&self, features: &Features) -> Result<f64, PredictionError>;
}

/// On-disk model artifact, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Linear regression over the four features.
    Linear(linear::LinearModel),
    /// Per city/category base rates with a linear yearly trend.
    RateTable(rate_table::RateTableModel),
}

impl ModelArtifact {
    /// Parses an artifact from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Json`] if the JSON is malformed, or
    /// [`PredictionError::InvalidArtifact`] if it fails validation.
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), PredictionError> {
        match self {
            Self::Linear(model) => model.validate(),
            Self::RateTable(model) => model.validate(),
        }
    }

    /// Converts the artifact into a boxed model.
    #[must_use]
    pub fn into_model(self) -> Box<dyn CrimeRateModel> {
        match self {
            Self::Linear(model) => Box::new(model),
            Self::RateTable(model) => Box::new(model),
        }
    }
}

/// Loads the model artifact at `path`.
///
/// # Errors
///
/// Returns [`PredictionError::MissingArtifact`] if the file does not exist,
/// or another [`PredictionError`] if it cannot be read or parsed.
pub fn load_model(path: &Path) -> Result<Box<dyn CrimeRateModel>, PredictionError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PredictionError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            PredictionError::Io(e)
        }
    })?;

    let model = ModelArtifact::from_json(&json)?.into_model();
    log::info!("Loaded {} model from {}", model.kind(), path.display());
    Ok(model)
}

/// Rejects feature vectors containing `NaN` or infinities.
pub(crate) fn ensure_finite(features: &Features) -> Result<(), PredictionError> {
    if features.iter().all(|f| f.is_finite()) {
        Ok(())
    } else {
        Err(PredictionError::Model {
            message: format!("non-finite feature in {features:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_linear_artifact() {
        let json = r#"{"type":"linear","intercept":1.5,"coefficients":[0.0,0.0,0.1,0.0]}"#;
        let model = ModelArtifact::from_json(json).unwrap().into_model();
        assert_eq!(model.kind(), "linear");
        let rate = model.predict(&[2020.0, 3.0, 10.0, 1.0]).unwrap();
        assert!((rate - 2.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"type":"forest","trees":[]}"#;
        assert!(matches!(
            ModelArtifact::from_json(json),
            Err(PredictionError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_missing_artifact() {
        let err = load_model(Path::new("/no/such/model.json")).err();
        assert!(matches!(err, Some(PredictionError::MissingArtifact { .. })));
    }

    #[test]
    fn non_finite_features_are_model_errors() {
        assert!(ensure_finite(&[2020.0, 1.0, f64::NAN, 0.0]).is_err());
        assert!(ensure_finite(&[2020.0, 1.0, 2.0, 0.0]).is_ok());
    }
}

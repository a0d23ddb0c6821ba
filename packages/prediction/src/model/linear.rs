//! Linear regression model.

use serde::{Deserialize, Serialize};

use super::{CrimeRateModel, FEATURE_COUNT, Features, ensure_finite};
use crate::PredictionError;

/// `rate = intercept + Σ coefficients[i] * features[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Constant term.
    pub intercept: f64,
    /// One coefficient per feature, in feature order.
    pub coefficients: [f64; FEATURE_COUNT],
}

impl LinearModel {
    pub(crate) fn validate(&self) -> Result<(), PredictionError> {
        if self.intercept.is_finite() && self.coefficients.iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(PredictionError::InvalidArtifact {
                message: "linear model has non-finite parameters".to_string(),
            })
        }
    }
}

impl CrimeRateModel for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, features: &Features) -> Result<f64, PredictionError> {
        ensure_finite(features)?;
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, f)| c.mul_add(*f, acc)))
    }
}

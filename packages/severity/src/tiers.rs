//! Rate-to-tier classification with configurable cut points.
//!
//! The dashboards this replaces disagreed on where the tier boundaries
//! sit, so the cut points are an explicit table chosen by the deployment
//! rather than constants. Three observed tables ship as presets.

use crime_risk_crime_models::SeverityTier;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::SeverityError;

/// Ascending rate cut points separating the four severity tiers.
///
/// A rate `r` is classified as:
/// - `r <= very_low` → [`SeverityTier::VeryLow`]
/// - `r <= low` → [`SeverityTier::Low`]
/// - `r <= high` → [`SeverityTier::High`]
/// - otherwise → [`SeverityTier::VeryHigh`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds", into = "RawThresholds")]
pub struct ThresholdTable {
    very_low: f64,
    low: f64,
    high: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawThresholds {
    very_low: f64,
    low: f64,
    high: f64,
}

impl TryFrom<RawThresholds> for ThresholdTable {
    type Error = SeverityError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.very_low, raw.low, raw.high)
    }
}

impl From<ThresholdTable> for RawThresholds {
    fn from(table: ThresholdTable) -> Self {
        Self {
            very_low: table.very_low,
            low: table.low,
            high: table.high,
        }
    }
}

impl ThresholdTable {
    /// Creates a table from three cut points.
    ///
    /// # Errors
    ///
    /// Returns [`SeverityError::InvalidThresholds`] if any cut point is not
    /// finite or the cut points are not strictly ascending.
    pub fn new(very_low: f64, low: f64, high: f64) -> Result<Self, SeverityError> {
        let finite = very_low.is_finite() && low.is_finite() && high.is_finite();
        if !finite || very_low >= low || low >= high {
            return Err(SeverityError::InvalidThresholds {
                very_low,
                low,
                high,
            });
        }
        Ok(Self {
            very_low,
            low,
            high,
        })
    }

    /// Upper bound (inclusive) of the very-low tier.
    #[must_use]
    pub const fn very_low(&self) -> f64 {
        self.very_low
    }

    /// Upper bound (inclusive) of the low tier.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound (inclusive) of the high tier.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Classifies a rate into a severity tier.
    ///
    /// `NaN` is classified as [`SeverityTier::VeryHigh`] since it compares
    /// false against every cut point; callers are expected to reject
    /// non-finite rates before classifying.
    #[must_use]
    pub fn classify(&self, rate: f64) -> SeverityTier {
        if rate <= self.very_low {
            SeverityTier::VeryLow
        } else if rate <= self.low {
            SeverityTier::Low
        } else if rate <= self.high {
            SeverityTier::High
        } else {
            SeverityTier::VeryHigh
        }
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        ThresholdPreset::Standard.table()
    }
}

/// Named cut-point tables.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThresholdPreset {
    /// `{1, 5, 15}`: per-lakh rates from the city prediction model.
    #[default]
    Standard,
    /// `{0.1, 19, 98}`
    Fine,
    /// `{55, 195, 278}`
    Coarse,
}

impl ThresholdPreset {
    /// Returns the cut points for this preset.
    #[must_use]
    pub const fn table(self) -> ThresholdTable {
        match self {
            Self::Standard => ThresholdTable {
                very_low: 1.0,
                low: 5.0,
                high: 15.0,
            },
            Self::Fine => ThresholdTable {
                very_low: 0.1,
                low: 19.0,
                high: 98.0,
            },
            Self::Coarse => ThresholdTable {
                very_low: 55.0,
                low: 195.0,
                high: 278.0,
            },
        }
    }

    /// Returns all presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Standard, Self::Fine, Self::Coarse]
    }
}

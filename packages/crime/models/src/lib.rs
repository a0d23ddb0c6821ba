#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime category, severity tier, and severity weight definitions.
//!
//! This crate defines the shared vocabulary used across the crime-risk
//! workspace: the crime categories the rate model was trained on, the
//! four-level severity tiers a predicted rate is classified into, and the
//! weighted crime columns that feed the district severity index.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Ordinal classification of a predicted crime rate.
///
/// Variants are declared in ascending order so the derived [`Ord`] matches
/// the severity ordering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    /// Rate at or below the lowest cut point.
    VeryLow = 0,
    /// Rate at or below the second cut point.
    Low = 1,
    /// Rate at or below the third cut point.
    High = 2,
    /// Rate above every cut point.
    VeryHigh = 3,
}

impl SeverityTier {
    /// Returns the ordinal of this tier (0 = very low, 3 = very high).
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Short human-readable label (e.g. `"Very Low"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Area description shown next to a prediction (e.g. `"Low Crime Area"`).
    #[must_use]
    pub const fn area_description(self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low Crime Area",
            Self::Low => "Low Crime Area",
            Self::High => "High Crime Area",
            Self::VeryHigh => "Very High Crime Area",
        }
    }

    /// Returns all tiers in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::VeryLow, Self::Low, Self::High, Self::VeryHigh]
    }
}

/// Error returned when a crime category code or name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategoryError {
    /// The input that failed to resolve.
    pub input: String,
}

impl std::fmt::Display for UnknownCategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown crime category '{}'", self.input)
    }
}

impl std::error::Error for UnknownCategoryError {}

/// Crime categories known to the rate model.
///
/// The numeric code of each variant is the value the model was trained
/// with, so the declaration order must not change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeCategory {
    /// Offences committed by minors
    Juvenile = 0,
    /// Crimes against members of Scheduled Castes
    AgainstScheduledCastes = 1,
    /// Crimes against members of Scheduled Tribes
    AgainstScheduledTribes = 2,
    /// Crimes against senior citizens
    AgainstSeniorCitizens = 3,
    /// Crimes against children
    AgainstChildren = 4,
    /// Crimes against women
    AgainstWomen = 5,
    /// Cyber crimes
    Cyber = 6,
    /// Fraud, counterfeiting, and other economic offences
    Economic = 7,
    /// Kidnapping and abduction
    Kidnapping = 8,
    /// Murder
    Murder = 9,
}

impl CrimeCategory {
    /// Returns the model feature code for this category.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Looks up a category by its model feature code.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.code() == code)
    }

    /// Display name as shown in selectors.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Juvenile => "Crime Committed by Juveniles",
            Self::AgainstScheduledCastes => "Crime against SC",
            Self::AgainstScheduledTribes => "Crime against ST",
            Self::AgainstSeniorCitizens => "Crime against Senior Citizen",
            Self::AgainstChildren => "Crime against children",
            Self::AgainstWomen => "Crime against women",
            Self::Cyber => "Cyber Crimes",
            Self::Economic => "Economic Offences",
            Self::Kidnapping => "Kidnapping",
            Self::Murder => "Murder",
        }
    }

    /// Prevention advice shown alongside a prediction for this category.
    #[must_use]
    pub const fn prevention_tip(self) -> &'static str {
        match self {
            Self::Juvenile => {
                "Support after-school programmes and counselling; early mentoring keeps young people away from crime."
            }
            Self::AgainstScheduledCastes | Self::AgainstScheduledTribes => {
                "Report caste- or tribe-based harassment to the nearest police station or the national helpline; legal aid is available free of cost."
            }
            Self::AgainstSeniorCitizens => {
                "Register elderly relatives with the local senior-citizen police cell and verify domestic help before hiring."
            }
            Self::AgainstChildren => {
                "Teach children about safe and unsafe touch and keep the child helpline number (1098) visible at home."
            }
            Self::AgainstWomen => {
                "Share live location on late journeys and keep the women's helpline (1091) on speed dial."
            }
            Self::Cyber => {
                "Never share OTPs or passwords, enable two-factor authentication, and report fraud at the cyber crime portal."
            }
            Self::Economic => {
                "Verify investment schemes with the regulator and be wary of returns that sound too good to be true."
            }
            Self::Kidnapping => {
                "Avoid sharing travel plans publicly and agree on check-in times with family members."
            }
            Self::Murder => {
                "Report threats early, avoid escalating disputes, and contact emergency services (112) without delay."
            }
        }
    }

    /// Resolves a category from user input: a numeric code, a display
    /// name, or a variant name, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategoryError`] if nothing matches.
    pub fn resolve(input: &str) -> Result<Self, UnknownCategoryError> {
        let trimmed = input.trim();

        if let Ok(code) = trimmed.parse::<u32>() {
            return Self::from_code(code).ok_or_else(|| UnknownCategoryError {
                input: input.to_string(),
            });
        }

        Self::all()
            .iter()
            .copied()
            .find(|c| {
                c.display_name().eq_ignore_ascii_case(trimmed)
                    || c.as_ref().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownCategoryError {
                input: input.to_string(),
            })
    }

    /// Returns all variants of this enum, ordered by code.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Juvenile,
            Self::AgainstScheduledCastes,
            Self::AgainstScheduledTribes,
            Self::AgainstSeniorCitizens,
            Self::AgainstChildren,
            Self::AgainstWomen,
            Self::Cyber,
            Self::Economic,
            Self::Kidnapping,
            Self::Murder,
        ]
    }
}

/// Crime columns that contribute to the district severity index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeightedCrime {
    Murder,
    Rape,
    KidnappingAbduction,
    Robbery,
    Burglary,
    DowryDeaths,
}

impl WeightedCrime {
    /// Weight applied to this column's count in the severity index.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Murder => 5,
            Self::Rape | Self::KidnappingAbduction => 4,
            Self::Robbery | Self::Burglary | Self::DowryDeaths => 3,
        }
    }

    /// Normalized column name this crime is read from (e.g.
    /// `"kidnapping_abduction"`).
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Murder => "murder",
            Self::Rape => "rape",
            Self::KidnappingAbduction => "kidnapping_abduction",
            Self::Robbery => "robbery",
            Self::Burglary => "burglary",
            Self::DowryDeaths => "dowry_deaths",
        }
    }

    /// Chart label for this crime.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Murder => "Murder",
            Self::Rape => "Rape",
            Self::KidnappingAbduction => "Kidnapping & Abduction",
            Self::Robbery => "Robbery",
            Self::Burglary => "Burglary",
            Self::DowryDeaths => "Dowry Deaths",
        }
    }

    /// Looks up a weighted crime by normalized column name.
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.column() == column)
    }

    /// Returns all weighted crimes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Murder,
            Self::Rape,
            Self::KidnappingAbduction,
            Self::Robbery,
            Self::Burglary,
            Self::DowryDeaths,
        ]
    }
}

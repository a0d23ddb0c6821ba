#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session, view request, and render description types.
//!
//! A view never draws anything itself. It returns a [`Render`]: a title
//! and an ordered list of [`Panel`]s that a front-end (the terminal
//! renderer in `crime_risk_dashboard`, or any external UI consuming the
//! JSON form) turns into text, charts, and maps.

use crime_risk_crime_models::{CrimeCategory, SeverityTier};
use crime_risk_geography_models::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Oldest age accepted at login.
pub const MAX_AGE: u8 = 120;

/// Gender options offered at login.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Label shown in selectors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Returns all options in selector order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Male, Self::Female, Self::Other]
    }
}

/// Marital status options offered at login.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Label shown in selectors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
            Self::Divorced => "Divorced",
            Self::Widowed => "Widowed",
        }
    }

    /// Returns all options in selector order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Single, Self::Married, Self::Divorced, Self::Widowed]
    }
}

/// Reasons a login form is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The name was empty or whitespace.
    EmptyName,
    /// The age exceeded [`MAX_AGE`].
    AgeOutOfRange(u8),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => f.write_str("name must not be empty"),
            Self::AgeOutOfRange(age) => write!(f, "age {age} is outside 0..={MAX_AGE}"),
        }
    }
}

impl std::error::Error for ProfileError {}

/// Profile fields collected at login. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Trimmed, non-empty display name.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Gender.
    pub gender: Gender,
    /// Marital status.
    pub marital_status: MaritalStatus,
}

impl UserProfile {
    /// Validates login input.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if the name is blank or the age exceeds
    /// [`MAX_AGE`].
    pub fn new(
        name: &str,
        age: u8,
        gender: Gender,
        marital_status: MaritalStatus,
    ) -> Result<Self, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if age > MAX_AGE {
            return Err(ProfileError::AgeOutOfRange(age));
        }
        Ok(Self {
            name: name.to_string(),
            age,
            gender,
            marital_status,
        })
    }
}

/// Per-user context passed explicitly to every view.
///
/// Interactive sessions always carry the login profile. One-shot CLI
/// commands run without logging in and use [`Session::anonymous`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The logged-in user, if any.
    pub profile: Option<UserProfile>,
}

impl Session {
    /// Starts a session for a validated profile.
    #[must_use]
    pub const fn new(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    /// A session with no logged-in user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { profile: None }
    }

    /// Display name of the logged-in user.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.name.as_str())
    }

    /// Sidebar lines summarising the profile.
    #[must_use]
    pub fn sidebar(&self) -> Vec<String> {
        let Some(p) = &self.profile else {
            return vec!["Welcome!".to_string()];
        };
        vec![
            format!("Welcome, {}!", p.name),
            format!("Age: {}", p.age),
            format!("Marital Status: {}", p.marital_status.label()),
            format!("Gender: {}", p.gender.label()),
        ]
    }
}

/// Inputs for the city-wise prediction view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    /// City feature code.
    pub city: u32,
    /// Crime category.
    pub category: CrimeCategory,
    /// Target year.
    pub year: i32,
}

/// Inputs for the district-wise severity view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictQuery {
    /// State or union territory.
    pub state: String,
    /// District name.
    pub district: String,
    /// Reporting year.
    pub year: i32,
}

/// Display ordering for hotspot lists.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HotspotOrder {
    /// Nearest first.
    #[default]
    Distance,
    /// Highest severity index first.
    Severity,
}

/// Inputs for the location-wise hotspot view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    /// The user's position.
    pub origin: Coordinate,
    /// Search radius; the configured default applies when `None`.
    pub radius_km: Option<f64>,
    /// Reporting year for the severity join; the latest year when `None`.
    pub year: Option<i32>,
    /// Display ordering.
    #[serde(default)]
    pub order: HotspotOrder,
}

/// One dashboard view together with its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Predicted crime rate for a city, category, and year.
    CityWise(CityQuery),
    /// Severity index of a district for a year.
    DistrictWise(DistrictQuery),
    /// Severity hotspots around a location.
    LocationWise(LocationQuery),
}

impl View {
    /// Menu label for this view.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CityWise(_) => "City-wise crime prediction",
            Self::DistrictWise(_) => "District-wise severity",
            Self::LocationWise(_) => "Location-wise hotspots",
        }
    }
}

/// A severity-annotated location near the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// State or union territory.
    pub state: String,
    /// District name.
    pub district: String,
    /// District coordinate.
    pub location: Coordinate,
    /// Geodesic distance from the user in kilometres.
    pub distance_km: f64,
    /// Severity index for the selected year, if a record exists.
    pub severity_index: Option<f64>,
    /// Density cluster, when clustering is enabled.
    pub cluster: Option<usize>,
}

/// One `(year, value)` point of a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Year on the x axis.
    pub year: i32,
    /// Value on the y axis.
    pub value: f64,
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Category label.
    pub label: String,
    /// Bar height.
    pub value: f64,
}

/// A pin on a map panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Popup label.
    pub label: String,
    /// Pin position.
    pub location: Coordinate,
    /// Tier used to colour the pin, if known.
    pub tier: Option<SeverityTier>,
}

/// One block of a rendered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// A paragraph of text.
    Text {
        /// Body text.
        text: String,
    },
    /// A headline number.
    Metric {
        /// What is measured.
        label: String,
        /// Formatted value.
        value: String,
        /// Optional secondary line.
        detail: Option<String>,
    },
    /// A line chart over years.
    LineChart {
        /// Chart title.
        title: String,
        /// Y axis label.
        y_label: String,
        /// Points in ascending year order.
        points: Vec<SeriesPoint>,
    },
    /// A bar chart.
    BarChart {
        /// Chart title.
        title: String,
        /// Bars in display order.
        bars: Vec<Bar>,
    },
    /// A map centred on a point with pins.
    MarkerMap {
        /// Map centre.
        center: Coordinate,
        /// Radius drawn around the centre in kilometres, if any.
        radius_km: Option<f64>,
        /// Pins.
        markers: Vec<Marker>,
    },
    /// A table of pre-formatted cells.
    Table {
        /// Column headers.
        columns: Vec<String>,
        /// Rows, each with one cell per column.
        rows: Vec<Vec<String>>,
    },
    /// A non-fatal problem; dependent panels were skipped.
    Warning {
        /// What is missing.
        message: String,
    },
    /// The view could not be computed.
    Error {
        /// What went wrong.
        message: String,
    },
}

/// Everything a front-end needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Render {
    /// Page title.
    pub title: String,
    /// Panels in display order.
    pub panels: Vec<Panel>,
}

impl Render {
    /// Starts an empty render with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            panels: Vec::new(),
        }
    }

    /// Appends a panel.
    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    /// Appends a text panel.
    pub fn text(&mut self, text: impl Into<String>) {
        self.push(Panel::Text { text: text.into() });
    }

    /// Appends a warning panel.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Panel::Warning {
            message: message.into(),
        });
    }

    /// Appends an error panel.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Panel::Error {
            message: message.into(),
        });
    }

    /// Returns `true` if any panel is an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.panels.iter().any(|p| matches!(p, Panel::Error { .. }))
    }

    /// Returns `true` if any panel is a warning.
    #[must_use]
    pub fn has_warning(&self) -> bool {
        self.panels
            .iter()
            .any(|p| matches!(p, Panel::Warning { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        let err = UserProfile::new("   ", 30, Gender::Female, MaritalStatus::Single).unwrap_err();
        assert_eq!(err, ProfileError::EmptyName);
    }

    #[test]
    fn names_are_trimmed() {
        let profile = UserProfile::new("  Asha ", 30, Gender::Female, MaritalStatus::Married).unwrap();
        assert_eq!(profile.name, "Asha");
    }

    #[test]
    fn age_above_limit_is_rejected() {
        let err = UserProfile::new("Ravi", 121, Gender::Male, MaritalStatus::Single).unwrap_err();
        assert_eq!(err, ProfileError::AgeOutOfRange(121));
        assert!(UserProfile::new("Ravi", 0, Gender::Male, MaritalStatus::Single).is_ok());
    }

    #[test]
    fn sidebar_lists_profile_fields() {
        let session = Session::new(
            UserProfile::new("Asha", 42, Gender::Other, MaritalStatus::Widowed).unwrap(),
        );
        assert_eq!(
            session.sidebar(),
            vec![
                "Welcome, Asha!",
                "Age: 42",
                "Marital Status: Widowed",
                "Gender: Other",
            ]
        );
    }

    #[test]
    fn anonymous_session_has_no_name() {
        let session = Session::anonymous();
        assert_eq!(session.user_name(), None);
        assert_eq!(session.sidebar(), vec!["Welcome!"]);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("MARRIED".parse::<MaritalStatus>().unwrap(), MaritalStatus::Married);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("Severity".parse::<HotspotOrder>().unwrap(), HotspotOrder::Severity);
    }

    #[test]
    fn unknown_order_is_a_boxable_error() {
        let err: Box<dyn std::error::Error + Send + Sync> =
            "north".parse::<HotspotOrder>().unwrap_err().into();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn panels_serialize_with_kind_tag() {
        let json = serde_json::to_value(Panel::Warning {
            message: "no coordinate".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "warning");
        assert_eq!(json["message"], "no coordinate");
    }

    #[test]
    fn views_serialize_with_view_tag() {
        let view = View::CityWise(CityQuery {
            city: 0,
            category: CrimeCategory::Murder,
            year: 2021,
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "city_wise");
        assert_eq!(json["category"], "MURDER");
    }

    #[test]
    fn render_tracks_errors_and_warnings() {
        let mut render = Render::new("Test");
        assert!(!render.has_error());
        render.warning("missing");
        render.error("failed");
        assert!(render.has_warning());
        assert!(render.has_error());
    }
}

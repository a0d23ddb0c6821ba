//! Dashboard configuration.
//!
//! Loaded from TOML. The file comes from `--config`, then the
//! `CRIME_RISK_CONFIG` environment variable, and otherwise the default
//! embedded at compile time from `config/default.toml`. Every section is
//! optional in a user file; missing keys fall back to the defaults below.

use std::path::{Path, PathBuf};

use crime_risk_geography::TablePaths;
use crime_risk_severity::{ThresholdPreset, ThresholdTable};
use crime_risk_spatial::ClusterParams;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CRIME_RISK_CONFIG";

/// Clustering parameters used when clustering is requested on the command
/// line but the config has no `[proximity.cluster]` section.
pub const DEFAULT_CLUSTER: ClusterParams = ClusterParams {
    eps_km: 5.0,
    min_points: 3,
};

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config is not valid TOML or has the wrong shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// `[model]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// JSON model artifact.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/model.json"),
        }
    }
}

/// `[data]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Optional CSV overriding the embedded city table.
    pub cities: Option<PathBuf>,
    /// Per-district crime counts.
    pub districts: PathBuf,
    /// District coordinates.
    pub locations: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cities: None,
            districts: PathBuf::from("data/districts.csv"),
            locations: PathBuf::from("data/locations.csv"),
        }
    }
}

impl DataConfig {
    /// Table locations in the form the loader expects.
    #[must_use]
    pub fn table_paths(&self) -> TablePaths {
        TablePaths {
            cities: self.cities.clone(),
            districts: self.districts.clone(),
            locations: self.locations.clone(),
        }
    }
}

/// `[projection]`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Year the city populations were measured in.
    pub base_year: i32,
    /// Latest year offered for predictions.
    pub max_year: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            base_year: 2011,
            max_year: 2050,
        }
    }
}

/// `[severity]`
///
/// Explicit `thresholds` take precedence over `preset`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeverityConfig {
    /// Named cut-point table.
    pub preset: ThresholdPreset,
    /// Custom cut points.
    pub thresholds: Option<ThresholdTable>,
}

impl SeverityConfig {
    /// The effective cut points.
    #[must_use]
    pub fn table(&self) -> ThresholdTable {
        self.thresholds.unwrap_or_else(|| self.preset.table())
    }
}

/// `[proximity]`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProximityConfig {
    /// Default search radius in kilometres.
    pub radius_km: f64,
    /// DBSCAN parameters; clustering is off when absent.
    pub cluster: Option<ClusterParams>,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius_km: 25.0,
            cluster: None,
        }
    }
}

/// `[hotspot]`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HotspotConfig {
    /// Locations whose severity index is below this are hidden.
    pub min_index: f64,
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Model artifact.
    pub model: ModelConfig,
    /// Reference tables.
    pub data: DataConfig,
    /// Population projection.
    pub projection: ProjectionConfig,
    /// Tier cut points.
    pub severity: SeverityConfig,
    /// Radius search and clustering.
    pub proximity: ProximityConfig,
    /// Hotspot filtering.
    pub hotspot: HotspotConfig,
}

impl DashboardConfig {
    /// Parses and validates a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded default config.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is invalid. Since it is a compile-time
    /// constant, a failure is a development error caught by the tests.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded config: {e}"))
    }

    /// Reads a config file. Relative paths inside it resolve against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let toml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&toml)?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the config named by `explicit`, then `CRIME_RISK_CONFIG`, and
    /// otherwise the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::from_file(Path::new(&path)),
            _ => {
                log::debug!("Using embedded default config");
                Ok(Self::embedded())
            }
        }
    }

    fn resolve_relative_to(&mut self, dir: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        resolve(&mut self.model.path);
        resolve(&mut self.data.districts);
        resolve(&mut self.data.locations);
        if let Some(cities) = &mut self.data.cities {
            resolve(cities);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { message })
        };

        if self.projection.max_year < self.projection.base_year {
            return invalid(format!(
                "projection.max_year ({}) is before projection.base_year ({})",
                self.projection.max_year, self.projection.base_year
            ));
        }
        if !(self.proximity.radius_km.is_finite() && self.proximity.radius_km > 0.0) {
            return invalid(format!(
                "proximity.radius_km must be positive, got {}",
                self.proximity.radius_km
            ));
        }
        if let Some(cluster) = self.proximity.cluster {
            if !(cluster.eps_km.is_finite() && cluster.eps_km > 0.0) {
                return invalid(format!(
                    "proximity.cluster.eps_km must be positive, got {}",
                    cluster.eps_km
                ));
            }
            if cluster.min_points == 0 {
                return invalid("proximity.cluster.min_points must be at least 1".to_string());
            }
        }
        if !self.hotspot.min_index.is_finite() || self.hotspot.min_index < 0.0 {
            return invalid(format!(
                "hotspot.min_index must be non-negative, got {}",
                self.hotspot.min_index
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crime_risk_crime_models::SeverityTier;

    #[test]
    fn embedded_config_parses() {
        let config = DashboardConfig::embedded();
        assert_eq!(config.projection.base_year, 2011);
        assert!((config.proximity.radius_km - 25.0).abs() < f64::EPSILON);
        assert!(config.proximity.cluster.is_none());
        assert_eq!(config.severity.table(), ThresholdPreset::Standard.table());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config.model.path, PathBuf::from("data/model.json"));
        assert_eq!(config.projection.max_year, 2050);
    }

    #[test]
    fn custom_thresholds_override_preset() {
        let config = DashboardConfig::from_toml(
            r#"
            [severity]
            preset = "coarse"
            thresholds = { very_low = 2.0, low = 4.0, high = 8.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.severity.table().classify(3.0), SeverityTier::Low);
    }

    #[test]
    fn descending_thresholds_are_rejected() {
        let err = DashboardConfig::from_toml(
            r"
            [severity]
            thresholds = { very_low = 5.0, low = 4.0, high = 8.0 }
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn cluster_section_is_optional() {
        let config = DashboardConfig::from_toml(
            r"
            [proximity]
            radius_km = 5.0

            [proximity.cluster]
            eps_km = 2.5
            min_points = 3
            ",
        )
        .unwrap();
        let cluster = config.proximity.cluster.unwrap();
        assert_eq!(cluster.min_points, 3);
        assert!((cluster.eps_km - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        for toml in [
            "[projection]\nbase_year = 2020\nmax_year = 2010",
            "[proximity]\nradius_km = 0.0",
            "[proximity]\nradius_km = 5.0\n[proximity.cluster]\neps_km = 1.0\nmin_points = 0",
            "[hotspot]\nmin_index = -1.0",
        ] {
            let err = DashboardConfig::from_toml(toml).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { .. }),
                "expected Invalid for {toml:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DashboardConfig::from_toml("[model]\nfile = \"x.json\"").is_err());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = DashboardConfig::default();
        config.data.cities = Some(PathBuf::from("cities.csv"));
        config.model.path = PathBuf::from("/abs/model.json");
        config.resolve_relative_to(Path::new("/etc/crime-risk"));

        assert_eq!(config.model.path, PathBuf::from("/abs/model.json"));
        assert_eq!(
            config.data.districts,
            PathBuf::from("/etc/crime-risk/data/districts.csv")
        );
        assert_eq!(
            config.data.cities,
            Some(PathBuf::from("/etc/crime-risk/cities.csv"))
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DashboardConfig::from_file(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Severity arithmetic shared by every dashboard view.
//!
//! - [`projection`]: linear population growth and case-count derivation.
//! - [`tiers`]: rate-to-tier classification against a configurable
//!   [`ThresholdTable`].
//! - [`index`]: the weighted, normalized district severity index.
//!
//! Every function here is pure; nothing is cached between calls.

pub mod index;
pub mod projection;
pub mod tiers;

pub use index::severity_index;
pub use projection::{estimated_cases, project_population};
pub use tiers::{ThresholdPreset, ThresholdTable};

use thiserror::Error;

/// Errors produced while building severity configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeverityError {
    /// Cut points are not finite or not strictly ascending.
    #[error(
        "Invalid severity thresholds ({very_low}, {low}, {high}): cut points must be finite and strictly ascending"
    )]
    InvalidThresholds {
        /// Very-low cut point.
        very_low: f64,
        /// Low cut point.
        low: f64,
        /// High cut point.
        high: f64,
    },
}

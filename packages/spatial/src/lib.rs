#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Proximity search over district coordinates.
//!
//! [`ProximityIndex`] is built once from the district location table. When
//! clustering is enabled, DBSCAN runs over the full table at build time and
//! noise points are excluded from every later query. Queries return the
//! locations within a geodesic radius of the user, nearest first.

pub mod cluster;

use crime_risk_geography_models::{Coordinate, DistrictLocation};
use geo::{Distance, Geodesic, Haversine, Point};

pub use cluster::{ClusterParams, dbscan};

/// Mean Earth radius in kilometres, matching the radius `geo` uses for
/// haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

fn to_point(c: Coordinate) -> Point<f64> {
    Point::new(c.longitude, c.latitude)
}

/// Geodesic (WGS84 ellipsoid) distance between two coordinates in
/// kilometres.
#[must_use]
pub fn geodesic_km(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic.distance(to_point(a), to_point(b)) / 1_000.0
}

/// Great-circle distance on a sphere between two coordinates in
/// kilometres.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(to_point(a), to_point(b)) / 1_000.0
}

/// A location returned by a proximity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby<'a> {
    /// The matched location.
    pub location: &'a DistrictLocation,
    /// Geodesic distance from the query origin in kilometres.
    pub distance_km: f64,
    /// Cluster the location belongs to, when clustering is enabled.
    pub cluster: Option<usize>,
}

/// Pre-built proximity index over a location table.
pub struct ProximityIndex<'a> {
    locations: &'a [DistrictLocation],
    /// One entry per location; `None` for noise when clustering is enabled.
    labels: Option<Vec<Option<usize>>>,
}

impl<'a> ProximityIndex<'a> {
    /// Builds an index without clustering: every location is eligible.
    #[must_use]
    pub const fn new(locations: &'a [DistrictLocation]) -> Self {
        Self {
            locations,
            labels: None,
        }
    }

    /// Builds an index and clusters the full table once. Noise points are
    /// dropped from every query.
    #[must_use]
    pub fn clustered(locations: &'a [DistrictLocation], params: ClusterParams) -> Self {
        let coords: Vec<Coordinate> = locations.iter().map(|l| l.location).collect();
        let labels = dbscan(&coords, params);

        log::info!(
            "Clustered {} location(s) into {} cluster(s) (eps={} km, min_points={})",
            locations.len(),
            labels.iter().flatten().max().map_or(0, |m| m + 1),
            params.eps_km,
            params.min_points
        );

        Self {
            locations,
            labels: Some(labels),
        }
    }

    /// Whether this index was built with clustering.
    #[must_use]
    pub const fn is_clustered(&self) -> bool {
        self.labels.is_some()
    }

    /// Returns every eligible location within `radius_km` of `origin`,
    /// sorted by ascending distance (ties broken by district name).
    #[must_use]
    pub fn within(&self, origin: Coordinate, radius_km: f64) -> Vec<Nearby<'a>> {
        let mut results: Vec<Nearby<'a>> = self
            .locations
            .iter()
            .enumerate()
            .filter_map(|(i, location)| {
                let cluster = match &self.labels {
                    Some(labels) => Some(labels[i]?),
                    None => None,
                };
                let distance_km = geodesic_km(origin, location.location);
                (distance_km <= radius_km).then_some(Nearby {
                    location,
                    distance_km,
                    cluster,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.location.district.cmp(&b.location.district))
        });

        log::debug!(
            "{} location(s) within {radius_km} km of {origin}",
            results.len()
        );

        results
    }
}

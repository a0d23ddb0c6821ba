//! Density-based clustering (DBSCAN) with haversine distance.
//!
//! Neighbourhood queries go through an R-tree: an envelope in degrees that
//! over-approximates the `eps_km` circle narrows the candidates, then the
//! exact haversine distance decides membership.

use crime_risk_geography_models::Coordinate;
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

use crate::{EARTH_RADIUS_KM, haversine_km};

/// Envelope padding so the degree box always contains the eps circle.
const ENVELOPE_PADDING: f64 = 1.1;

/// DBSCAN parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Neighbourhood radius in kilometres.
    pub eps_km: f64,
    /// Minimum neighbourhood size (the point itself included) for a point
    /// to be a core point.
    pub min_points: usize,
}

/// A point stored in the R-tree with its position in the input slice.
struct IndexedPoint {
    idx: usize,
    lng_lat: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.lng_lat)
    }
}

struct NeighbourIndex<'a> {
    points: &'a [Coordinate],
    tree: RTree<IndexedPoint>,
    eps_km: f64,
}

impl<'a> NeighbourIndex<'a> {
    fn new(points: &'a [Coordinate], eps_km: f64) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(idx, c)| IndexedPoint {
                idx,
                lng_lat: [c.longitude, c.latitude],
            })
            .collect();

        Self {
            points,
            tree: RTree::bulk_load(entries),
            eps_km,
        }
    }

    /// Indices of every point within `eps_km` of point `i`, itself included.
    fn neighbours(&self, i: usize) -> Vec<usize> {
        let origin = self.points[i];
        let lat_delta = (self.eps_km / EARTH_RADIUS_KM).to_degrees() * ENVELOPE_PADDING;
        let max_abs_lat = (origin.latitude.abs() + lat_delta).min(90.0);
        let cos_lat = max_abs_lat.to_radians().cos();

        let lng_delta = if cos_lat > f64::EPSILON {
            lat_delta / cos_lat
        } else {
            f64::INFINITY
        };

        let lng_min = origin.longitude - lng_delta;
        let lng_max = origin.longitude + lng_delta;

        let candidates: Vec<usize> = if lng_min < -180.0 || lng_max > 180.0 {
            // Box wraps the antimeridian or covers a pole: scan everything.
            (0..self.points.len()).collect()
        } else {
            let envelope = AABB::from_corners(
                [lng_min, origin.latitude - lat_delta],
                [lng_max, origin.latitude + lat_delta],
            );
            self.tree
                .locate_in_envelope(&envelope)
                .map(|p| p.idx)
                .collect()
        };

        let mut within: Vec<usize> = candidates
            .into_iter()
            .filter(|&j| haversine_km(origin, self.points[j]) <= self.eps_km)
            .collect();
        within.sort_unstable();
        within
    }
}

/// Runs DBSCAN over `points`, returning one label per point.
///
/// `Some(id)` is the cluster a point belongs to (ids are assigned in
/// discovery order starting at 0); `None` marks noise.
#[must_use]
pub fn dbscan(points: &[Coordinate], params: ClusterParams) -> Vec<Option<usize>> {
    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    if points.is_empty()
        || params.min_points == 0
        || params.eps_km.is_nan()
        || params.eps_km < 0.0
    {
        return labels;
    }

    let index = NeighbourIndex::new(points, params.eps_km);
    let mut visited = vec![false; points.len()];
    let mut next_cluster = 0;

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let neighbours = index.neighbours(i);
        if neighbours.len() < params.min_points {
            continue;
        }

        let cluster = next_cluster;
        next_cluster += 1;
        labels[i] = Some(cluster);

        let mut queue = neighbours;
        while let Some(j) = queue.pop() {
            if labels[j].is_none() {
                labels[j] = Some(cluster);
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;

            let expansion = index.neighbours(j);
            if expansion.len() >= params.min_points {
                queue.extend(expansion);
            }
        }
    }

    log::debug!(
        "DBSCAN: {} point(s), {next_cluster} cluster(s), {} noise",
        points.len(),
        labels.iter().filter(|l| l.is_none()).count()
    );

    labels
}

//! Location-wise hotspots: severity-annotated districts near the user.

use std::cmp::Ordering;

use crime_risk_dashboard_models::{
    Bar, Hotspot, HotspotOrder, LocationQuery, Marker, Panel, Render, Session,
};
use crime_risk_geography_models::Coordinate;
use crime_risk_severity::severity_index;

use super::fmt2;
use crate::Dashboard;

const TITLE: &str = "Location-wise Hotspots";

/// Locations within `radius_km` of `origin`, nearest first, joined with
/// their severity index for `year`.
///
/// Locations with an index below the configured minimum are dropped.
/// Locations with no record for `year` are kept without an index.
#[must_use]
pub fn hotspots(
    dashboard: &Dashboard<'_>,
    origin: Coordinate,
    radius_km: f64,
    year: Option<i32>,
) -> Vec<Hotspot> {
    let data = dashboard.data();
    let min_index = dashboard.config().hotspot.min_index;

    dashboard
        .proximity()
        .within(origin, radius_km)
        .into_iter()
        .filter_map(|nearby| {
            let location = nearby.location;
            let severity_index = year
                .and_then(|y| data.record(&location.state, &location.district, y))
                .map(|record| severity_index(&record.counts));

            if severity_index.is_some_and(|index| index < min_index) {
                return None;
            }

            Some(Hotspot {
                state: location.state.clone(),
                district: location.district.clone(),
                location: location.location,
                distance_km: nearby.distance_km,
                severity_index,
                cluster: nearby.cluster,
            })
        })
        .collect()
}

/// Highest index first; locations without an index last; then nearest.
fn by_severity(a: &Hotspot, b: &Hotspot) -> Ordering {
    match (a.severity_index, b.severity_index) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.distance_km.total_cmp(&b.distance_km))
}

/// Lists the hotspots around the user's position on a table, a bar chart,
/// and a map.
#[must_use]
pub fn render(dashboard: &Dashboard<'_>, session: &Session, query: &LocationQuery) -> Render {
    let mut render = Render::new(TITLE);

    if !query.origin.is_valid() {
        render.error(format!("Invalid coordinate ({})", query.origin));
        return render;
    }
    let radius_km = query
        .radius_km
        .unwrap_or(dashboard.config().proximity.radius_km);
    if !(radius_km.is_finite() && radius_km > 0.0) {
        render.error(format!("Radius must be a positive number of km, got {radius_km}"));
        return render;
    }

    let year = query
        .year
        .or_else(|| dashboard.data().years().last().copied());
    if year.is_none() {
        render.warning("No district records loaded; severity is unavailable");
    }

    let mut found = hotspots(dashboard, query.origin, radius_km, year);
    if query.order == HotspotOrder::Severity {
        found.sort_by(by_severity);
    }

    let clustered = dashboard.proximity().is_clustered();
    let year_label = year.map_or_else(|| "n/a".to_string(), |y| y.to_string());

    if let Some(name) = session.user_name() {
        render.text(format!("{name}, here are the hotspots around you."));
    }

    render.push(Panel::Metric {
        label: "Locations in range".to_string(),
        value: found.len().to_string(),
        detail: Some(format!(
            "within {radius_km:.1} km of {}, severity year {year_label}{}",
            query.origin,
            if clustered { ", clustered" } else { "" }
        )),
    });

    if found.is_empty() {
        render.text(format!(
            "No known district locations within {radius_km:.1} km."
        ));
    } else {
        let mut columns = vec![
            "District".to_string(),
            "State".to_string(),
            "Distance (km)".to_string(),
            "Severity index".to_string(),
        ];
        if clustered {
            columns.push("Cluster".to_string());
        }

        render.push(Panel::Table {
            columns,
            rows: found
                .iter()
                .map(|h| {
                    let mut row = vec![
                        h.district.clone(),
                        h.state.clone(),
                        format!("{:.1}", h.distance_km),
                        h.severity_index.map_or_else(|| "n/a".to_string(), fmt2),
                    ];
                    if clustered {
                        row.push(h.cluster.map_or_else(String::new, |c| c.to_string()));
                    }
                    row
                })
                .collect(),
        });

        let bars: Vec<Bar> = found
            .iter()
            .filter_map(|h| {
                h.severity_index.map(|value| Bar {
                    label: h.district.clone(),
                    value,
                })
            })
            .collect();
        if !bars.is_empty() {
            render.push(Panel::BarChart {
                title: format!("Severity index ({year_label})"),
                bars,
            });
        }
    }

    render.push(Panel::MarkerMap {
        center: query.origin,
        radius_km: Some(radius_km),
        markers: found
            .iter()
            .map(|h| Marker {
                label: h.severity_index.map_or_else(
                    || h.district.clone(),
                    |index| format!("{} ({})", h.district, fmt2(index)),
                ),
                location: h.location,
                tier: None,
            })
            .collect(),
    });

    render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::App;
    use crate::config::DashboardConfig;
    use crate::test_support::{FixedRate, app, sample_data};

    const PUNE: Coordinate = Coordinate::new(18.5204, 73.8567);

    fn query(radius_km: Option<f64>, order: HotspotOrder) -> LocationQuery {
        LocationQuery {
            origin: PUNE,
            radius_km,
            year: Some(2012),
            order,
        }
    }

    fn districts(found: &[Hotspot]) -> Vec<&str> {
        found.iter().map(|h| h.district.as_str()).collect()
    }

    #[test]
    fn hotspots_are_nearest_first() {
        let app = app(Box::new(FixedRate(0.0)));
        let found = hotspots(&app.dashboard(), PUNE, 120.0, Some(2012));
        assert_eq!(districts(&found), vec!["Pune", "Pimpri", "Lonavala", "Satara"]);
        assert!(found[0].distance_km.abs() < 1e-9);
        assert_eq!(found[2].severity_index, None);
    }

    #[test]
    fn radius_excludes_far_locations() {
        let app = app(Box::new(FixedRate(0.0)));
        let found = hotspots(&app.dashboard(), PUNE, 25.0, Some(2012));
        assert_eq!(districts(&found), vec!["Pune", "Pimpri"]);
    }

    #[test]
    fn min_index_filters_but_keeps_unindexed() {
        let mut config = DashboardConfig::embedded();
        config.hotspot.min_index = 3.0;
        let app = App::new(config, sample_data(), Box::new(FixedRate(0.0)));

        let found = hotspots(&app.dashboard(), PUNE, 120.0, Some(2012));
        assert_eq!(districts(&found), vec!["Pune", "Lonavala", "Satara"]);
    }

    #[test]
    fn severity_order_puts_worst_first() {
        let app = app(Box::new(FixedRate(0.0)));
        let render = render(
            &app.dashboard(),
            &Session::anonymous(),
            &query(Some(120.0), HotspotOrder::Severity),
        );

        let rows = render
            .panels
            .iter()
            .find_map(|p| match p {
                Panel::Table { rows, .. } => Some(rows.clone()),
                _ => None,
            })
            .unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(order, vec!["Pune", "Satara", "Pimpri", "Lonavala"]);
    }

    #[test]
    fn default_radius_comes_from_config() {
        let app = app(Box::new(FixedRate(0.0)));
        let render = render(
            &app.dashboard(),
            &Session::anonymous(),
            &query(None, HotspotOrder::Distance),
        );
        assert!(render.panels.iter().any(|p| matches!(
            p,
            Panel::Metric { value, .. } if value == "2"
        )));
    }

    #[test]
    fn invalid_inputs_are_error_panels() {
        let app = app(Box::new(FixedRate(0.0)));
        let dashboard = app.dashboard();

        let mut bad_origin = query(None, HotspotOrder::Distance);
        bad_origin.origin = Coordinate::new(95.0, 0.0);
        assert!(render(&dashboard, &Session::anonymous(), &bad_origin).has_error());

        let bad_radius = query(Some(-1.0), HotspotOrder::Distance);
        assert!(render(&dashboard, &Session::anonymous(), &bad_radius).has_error());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let app = app(Box::new(FixedRate(0.0)));
        let mut far = query(Some(5.0), HotspotOrder::Distance);
        far.origin = Coordinate::new(28.7041, 77.1025);
        let render = render(&app.dashboard(), &Session::anonymous(), &far);
        assert!(!render.has_error());
        assert!(render.panels.iter().any(|p| matches!(
            p,
            Panel::MarkerMap { markers, .. } if markers.is_empty()
        )));
    }
}

//! District-wise severity index.

use crime_risk_dashboard_models::{
    Bar, DistrictQuery, Marker, Panel, Render, SeriesPoint, Session,
};
use crime_risk_severity::{index, severity_index};

use super::fmt2;
use crate::Dashboard;

const TITLE: &str = "District-wise Severity";

/// Shows the weighted severity index of a district for a year, its
/// per-crime breakdown, its history across reporting years, and the
/// district on a map.
///
/// A missing record or coordinate produces a warning and skips only the
/// panels that need it.
#[must_use]
pub fn render(dashboard: &Dashboard<'_>, session: &Session, query: &DistrictQuery) -> Render {
    let mut render = Render::new(TITLE);
    let data = dashboard.data();
    let place = format!("{}, {}", query.district, query.state);

    if let Some(name) = session.user_name() {
        render.text(format!("{name}, here is the severity report for {place}."));
    }

    match data.record(&query.state, &query.district, query.year) {
        Some(record) => {
            let score = severity_index(&record.counts);
            log::debug!("{place} / {}: index={score}", query.year);

            render.push(Panel::Metric {
                label: format!("Severity index ({})", query.year),
                value: fmt2(score),
                detail: Some("weighted, 100 = 500 cases in every weighted crime".to_string()),
            });

            let breakdown = index::contributions(&record.counts);
            if breakdown.is_empty() {
                render.warning(format!(
                    "No weighted crime columns recorded for {place} in {}",
                    query.year
                ));
            } else {
                render.push(Panel::BarChart {
                    title: "Weighted contributions".to_string(),
                    bars: breakdown
                        .iter()
                        .map(|(crime, _, points)| Bar {
                            label: crime.label().to_string(),
                            value: *points,
                        })
                        .collect(),
                });
                render.push(Panel::Table {
                    columns: vec![
                        "Crime".to_string(),
                        "Cases".to_string(),
                        "Weight".to_string(),
                        "Points".to_string(),
                    ],
                    rows: breakdown
                        .iter()
                        .map(|(crime, count, points)| {
                            vec![
                                crime.label().to_string(),
                                count.to_string(),
                                crime.weight().to_string(),
                                format!("{points:.0}"),
                            ]
                        })
                        .collect(),
                });
            }
        }
        None => render.warning(format!("No crime record for {place} in {}", query.year)),
    }

    let history = data.history(&query.state, &query.district);
    if history.len() > 1 {
        render.push(Panel::LineChart {
            title: format!("Severity index for {place}"),
            y_label: "Severity index".to_string(),
            points: history
                .iter()
                .map(|r| SeriesPoint {
                    year: r.year,
                    value: severity_index(&r.counts),
                })
                .collect(),
        });
    }

    match data.location(&query.state, &query.district) {
        Some(location) => render.push(Panel::MarkerMap {
            center: location.location,
            radius_km: None,
            markers: vec![Marker {
                label: place,
                location: location.location,
                tier: None,
            }],
        }),
        None => {
            log::warn!("No coordinate for {place}");
            render.warning(format!("No coordinate for {place}; map skipped"));
        }
    }

    render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedRate, app};

    fn query(district: &str, year: i32) -> DistrictQuery {
        DistrictQuery {
            state: "maharashtra".to_string(),
            district: district.to_string(),
            year,
        }
    }

    #[test]
    fn reports_index_and_breakdown() {
        let app = app(Box::new(FixedRate(0.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query("PUNE", 2012));

        assert!(!render.has_warning(), "{render:?}");
        assert!(render.panels.iter().any(|p| matches!(
            p,
            Panel::Metric { value, .. } if value == "22.00"
        )));

        let bars = render
            .panels
            .iter()
            .find_map(|p| match p {
                Panel::BarChart { bars, .. } => Some(bars.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Murder");
        assert!((bars[0].value - 1100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn history_chart_spans_reporting_years() {
        let app = app(Box::new(FixedRate(0.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query("Pune", 2012));

        let points = render
            .panels
            .iter()
            .find_map(|p| match p {
                Panel::LineChart { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].year, 2011);
        assert!((points[0].value - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_year_warns_but_keeps_map() {
        let app = app(Box::new(FixedRate(0.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query("Satara", 2001));

        assert!(render.has_warning());
        assert!(!render.has_error());
        assert!(
            render
                .panels
                .iter()
                .any(|p| matches!(p, Panel::MarkerMap { .. }))
        );
    }

    #[test]
    fn missing_coordinate_skips_map() {
        let app = app(Box::new(FixedRate(0.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query("Nagpur", 2012));

        assert!(render.has_warning());
        assert!(
            !render
                .panels
                .iter()
                .any(|p| matches!(p, Panel::MarkerMap { .. }))
        );
        assert!(render.panels.iter().any(|p| matches!(
            p,
            Panel::Metric { value, .. } if value == "0.73"
        )));
    }
}

//! City-wise crime-rate prediction.

use crime_risk_dashboard_models::{CityQuery, Marker, Panel, Render, SeriesPoint, Session};

use super::fmt2;
use crate::Dashboard;

const TITLE: &str = "City-wise Crime Prediction";

/// Predicts the rate for the selected city, category, and year, with the
/// yearly trend from the base year and the category's prevention tip.
///
/// Any model failure replaces the whole view with a single error panel.
#[must_use]
pub fn render(dashboard: &Dashboard<'_>, session: &Session, query: &CityQuery) -> Render {
    let mut render = Render::new(TITLE);
    let projection = dashboard.config().projection;

    let Some(city) = dashboard.data().city_by_id(query.city) else {
        render.error(format!("Unknown city code {}", query.city));
        return render;
    };
    if query.year < projection.base_year {
        render.error(format!(
            "Year {} is before the base year ({})",
            query.year, projection.base_year
        ));
        return render;
    }
    if query.year > projection.max_year {
        render.error(format!(
            "Year {} is beyond the last supported year ({})",
            query.year, projection.max_year
        ));
        return render;
    }

    let predictor = dashboard.predictor();
    let outcome = predictor
        .predict(city, query.category, query.year)
        .and_then(|result| {
            predictor
                .trend(city, query.category, query.year)
                .map(|trend| (result, trend))
        });

    let (result, trend) = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!(
                "Prediction failed for {} / {} / {}: {e}",
                city.name,
                query.category.display_name(),
                query.year
            );
            render.error(format!("Prediction failed: {e}"));
            return render;
        }
    };

    let category = query.category.display_name();
    render.text(match session.user_name() {
        Some(name) => format!(
            "{name}, here is the {category} outlook for {} in {}.",
            city.name, query.year
        ),
        None => format!("{category} outlook for {} in {}.", city.name, query.year),
    });

    render.push(Panel::Metric {
        label: "Predicted crime rate".to_string(),
        value: fmt2(result.crime_rate),
        detail: Some("per lakh population".to_string()),
    });
    render.push(Panel::Metric {
        label: "Estimated cases".to_string(),
        value: result.cases.to_string(),
        detail: Some(format!(
            "projected population {} lakh",
            fmt2(result.request.adjusted_population)
        )),
    });
    render.push(Panel::Metric {
        label: "Severity".to_string(),
        value: result.tier.label().to_string(),
        detail: Some(result.tier.area_description().to_string()),
    });

    render.push(Panel::LineChart {
        title: format!("{category} rate in {}", city.name),
        y_label: "Crime rate".to_string(),
        points: trend
            .iter()
            .map(|p| SeriesPoint {
                year: p.year,
                value: p.crime_rate,
            })
            .collect(),
    });

    render.push(Panel::MarkerMap {
        center: city.location,
        radius_km: None,
        markers: vec![Marker {
            label: format!("{}: {}", city.name, result.tier.area_description()),
            location: city.location,
            tier: Some(result.tier),
        }],
    });

    render.text(format!(
        "Prevention tip: {}",
        query.category.prevention_tip()
    ));

    render
}

#[cfg(test)]
mod tests {
    use crime_risk_crime_models::{CrimeCategory, SeverityTier};

    use super::*;
    use crate::test_support::{Broken, FixedRate, app};

    fn query(city: u32, year: i32) -> CityQuery {
        CityQuery {
            city,
            category: CrimeCategory::Murder,
            year,
        }
    }

    fn metric<'a>(render: &'a Render, wanted: &str) -> Option<&'a str> {
        render.panels.iter().find_map(|p| match p {
            Panel::Metric { label, value, .. } if label == wanted => Some(value.as_str()),
            _ => None,
        })
    }

    #[test]
    fn ahmedabad_2021_end_to_end() {
        let app = app(Box::new(FixedRate(3.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query(0, 2021));

        assert!(!render.has_error(), "{render:?}");
        assert_eq!(metric(&render, "Predicted crime rate"), Some("3.00"));
        assert_eq!(metric(&render, "Estimated cases"), Some("210"));
        assert_eq!(metric(&render, "Severity"), Some(SeverityTier::Low.label()));
    }

    #[test]
    fn trend_runs_from_base_year() {
        let app = app(Box::new(FixedRate(3.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query(0, 2014));

        let years: Vec<i32> = render
            .panels
            .iter()
            .find_map(|p| match p {
                Panel::LineChart { points, .. } => Some(points.iter().map(|p| p.year).collect()),
                _ => None,
            })
            .unwrap_or_default();
        assert_eq!(years, vec![2011, 2012, 2013, 2014]);
    }

    #[test]
    fn model_failure_aborts_the_view() {
        let app = app(Box::new(Broken));
        let render = render(&app.dashboard(), &Session::anonymous(), &query(0, 2021));

        assert_eq!(render.panels.len(), 1);
        assert!(render.has_error());
    }

    #[test]
    fn unknown_city_is_an_error_panel() {
        let app = app(Box::new(FixedRate(3.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query(99, 2021));
        assert!(render.has_error());
    }

    #[test]
    fn years_past_the_limit_are_rejected() {
        let app = app(Box::new(FixedRate(3.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query(0, 2051));
        assert!(render.has_error());
    }

    #[test]
    fn years_before_the_base_year_are_rejected() {
        let app = app(Box::new(Broken));
        let dashboard = app.dashboard();

        for year in [1990, 2010, i32::MIN] {
            let render = render(&dashboard, &Session::anonymous(), &query(0, year));
            assert_eq!(render.panels.len(), 1, "{year}: {render:?}");
            assert!(
                matches!(&render.panels[0], Panel::Error { message } if message.contains("base year")),
                "{year}: {render:?}"
            );
        }
    }

    #[test]
    fn includes_prevention_tip_and_map() {
        let app = app(Box::new(FixedRate(20.0)));
        let render = render(&app.dashboard(), &Session::anonymous(), &query(14, 2020));

        assert!(render.panels.iter().any(|p| matches!(
            p,
            Panel::Text { text } if text.contains(CrimeCategory::Murder.prevention_tip())
        )));
        assert!(render.panels.iter().any(|p| matches!(
            p,
            Panel::MarkerMap { markers, .. } if markers[0].tier == Some(SeverityTier::VeryHigh)
        )));
    }
}

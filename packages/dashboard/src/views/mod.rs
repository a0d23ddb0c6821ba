//! View functions. Each takes the shared [`Dashboard`](crate::Dashboard)
//! context, the session, and its query, and returns a complete
//! [`Render`](crime_risk_dashboard_models::Render).

pub mod city;
pub mod district;
pub mod location;

/// Formats a value with two decimals.
fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

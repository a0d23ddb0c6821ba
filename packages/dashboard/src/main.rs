#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime risk dashboard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_risk_crime_models::CrimeCategory;
use crime_risk_dashboard::config::DEFAULT_CLUSTER;
use crime_risk_dashboard::text::render_text;
use crime_risk_dashboard::{App, DashboardConfig, interactive};
use crime_risk_dashboard_models::{
    CityQuery, DistrictQuery, HotspotOrder, LocationQuery, Render, Session, View,
};
use crime_risk_geography_models::Coordinate;

#[derive(Parser)]
#[command(
    name = "crime_risk_dashboard",
    about = "Crime-rate prediction and severity dashboard"
)]
struct Cli {
    /// Path to a TOML config file (overrides `CRIME_RISK_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print the render description as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and browse the views interactively (default)
    Interactive,
    /// Predict the crime rate for a city, crime type, and year
    Predict {
        /// City name or code (e.g. "Pune" or "17")
        #[arg(long)]
        city: String,
        /// Crime type name or code (e.g. "Murder" or "9")
        #[arg(long)]
        crime: String,
        /// Target year
        #[arg(long)]
        year: i32,
    },
    /// Show the severity index of a district
    District {
        /// State or union territory
        #[arg(long)]
        state: String,
        /// District name
        #[arg(long)]
        district: String,
        /// Reporting year
        #[arg(long)]
        year: i32,
    },
    /// List severity hotspots around a coordinate
    Nearby {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in kilometres (defaults to `proximity.radius_km`)
        #[arg(long)]
        radius_km: Option<f64>,
        /// Reporting year for severity (defaults to the latest year)
        #[arg(long)]
        year: Option<i32>,
        /// Drop density-noise locations before searching
        #[arg(long)]
        cluster: bool,
        /// Display ordering: "distance" or "severity"
        #[arg(long, default_value = "distance")]
        order: HotspotOrder,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(Commands::Nearby { cluster: true, .. }) = &cli.command {
        config.proximity.cluster.get_or_insert(DEFAULT_CLUSTER);
    }

    let app = App::load(config).inspect_err(|e| log::error!("Failed to start: {e}"))?;
    let dashboard = app.dashboard();

    let view = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => return interactive::run(&dashboard),
        Commands::Predict { city, crime, year } => {
            let city = app
                .data()
                .resolve_city(&city)
                .ok_or_else(|| format!("Unknown city: {city}"))?;
            View::CityWise(CityQuery {
                city: city.id,
                category: CrimeCategory::resolve(&crime)?,
                year,
            })
        }
        Commands::District {
            state,
            district,
            year,
        } => View::DistrictWise(DistrictQuery {
            state,
            district,
            year,
        }),
        Commands::Nearby {
            lat,
            lon,
            radius_km,
            year,
            order,
            ..
        } => View::LocationWise(LocationQuery {
            origin: Coordinate::new(lat, lon),
            radius_km,
            year,
            order,
        }),
    };

    let render = dashboard.render(&Session::anonymous(), &view);
    print_render(&render, cli.json)?;

    if render.has_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_render(render: &Render, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(render)?);
    } else {
        print!("{}", render_text(render));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn nearby_parses_order_and_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "crime_risk_dashboard",
            "nearby",
            "--lat",
            "-18.5",
            "--lon",
            "73.85",
            "--order",
            "severity",
        ])
        .unwrap();

        let Some(Commands::Nearby {
            lat, order, cluster, ..
        }) = cli.command
        else {
            panic!("expected the nearby command");
        };
        assert!((lat + 18.5).abs() < 1e-9);
        assert_eq!(order, HotspotOrder::Severity);
        assert!(!cluster);
    }

    #[test]
    fn nearby_rejects_unknown_order() {
        let result = Cli::try_parse_from([
            "crime_risk_dashboard",
            "nearby",
            "--lat",
            "18.5",
            "--lon",
            "73.85",
            "--order",
            "north",
        ]);
        assert!(result.is_err());
    }
}

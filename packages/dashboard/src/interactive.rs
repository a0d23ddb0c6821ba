//! Interactive terminal session.
//!
//! Prompts for the login profile, then loops over a menu of the three
//! views until the user quits. View errors are printed inline and the
//! loop continues.

use crime_risk_crime_models::CrimeCategory;
use crime_risk_dashboard_models::{
    CityQuery, DistrictQuery, Gender, HotspotOrder, LocationQuery, MAX_AGE, MaritalStatus,
    Session, UserProfile, View,
};
use crime_risk_geography_models::Coordinate;
use dialoguer::{Input, Select};

use crate::Dashboard;
use crate::text::render_text;

/// Entries of the main menu.
enum MenuAction {
    CityWise,
    DistrictWise,
    LocationWise,
    Profile,
    Quit,
}

impl MenuAction {
    const ALL: &[Self] = &[
        Self::CityWise,
        Self::DistrictWise,
        Self::LocationWise,
        Self::Profile,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::CityWise => "City-wise crime prediction",
            Self::DistrictWise => "District-wise severity",
            Self::LocationWise => "Location-wise hotspots",
            Self::Profile => "Show profile",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the login prompts and the menu loop.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read from.
pub fn run(dashboard: &Dashboard<'_>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Risk Dashboard");
    println!();

    let session = Session::new(login()?);
    log::info!("Session started");
    for line in session.sidebar() {
        println!("{line}");
    }

    let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("Choose a view")
            .items(&labels)
            .default(0)
            .interact()?;

        let view = match MenuAction::ALL[idx] {
            MenuAction::CityWise => Some(city_view(dashboard)?),
            MenuAction::DistrictWise => district_view(dashboard)?,
            MenuAction::LocationWise => Some(location_view(dashboard)?),
            MenuAction::Profile => {
                for line in session.sidebar() {
                    println!("{line}");
                }
                None
            }
            MenuAction::Quit => break,
        };

        if let Some(view) = view {
            let render = dashboard.render(&session, &view);
            println!();
            print!("{}", render_text(&render));
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Collects and validates the login profile.
fn login() -> Result<UserProfile, Box<dyn std::error::Error>> {
    let name: String = Input::new()
        .with_prompt("Name")
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Name must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let age: u8 = Input::new()
        .with_prompt("Age")
        .default(30)
        .validate_with(|input: &u8| -> Result<(), String> {
            if *input > MAX_AGE {
                Err(format!("Age must be between 0 and {MAX_AGE}"))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let marital_labels: Vec<&str> = MaritalStatus::all()
        .iter()
        .map(|s| s.label())
        .collect();
    let marital_idx = Select::new()
        .with_prompt("Marital status")
        .items(&marital_labels)
        .default(0)
        .interact()?;

    let gender_labels: Vec<&str> = Gender::all().iter().map(|g| g.label()).collect();
    let gender_idx = Select::new()
        .with_prompt("Gender")
        .items(&gender_labels)
        .default(0)
        .interact()?;

    Ok(UserProfile::new(
        &name,
        age,
        Gender::all()[gender_idx],
        MaritalStatus::all()[marital_idx],
    )?)
}

fn city_view(dashboard: &Dashboard<'_>) -> Result<View, Box<dyn std::error::Error>> {
    let cities = dashboard.data().cities();
    let city_labels: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    let city_idx = Select::new()
        .with_prompt("City")
        .items(&city_labels)
        .default(0)
        .max_length(20)
        .interact()?;

    let category_labels: Vec<&str> = CrimeCategory::all()
        .iter()
        .map(|c| c.display_name())
        .collect();
    let category_idx = Select::new()
        .with_prompt("Crime type")
        .items(&category_labels)
        .default(0)
        .interact()?;

    let projection = dashboard.config().projection;
    let year: i32 = Input::new()
        .with_prompt(format!(
            "Year ({}-{})",
            projection.base_year, projection.max_year
        ))
        .default(projection.base_year)
        .validate_with(|input: &i32| -> Result<(), String> {
            if (projection.base_year..=projection.max_year).contains(input) {
                Ok(())
            } else {
                Err(format!(
                    "Year must be between {} and {}",
                    projection.base_year, projection.max_year
                ))
            }
        })
        .interact_text()?;

    Ok(View::CityWise(CityQuery {
        city: cities[city_idx].id,
        category: CrimeCategory::all()[category_idx],
        year,
    }))
}

fn district_view(dashboard: &Dashboard<'_>) -> Result<Option<View>, Box<dyn std::error::Error>> {
    let data = dashboard.data();
    let states = data.states();
    if states.is_empty() {
        println!("No district records loaded.");
        return Ok(None);
    }

    let state_idx = Select::new()
        .with_prompt("State / UT")
        .items(&states)
        .default(0)
        .max_length(20)
        .interact()?;
    let state = states[state_idx];

    let districts = data.districts_in(state);
    let district_idx = Select::new()
        .with_prompt("District")
        .items(&districts)
        .default(0)
        .max_length(20)
        .interact()?;
    let district = districts[district_idx];

    let years: Vec<i32> = data.history(state, district).iter().map(|r| r.year).collect();
    let year_labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    let year_idx = Select::new()
        .with_prompt("Year")
        .items(&year_labels)
        .default(year_labels.len().saturating_sub(1))
        .interact()?;

    Ok(Some(View::DistrictWise(DistrictQuery {
        state: state.to_string(),
        district: district.to_string(),
        year: years[year_idx],
    })))
}

fn location_view(dashboard: &Dashboard<'_>) -> Result<View, Box<dyn std::error::Error>> {
    let latitude: f64 = Input::new()
        .with_prompt("Your latitude")
        .validate_with(|input: &f64| -> Result<(), &str> {
            if (-90.0..=90.0).contains(input) {
                Ok(())
            } else {
                Err("Latitude must be between -90 and 90")
            }
        })
        .interact_text()?;

    let longitude: f64 = Input::new()
        .with_prompt("Your longitude")
        .validate_with(|input: &f64| -> Result<(), &str> {
            if (-180.0..=180.0).contains(input) {
                Ok(())
            } else {
                Err("Longitude must be between -180 and 180")
            }
        })
        .interact_text()?;

    let radius_km: f64 = Input::new()
        .with_prompt("Radius (km)")
        .default(dashboard.config().proximity.radius_km)
        .validate_with(|input: &f64| -> Result<(), &str> {
            if input.is_finite() && *input > 0.0 {
                Ok(())
            } else {
                Err("Radius must be positive")
            }
        })
        .interact_text()?;

    let order_idx = Select::new()
        .with_prompt("Order by")
        .items(&["Distance", "Severity"])
        .default(0)
        .interact()?;
    let order = if order_idx == 0 {
        HotspotOrder::Distance
    } else {
        HotspotOrder::Severity
    };

    Ok(View::LocationWise(LocationQuery {
        origin: Coordinate::new(latitude, longitude),
        radius_km: Some(radius_km),
        year: None,
        order,
    }))
}

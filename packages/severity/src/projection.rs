//! Population projection and case-count derivation.

/// Annual growth applied to the base population.
pub const ANNUAL_GROWTH_RATE: f64 = 0.01;

/// Projects a base population forward to `year`.
///
/// Growth is linear: `p0 * (1 + 0.01 * (year - base_year))`, applied once
/// rather than compounded. Years before `base_year` shrink the population;
/// the result is not clamped.
#[must_use]
pub fn project_population(base_population: f64, base_year: i32, year: i32) -> f64 {
    let elapsed = f64::from(year) - f64::from(base_year);
    base_population * ANNUAL_GROWTH_RATE.mul_add(elapsed, 1.0)
}

/// Estimated number of cases for a rate applied to a population.
///
/// Rounds up, so any fractional case counts as one. Negative or non-finite
/// products yield zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimated_cases(rate: f64, population: f64) -> u64 {
    let cases = (rate * population).ceil();
    if cases.is_finite() && cases > 0.0 {
        cases as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn projection_is_identity_at_base_year() {
        assert!((project_population(63.5, 2011, 2011) - 63.5).abs() < EPS);
    }

    #[test]
    fn projection_is_linear_in_elapsed_years() {
        assert!((project_population(100.0, 2011, 2021) - 110.0).abs() < EPS);
        assert!((project_population(100.0, 2011, 2031) - 120.0).abs() < EPS);
        assert!((project_population(63.5, 2011, 2021) - 69.85).abs() < EPS);
    }

    #[test]
    fn projection_before_base_year_shrinks() {
        assert!((project_population(100.0, 2015, 2011) - 96.0).abs() < EPS);
    }

    #[test]
    fn projection_handles_extreme_years() {
        let low = project_population(100.0, 2011, i32::MIN);
        assert!(low.is_finite() && low < 0.0);
        let high = project_population(100.0, 2011, i32::MAX);
        assert!(high.is_finite() && high > 100.0);
    }

    #[test]
    fn cases_round_up() {
        assert_eq!(estimated_cases(2.3, 10.0), 23);
        assert_eq!(estimated_cases(2.31, 10.0), 24);
        assert_eq!(estimated_cases(3.0, project_population(63.5, 2011, 2021)), 210);
    }

    #[test]
    fn cases_never_negative() {
        assert_eq!(estimated_cases(-1.5, 10.0), 0);
        assert_eq!(estimated_cases(f64::NAN, 10.0), 0);
        assert_eq!(estimated_cases(0.0, 10.0), 0);
    }
}

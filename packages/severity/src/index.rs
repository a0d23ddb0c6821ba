//! Weighted crime-severity index.

#![allow(clippy::cast_precision_loss)]

use crime_risk_crime_models::WeightedCrime;
use crime_risk_geography_models::CrimeCounts;

/// Hypothetical per-category maximum count used to normalize the index.
///
/// Districts reporting more than this in a weighted category score above
/// 100; the index is not clamped.
pub const ASSUMED_MAX_COUNT: u64 = 500;

/// Sum of `ASSUMED_MAX_COUNT * weight` over every weighted crime.
#[must_use]
pub fn max_weighted_sum() -> f64 {
    WeightedCrime::all()
        .iter()
        .map(|c| (ASSUMED_MAX_COUNT * u64::from(c.weight())) as f64)
        .sum()
}

/// Weighted sum of the counts present for weighted crimes.
///
/// Returns `None` if none of the weighted columns are present.
#[must_use]
pub fn weighted_sum(counts: &CrimeCounts) -> Option<f64> {
    let mut present = false;
    let mut sum = 0.0;

    for crime in WeightedCrime::all() {
        if let Some(count) = counts.get(crime.column()) {
            present = true;
            sum += count as f64 * f64::from(crime.weight());
        }
    }

    present.then_some(sum)
}

/// Computes the severity index of a set of crime counts, rounded to two
/// decimals.
///
/// `index = weighted_sum / max_weighted_sum * 100`. Counts without a weight
/// are ignored; counts with no weighted columns at all score `0.0`.
#[must_use]
pub fn severity_index(counts: &CrimeCounts) -> f64 {
    let max_possible = max_weighted_sum();
    if max_possible <= 0.0 {
        return 0.0;
    }

    weighted_sum(counts).map_or(0.0, |sum| round2(sum / max_possible * 100.0))
}

/// Per-column contribution to the index, in weight order.
///
/// Each entry is `(crime, count, weighted points)`; absent columns are
/// skipped. Used for the breakdown chart in the district view.
#[must_use]
pub fn contributions(counts: &CrimeCounts) -> Vec<(WeightedCrime, u64, f64)> {
    WeightedCrime::all()
        .iter()
        .filter_map(|crime| {
            counts
                .get(crime.column())
                .map(|count| (*crime, count, count as f64 * f64::from(crime.weight())))
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(count: u64) -> CrimeCounts {
        WeightedCrime::all()
            .iter()
            .map(|c| (c.column(), count))
            .collect()
    }

    #[test]
    fn ceiling_counts_score_one_hundred() {
        assert!((severity_index(&weighted(ASSUMED_MAX_COUNT)) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_counts_score_zero() {
        assert!(severity_index(&weighted(0)).abs() < f64::EPSILON);
    }

    #[test]
    fn unweighted_columns_score_zero() {
        let counts: CrimeCounts = [("theft", 9000), ("cheating", 12)].into_iter().collect();
        assert!(severity_index(&counts).abs() < f64::EPSILON);
        assert!(weighted_sum(&counts).is_none());
    }

    #[test]
    fn index_is_deterministic() {
        let counts: CrimeCounts = [("MURDER", 101), ("RAPE", 50), ("BURGLARY", 174)]
            .into_iter()
            .collect();
        let first = severity_index(&counts);
        let second = severity_index(&counts);
        assert!((first - second).abs() < f64::EPSILON);
        // (101*5 + 50*4 + 174*3) / 11000 * 100 = 11.1545... -> 11.15
        assert!((first - 11.15).abs() < 1e-9, "got {first}");
    }

    #[test]
    fn index_is_not_clamped() {
        let index = severity_index(&weighted(1000));
        assert!((index - 200.0).abs() < 1e-9, "got {index}");
    }

    #[test]
    fn max_sum_is_constant() {
        assert!((max_weighted_sum() - 11_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn contributions_skip_absent_columns() {
        let counts: CrimeCounts = [("murder", 2), ("robbery", 3)].into_iter().collect();
        let parts = contributions(&counts);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, WeightedCrime::Murder);
        assert!((parts[0].2 - 10.0).abs() < f64::EPSILON);
        assert_eq!(parts[1].0, WeightedCrime::Robbery);
        assert!((parts[1].2 - 9.0).abs() < f64::EPSILON);
    }
}

//! Weather data tests
//!
//! Daily aggregation math and observation semantics, mirroring what
//! the summary job computes in SQL.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use shared::models::{DailySummary, ObservationReading};

/// In-memory model of the daily rollup the summary job performs
fn summarize(
    date: NaiveDate,
    observations: &[(f64, f64, f64, f64, &str)],
) -> Option<DailySummary> {
    if observations.is_empty() {
        return None;
    }

    let temps: Vec<f64> = observations.iter().map(|o| o.0).collect();
    let n = observations.len() as f64;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for observation in observations {
        *counts.entry(observation.4).or_default() += 1;
    }
    let most_common = counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(description, _)| description.to_string())
        .unwrap_or_else(|| "No Data".to_string());

    Some(DailySummary {
        date,
        min_temp: temps.iter().cloned().fold(f64::INFINITY, f64::min),
        max_temp: temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        avg_temp: temps.iter().sum::<f64>() / n,
        avg_humidity: observations.iter().map(|o| o.1).sum::<f64>() / n,
        avg_wind_speed: observations.iter().map(|o| o.2).sum::<f64>() / n,
        total_precip_mm: observations.iter().map(|o| o.3).sum(),
        most_common_description: most_common,
    })
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Aggregates stay within the bounds of their inputs
    #[test]
    fn test_summary_bounds(
        temps in prop::collection::vec(-40.0f64..50.0, 1..24),
    ) {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let observations: Vec<_> = temps
            .iter()
            .map(|&t| (t, 60.0, 4.0, 0.5, "Cloudy"))
            .collect();

        let summary = summarize(date, &observations).unwrap();

        prop_assert!(summary.min_temp <= summary.avg_temp + 1e-9);
        prop_assert!(summary.avg_temp <= summary.max_temp + 1e-9);
        for &t in &temps {
            prop_assert!(summary.min_temp <= t && t <= summary.max_temp);
        }
    }

    /// Total precipitation is the sum of the day's observations
    #[test]
    fn test_precipitation_sums(
        rain in prop::collection::vec(0.0f64..30.0, 1..24),
    ) {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let observations: Vec<_> = rain
            .iter()
            .map(|&p| (15.0, 60.0, 4.0, p, "Rain"))
            .collect();

        let summary = summarize(date, &observations).unwrap();
        let expected: f64 = rain.iter().sum();
        prop_assert!((summary.total_precip_mm - expected).abs() < 1e-9);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_empty_day_has_no_summary() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    assert!(summarize(date, &[]).is_none());
}

#[test]
fn test_most_common_description_wins() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let observations = [
        (12.0, 70.0, 3.0, 0.0, "Cloudy"),
        (14.0, 65.0, 3.0, 0.0, "Sunny"),
        (16.0, 60.0, 3.0, 0.0, "Cloudy"),
    ];

    let summary = summarize(date, &observations).unwrap();
    assert_eq!(summary.most_common_description, "Cloudy");
    assert_eq!(summary.min_temp, 12.0);
    assert_eq!(summary.max_temp, 16.0);
    assert!((summary.avg_temp - 14.0).abs() < 1e-9);
}

#[test]
fn test_reading_is_plain_copyable_view() {
    let reading = ObservationReading {
        temperature: 21.0,
        humidity: 55.0,
        wind_speed: 3.2,
        precipitation_mm: 0.0,
    };
    let copy = reading;
    assert_eq!(copy, reading);
}

/// One observation per hour at most: the poller's dedup key
#[test]
fn test_hour_dedup_key() {
    use chrono::{DateTime, Timelike, Utc};

    fn dedup_key(at: DateTime<Utc>) -> (NaiveDate, u32) {
        (at.date_naive(), at.hour())
    }

    let a: DateTime<Utc> = "2025-06-01T10:05:00Z".parse().unwrap();
    let b: DateTime<Utc> = "2025-06-01T10:55:00Z".parse().unwrap();
    let c: DateTime<Utc> = "2025-06-01T11:01:00Z".parse().unwrap();

    assert_eq!(dedup_key(a), dedup_key(b));
    assert_ne!(dedup_key(b), dedup_key(c));
}

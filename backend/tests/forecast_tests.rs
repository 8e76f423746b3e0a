//! Forecast tests
//!
//! Horizon validation, description mapping, and the shape of a rolled
//! multi-day prediction.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use shared::models::{describe_temperature, DailyForecast};
use shared::validation::validate_forecast_days;

/// Build the per-day rows the way the forecast service does from a
/// sequence of predicted temperatures
fn to_daily_forecasts(last_history_date: NaiveDate, predicted: &[f64]) -> Vec<DailyForecast> {
    predicted
        .iter()
        .enumerate()
        .map(|(i, &temp)| {
            let temp = (temp * 10.0).round() / 10.0;
            DailyForecast {
                date: last_history_date + Duration::days(i as i64 + 1),
                temperature: temp,
                min_temp: ((temp - 2.0) * 10.0).round() / 10.0,
                max_temp: ((temp + 2.0) * 10.0).round() / 10.0,
                description: describe_temperature(temp).to_string(),
            }
        })
        .collect()
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Only the documented horizons are accepted
    #[test]
    fn test_only_3_5_7_accepted(days in -10i64..100) {
        let valid = matches!(days, 3 | 5 | 7);
        prop_assert_eq!(validate_forecast_days(days).is_ok(), valid);
    }

    /// Every temperature maps to exactly one description
    #[test]
    fn test_description_total(temp in -60.0f64..60.0) {
        let description = describe_temperature(temp);
        prop_assert!(!description.is_empty());
    }

    /// Forecast dates start the day after history ends and are
    /// consecutive; min/max bracket the prediction
    #[test]
    fn test_rolled_forecast_shape(
        predicted in prop::collection::vec(-30.0f64..45.0, 1..10),
    ) {
        let last = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let forecasts = to_daily_forecasts(last, &predicted);

        prop_assert_eq!(forecasts.len(), predicted.len());
        for (i, forecast) in forecasts.iter().enumerate() {
            prop_assert_eq!(forecast.date, last + Duration::days(i as i64 + 1));
            prop_assert!(forecast.min_temp <= forecast.temperature);
            prop_assert!(forecast.temperature <= forecast.max_temp);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_warmer_is_never_described_colder() {
    // The band mapping is monotone: ordering temperatures orders bands
    let bands = [
        (-5.0, "Freezing"),
        (2.0, "Snowy"),
        (7.0, "Foggy"),
        (12.0, "Overcast"),
        (17.0, "Cloudy"),
        (22.0, "Partly cloudy"),
        (27.0, "Clear"),
        (32.0, "Sunny"),
    ];

    for (temp, expected) in bands {
        assert_eq!(describe_temperature(temp), expected);
    }
}

#[test]
fn test_forecast_serialization_shape() {
    let forecast = DailyForecast {
        date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        temperature: 21.4,
        min_temp: 19.4,
        max_temp: 23.4,
        description: "Partly cloudy".to_string(),
    };

    let json = serde_json::to_value(&forecast).unwrap();
    assert_eq!(json["date"], "2025-07-01");
    assert_eq!(json["temperature"], 21.4);
    assert_eq!(json["description"], "Partly cloudy");
}

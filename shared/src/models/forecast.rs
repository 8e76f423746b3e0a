//! Forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One predicted day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub description: String,
}

/// Map a predicted temperature onto a human-readable sky description
pub fn describe_temperature(temp: f64) -> &'static str {
    if temp > 30.0 {
        "Sunny"
    } else if temp > 25.0 {
        "Clear"
    } else if temp > 20.0 {
        "Partly cloudy"
    } else if temp > 15.0 {
        "Cloudy"
    } else if temp > 10.0 {
        "Overcast"
    } else if temp > 5.0 {
        "Foggy"
    } else if temp > 0.0 {
        "Snowy"
    } else {
        "Freezing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_bands() {
        assert_eq!(describe_temperature(34.2), "Sunny");
        assert_eq!(describe_temperature(27.0), "Clear");
        assert_eq!(describe_temperature(22.5), "Partly cloudy");
        assert_eq!(describe_temperature(17.0), "Cloudy");
        assert_eq!(describe_temperature(12.0), "Overcast");
        assert_eq!(describe_temperature(7.0), "Foggy");
        assert_eq!(describe_temperature(2.0), "Snowy");
        assert_eq!(describe_temperature(-4.0), "Freezing");
    }

    #[test]
    fn test_band_edges_fall_to_colder_label() {
        assert_eq!(describe_temperature(30.0), "Clear");
        assert_eq!(describe_temperature(0.0), "Freezing");
    }
}

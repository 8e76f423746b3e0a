//! Alert threshold models and evaluation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::weather::ObservationReading;

/// User-selectable threshold conditions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    TempAbove,
    TempBelow,
    RainAbove,
    WindAbove,
    HumidityAbove,
    HumidityBelow,
}

impl AlertCondition {
    pub const ALL: [AlertCondition; 6] = [
        AlertCondition::TempAbove,
        AlertCondition::TempBelow,
        AlertCondition::RainAbove,
        AlertCondition::WindAbove,
        AlertCondition::HumidityAbove,
        AlertCondition::HumidityBelow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCondition::TempAbove => "temp_above",
            AlertCondition::TempBelow => "temp_below",
            AlertCondition::RainAbove => "rain_above",
            AlertCondition::WindAbove => "wind_above",
            AlertCondition::HumidityAbove => "humidity_above",
            AlertCondition::HumidityBelow => "humidity_below",
        }
    }

    /// Evaluate this condition against an observation. Returns the
    /// notification message when the threshold fires.
    pub fn evaluate(&self, threshold_value: f64, reading: &ObservationReading) -> Option<String> {
        match self {
            AlertCondition::TempAbove if reading.temperature > threshold_value => Some(format!(
                "Temperature is {}°C, which exceeds your threshold of {}°C",
                reading.temperature, threshold_value
            )),
            AlertCondition::TempBelow if reading.temperature < threshold_value => Some(format!(
                "Temperature is {}°C, which is below your threshold of {}°C",
                reading.temperature, threshold_value
            )),
            AlertCondition::RainAbove if reading.precipitation_mm > threshold_value => {
                Some(format!(
                    "Rainfall is {}mm, which exceeds your threshold of {}mm",
                    reading.precipitation_mm, threshold_value
                ))
            }
            AlertCondition::WindAbove if reading.wind_speed > threshold_value => Some(format!(
                "Wind speed is {}m/s, which exceeds your threshold of {}m/s",
                reading.wind_speed, threshold_value
            )),
            AlertCondition::HumidityAbove if reading.humidity > threshold_value => Some(format!(
                "Humidity is {}%, which exceeds your threshold of {}%",
                reading.humidity, threshold_value
            )),
            AlertCondition::HumidityBelow if reading.humidity < threshold_value => Some(format!(
                "Humidity is {}%, which is below your threshold of {}%",
                reading.humidity, threshold_value
            )),
            _ => None,
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown condition string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alert condition: {0}")]
pub struct UnknownCondition(pub String);

impl FromStr for AlertCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temp_above" => Ok(AlertCondition::TempAbove),
            "temp_below" => Ok(AlertCondition::TempBelow),
            "rain_above" => Ok(AlertCondition::RainAbove),
            "wind_above" => Ok(AlertCondition::WindAbove),
            "humidity_above" => Ok(AlertCondition::HumidityAbove),
            "humidity_below" => Ok(AlertCondition::HumidityBelow),
            other => Err(UnknownCondition(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, humidity: f64, wind_speed: f64, precipitation_mm: f64) -> ObservationReading {
        ObservationReading {
            temperature,
            humidity,
            wind_speed,
            precipitation_mm,
        }
    }

    #[test]
    fn test_condition_round_trip() {
        for condition in AlertCondition::ALL {
            assert_eq!(condition.as_str().parse::<AlertCondition>(), Ok(condition));
        }
    }

    #[test]
    fn test_unknown_condition_rejected() {
        assert!("snow_above".parse::<AlertCondition>().is_err());
    }

    #[test]
    fn test_temp_above_fires_only_past_threshold() {
        let hot = reading(35.0, 40.0, 3.0, 0.0);
        let mild = reading(20.0, 40.0, 3.0, 0.0);

        assert!(AlertCondition::TempAbove.evaluate(30.0, &hot).is_some());
        assert!(AlertCondition::TempAbove.evaluate(30.0, &mild).is_none());
        // Boundary is exclusive
        assert!(AlertCondition::TempAbove
            .evaluate(35.0, &hot)
            .is_none());
    }

    #[test]
    fn test_below_conditions() {
        let cold = reading(-5.0, 20.0, 1.0, 0.0);
        assert!(AlertCondition::TempBelow.evaluate(0.0, &cold).is_some());
        assert!(AlertCondition::HumidityBelow.evaluate(30.0, &cold).is_some());
        assert!(AlertCondition::HumidityBelow.evaluate(10.0, &cold).is_none());
    }

    #[test]
    fn test_message_mentions_values() {
        let wet = reading(18.0, 90.0, 2.0, 12.5);
        let message = AlertCondition::RainAbove.evaluate(10.0, &wet).unwrap();
        assert!(message.contains("12.5mm"));
        assert!(message.contains("10mm"));
    }
}

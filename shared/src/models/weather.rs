//! Weather observation models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily rollup derived from multiple point observations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
    pub total_precip_mm: f64,
    pub most_common_description: String,
}

/// The subset of an observation that alert thresholds are
/// evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationReading {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation_mm: f64,
}

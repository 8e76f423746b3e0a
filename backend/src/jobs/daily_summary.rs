//! Daily summary job
//!
//! Rolls yesterday's observations up into one aggregate row per
//! location. The upsert makes reruns idempotent.

use chrono::{Duration, Utc};

use crate::error::AppResult;
use crate::services::{LocationService, WeatherService};
use crate::AppState;

pub async fn run(state: &AppState) -> AppResult<()> {
    let yesterday = Utc::now().date_naive() - Duration::days(1);

    let location_service = LocationService::new(state.db.clone());
    let weather_service = WeatherService::new(state.db.clone());

    let locations = location_service.list_all().await?;

    for location in &locations {
        match weather_service.summarize_day(location.id, yesterday).await {
            Ok(Some(summary)) => {
                tracing::info!(
                    "Stored summary for {} on {} (avg {}°C)",
                    location.name,
                    summary.date,
                    summary.avg_temp
                );
            }
            Ok(None) => {
                tracing::warn!("No data found for {} on {}", location.name, yesterday);
            }
            Err(e) => {
                tracing::error!("Summary failed for {}: {:?}", location.name, e);
            }
        }
    }

    Ok(())
}

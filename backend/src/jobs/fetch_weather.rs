//! Weather polling job
//!
//! Fetches current conditions for every tracked location and stores an
//! observation, skipping locations that already have one for this hour.

use chrono::Utc;

use crate::error::AppResult;
use crate::external::weather::WeatherClient;
use crate::services::{LocationService, WeatherService};
use crate::AppState;

pub async fn run(state: &AppState) -> AppResult<()> {
    let location_service = LocationService::new(state.db.clone());
    let locations = location_service.list_all().await?;

    if locations.is_empty() {
        tracing::debug!("No locations to poll");
        return Ok(());
    }

    let client = WeatherClient::new(
        state.config.weather.base_url.clone(),
        state.config.weather.api_key.clone(),
    );
    let weather_service = WeatherService::with_client(state.db.clone(), client);

    let now = Utc::now();
    let mut stored = 0;

    for location in &locations {
        match weather_service
            .observation_exists_for_hour(location.id, now)
            .await
        {
            Ok(true) => {
                tracing::debug!(
                    "Weather data already exists for {} this hour, skipping",
                    location.name
                );
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Dedup check failed for {}: {:?}", location.name, e);
                continue;
            }
        }

        match weather_service.fetch_and_store(location).await {
            Ok(observation) => {
                stored += 1;
                tracing::info!(
                    "Stored weather data for {} ({}°C, {})",
                    location.name,
                    observation.temperature,
                    observation.description
                );
            }
            Err(e) => {
                tracing::error!("Failed to fetch weather for {}: {:?}", location.name, e);
            }
        }
    }

    tracing::info!("Weather poll finished: {}/{} stored", stored, locations.len());
    Ok(())
}

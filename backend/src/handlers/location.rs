//! HTTP handlers for location management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::weather::WeatherClient;
use crate::middleware::CurrentUser;
use crate::models::{Location, LocationCandidate};
use crate::services::location::{LocationWithWeather, SaveLocationInput};
use crate::services::{LocationService, WeatherService};
use crate::AppState;

/// Days of daily history seeded for a newly tracked location
const BACKFILL_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub location_query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub locations: Vec<LocationCandidate>,
}

#[derive(Debug, Serialize)]
pub struct SaveLocationResponse {
    pub message: String,
    pub location: Location,
}

/// Search locations against the upstream weather API
pub async fn search_locations(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(body): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    let query = body.location_query.trim();
    if query.is_empty() {
        return Err(AppError::ValidationError(
            "Location query is required".to_string(),
        ));
    }

    let client = WeatherClient::new(
        state.config.weather.base_url.clone(),
        state.config.weather.api_key.clone(),
    );
    let results = client.search_locations(query).await?;

    if results.is_empty() {
        return Err(AppError::NotFound("Location".to_string()));
    }

    // Candidates carry no id: nothing is saved yet
    let locations = results
        .into_iter()
        .map(|result| LocationCandidate {
            name: result.name,
            latitude: result.latitude,
            longitude: result.longitude,
        })
        .collect();

    Ok(Json(SearchResponse { locations }))
}

/// Save a searched location for the user, fetching an initial
/// observation and seeding a week of daily history
pub async fn save_location(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SaveLocationInput>,
) -> AppResult<(StatusCode, Json<SaveLocationResponse>)> {
    let location_service = LocationService::new(state.db.clone());
    let (location, created) = location_service.get_or_create(&input).await?;

    let client = WeatherClient::new(
        state.config.weather.base_url.clone(),
        state.config.weather.api_key.clone(),
    );
    let weather_service = WeatherService::with_client(state.db.clone(), client);
    weather_service.fetch_and_store(&location).await?;

    if created {
        // Seed daily aggregates so forecasts and history have something
        // to work with; failures here should not fail the save
        if let Err(e) = weather_service
            .backfill_history(&location, BACKFILL_DAYS)
            .await
        {
            tracing::warn!("History backfill failed for {}: {:?}", location.name, e);
        }
    }

    location_service
        .link_to_user(current_user.0.user_id, location.id)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SaveLocationResponse {
            message: "Location added successfully".to_string(),
            location: location.into_model(),
        }),
    ))
}

/// List all locations with their latest observation
pub async fn list_locations(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<LocationWithWeather>>> {
    let service = LocationService::new(state.db.clone());
    let locations = service.list_with_latest_weather().await?;
    Ok(Json(locations))
}

/// Delete a location
pub async fn delete_location(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = LocationService::new(state.db.clone());
    service.delete(location_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

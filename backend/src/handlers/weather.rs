//! HTTP handlers for weather data endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::weather::WeatherClient;
use crate::middleware::CurrentUser;
use crate::models::Location;
use crate::services::weather::{ChartData, DailySummaryRow, ObservationRow};
use crate::services::{LocationService, WeatherService};
use crate::AppState;
use shared::types::DateRange;

/// Fetch today's observation for a location, pulling from the upstream
/// API when nothing is stored yet
pub async fn get_weather(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<ObservationRow>> {
    let location_service = LocationService::new(state.db.clone());
    let location = location_service.get(location_id).await?;

    let client = WeatherClient::new(
        state.config.weather.base_url.clone(),
        state.config.weather.api_key.clone(),
    );
    let weather_service = WeatherService::with_client(state.db.clone(), client);
    let observation = weather_service.current_for_location(&location).await?;

    Ok(Json(observation))
}

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub location: Location,
    pub historical_data: Vec<DailySummaryRow>,
    pub chart_data: ChartData,
}

/// Daily aggregates for the user's default location over a date range
/// (defaults to the last 30 days)
pub async fn get_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<HistoryResponse>> {
    let location_service = LocationService::new(state.db.clone());
    let location = location_service
        .default_for_user(current_user.0.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

    let today = Utc::now().date_naive();
    let range = DateRange::new(
        query.start_date.unwrap_or(today - Duration::days(30)),
        query.end_date.unwrap_or(today),
    );

    if !range.is_valid() {
        return Err(AppError::ValidationError(
            "start_date must not be after end_date".to_string(),
        ));
    }

    let weather_service = WeatherService::new(state.db.clone());
    let summaries = weather_service
        .summaries_for_range(location.id, range.start, range.end)
        .await?;

    let chart_data = ChartData::from_summaries(&summaries);

    Ok(Json(HistoryResponse {
        location: location.into_model(),
        historical_data: summaries,
        chart_data,
    }))
}

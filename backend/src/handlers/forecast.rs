//! HTTP handlers for forecast endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::{ForecastService, LocationService};
use crate::AppState;
use crate::models::DailyForecast;
use shared::validation::validate_forecast_days;

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<DailyForecast>,
}

/// Multi-day temperature forecast for a location
pub async fn get_forecast(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path((location_id, days)): Path<(Uuid, i64)>,
) -> AppResult<Json<ForecastResponse>> {
    validate_forecast_days(days).map_err(|msg| AppError::ValidationError(msg.to_string()))?;

    // 404 before doing any model work
    let location_service = LocationService::new(state.db.clone());
    location_service.get(location_id).await?;

    let forecast_service = ForecastService::new(state.db.clone(), state.config.forecast.clone());
    let forecast = forecast_service
        .get_or_generate(location_id, days as usize)
        .await?;

    Ok(Json(ForecastResponse { forecast }))
}

//! Dashboard handler
//!
//! One round trip for everything the landing view needs: unread
//! notifications, the default location, the latest observation, a week
//! of daily aggregates, and the 7-day forecast.

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::alert::AlertNotificationRow;
use crate::services::weather::{DailySummaryRow, ObservationRow};
use crate::services::{AlertService, ForecastService, LocationService, WeatherService};
use crate::AppState;
use crate::models::{DailyForecast, Location};

const DASHBOARD_FORECAST_DAYS: usize = 7;
const DASHBOARD_NOTIFICATION_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub alerts: Vec<AlertNotificationRow>,
    pub location: Location,
    pub current_weather: Option<ObservationRow>,
    pub forecast_data: Vec<DailyForecast>,
    pub historical_data: Vec<DailySummaryRow>,
}

/// Aggregate dashboard endpoint
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardResponse>> {
    let user_id = current_user.0.user_id;

    let location_service = LocationService::new(state.db.clone());
    let location = location_service
        .default_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

    let alert_service = AlertService::new(state.db.clone());
    let alerts = alert_service
        .unread_notifications(user_id, DASHBOARD_NOTIFICATION_LIMIT)
        .await?;

    let weather_service = WeatherService::new(state.db.clone());
    let current_weather = weather_service.latest_observation(location.id).await?;

    let today = Utc::now().date_naive();
    let historical_data = weather_service
        .summaries_for_range(location.id, today - Duration::days(7), today)
        .await?;

    // The dashboard stays usable before enough history has accumulated
    let forecast_service = ForecastService::new(state.db.clone(), state.config.forecast.clone());
    let forecast_data = match forecast_service
        .get_or_generate(location.id, DASHBOARD_FORECAST_DAYS)
        .await
    {
        Ok(forecast) => forecast,
        Err(AppError::ValidationError(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    Ok(Json(DashboardResponse {
        alerts,
        location: location.into_model(),
        current_weather,
        forecast_data,
        historical_data,
    }))
}

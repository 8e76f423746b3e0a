//! HTTP handlers for alert threshold and notification endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alert::{AlertNotificationRow, AlertThresholdRow, CreateAlertInput};
use crate::services::{AlertService, LocationService};
use crate::AppState;
use crate::models::Location;

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub user_locations: Vec<Location>,
    pub alerts: Vec<AlertThresholdRow>,
}

#[derive(Debug, Serialize)]
pub struct AlertActionResponse {
    pub message: String,
}

/// The user's thresholds alongside their saved locations
pub async fn list_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AlertsResponse>> {
    let alert_service = AlertService::new(state.db.clone());
    let location_service = LocationService::new(state.db.clone());

    let alerts = alert_service.list_for_user(current_user.0.user_id).await?;
    let user_locations = location_service
        .list_for_user(current_user.0.user_id)
        .await?
        .into_iter()
        .map(|row| row.into_model())
        .collect();

    Ok(Json(AlertsResponse {
        user_locations,
        alerts,
    }))
}

/// Create an alert threshold
pub async fn create_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateAlertInput>,
) -> AppResult<(StatusCode, Json<AlertActionResponse>)> {
    let service = AlertService::new(state.db.clone());
    service.create_threshold(current_user.0.user_id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(AlertActionResponse {
            message: "Alert created successfully!".to_string(),
        }),
    ))
}

/// Flip a threshold's active state
pub async fn toggle_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<AlertActionResponse>> {
    let service = AlertService::new(state.db.clone());
    let is_active = service.toggle(current_user.0.user_id, alert_id).await?;

    let status_message = if is_active { "activated" } else { "deactivated" };
    Ok(Json(AlertActionResponse {
        message: format!("Alert {} successfully!", status_message),
    }))
}

/// Delete a threshold
pub async fn delete_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<AlertActionResponse>> {
    let service = AlertService::new(state.db.clone());
    service.delete(current_user.0.user_id, alert_id).await?;

    Ok(Json(AlertActionResponse {
        message: "Alert deleted successfully!".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
}

/// Mark a notification read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<MarkReadResponse>> {
    let service = AlertService::new(state.db.clone());
    service
        .mark_read(current_user.0.user_id, notification_id)
        .await?;

    Ok(Json(MarkReadResponse { success: true }))
}

/// Unread notifications for the authenticated user
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AlertNotificationRow>>> {
    let service = AlertService::new(state.db.clone());
    let notifications = service
        .unread_notifications(current_user.0.user_id, 50)
        .await?;

    Ok(Json(notifications))
}

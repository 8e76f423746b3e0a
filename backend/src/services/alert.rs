//! Alert service for thresholds and their notifications
//!
//! A threshold fires against a specific observation at most once; the
//! (threshold, weather_data) uniqueness constraint deduplicates
//! firings, not application logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::AlertCondition;
use shared::validation::validate_threshold_value;

/// Alert service
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

/// Threshold row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlertThresholdRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub condition: String,
    pub threshold_value: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Threshold joined with what the sweep needs: owner email and
/// location name
#[derive(Debug, Clone, FromRow)]
pub struct ActiveThreshold {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub condition: String,
    pub threshold_value: f64,
    pub user_email: String,
    pub location_name: String,
}

impl ActiveThreshold {
    pub fn condition(&self) -> AppResult<AlertCondition> {
        self.condition
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown stored condition: {}", self.condition)))
    }
}

/// Notification row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlertNotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub threshold_id: Uuid,
    pub weather_data_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub sent_email: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a threshold
#[derive(Debug, Deserialize)]
pub struct CreateAlertInput {
    pub location_id: Uuid,
    pub condition: String,
    pub threshold_value: f64,
}

const THRESHOLD_COLUMNS: &str =
    "id, user_id, location_id, condition, threshold_value, is_active, created_at";

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, threshold_id, weather_data_id, message, is_read, sent_email, created_at";

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a threshold for a user
    pub async fn create_threshold(
        &self,
        user_id: Uuid,
        input: CreateAlertInput,
    ) -> AppResult<AlertThresholdRow> {
        let condition: AlertCondition =
            input
                .condition
                .parse()
                .map_err(|_| AppError::Validation {
                    field: "condition".to_string(),
                    message: format!(
                        "Invalid condition. Must be one of: {}",
                        AlertCondition::ALL
                            .iter()
                            .map(|c| c.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                })?;

        validate_threshold_value(input.threshold_value).map_err(|msg| AppError::Validation {
            field: "threshold_value".to_string(),
            message: msg.to_string(),
        })?;

        let location_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)",
        )
        .bind(input.location_id)
        .fetch_one(&self.db)
        .await?;

        if !location_exists {
            return Err(AppError::NotFound("Location".to_string()));
        }

        let threshold = sqlx::query_as::<_, AlertThresholdRow>(&format!(
            r#"
            INSERT INTO alert_thresholds (user_id, location_id, condition, threshold_value)
            VALUES ($1, $2, $3, $4)
            RETURNING {THRESHOLD_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(input.location_id)
        .bind(condition.as_str())
        .bind(input.threshold_value)
        .fetch_one(&self.db)
        .await?;

        Ok(threshold)
    }

    /// Thresholds owned by a user
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<AlertThresholdRow>> {
        let thresholds = sqlx::query_as::<_, AlertThresholdRow>(&format!(
            r#"
            SELECT {THRESHOLD_COLUMNS}
            FROM alert_thresholds
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(thresholds)
    }

    /// Flip a threshold's active state, returning the new state
    pub async fn toggle(&self, user_id: Uuid, threshold_id: Uuid) -> AppResult<bool> {
        let is_active = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE alert_thresholds
            SET is_active = NOT is_active
            WHERE id = $1 AND user_id = $2
            RETURNING is_active
            "#,
        )
        .bind(threshold_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))?;

        Ok(is_active)
    }

    /// Delete a threshold
    pub async fn delete(&self, user_id: Uuid, threshold_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM alert_thresholds WHERE id = $1 AND user_id = $2")
            .bind(threshold_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Alert".to_string()));
        }

        Ok(())
    }

    /// Active thresholds across all users, joined for the sweep
    pub async fn active_thresholds(&self) -> AppResult<Vec<ActiveThreshold>> {
        let thresholds = sqlx::query_as::<_, ActiveThreshold>(
            r#"
            SELECT t.id, t.user_id, t.location_id, t.condition, t.threshold_value,
                   u.email AS user_email, l.name AS location_name
            FROM alert_thresholds t
            JOIN users u ON u.id = t.user_id
            JOIN locations l ON l.id = t.location_id
            WHERE t.is_active = true AND u.is_active = true
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(thresholds)
    }

    /// Record a firing. Returns None when this (threshold, observation)
    /// pair already fired.
    pub async fn record_notification(
        &self,
        threshold: &ActiveThreshold,
        weather_data_id: Uuid,
        message: &str,
    ) -> AppResult<Option<AlertNotificationRow>> {
        let notification = sqlx::query_as::<_, AlertNotificationRow>(&format!(
            r#"
            INSERT INTO alert_notifications (user_id, threshold_id, weather_data_id, message)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (threshold_id, weather_data_id) DO NOTHING
            RETURNING {NOTIFICATION_COLUMNS}
            "#,
        ))
        .bind(threshold.user_id)
        .bind(threshold.id)
        .bind(weather_data_id)
        .bind(message)
        .fetch_optional(&self.db)
        .await?;

        Ok(notification)
    }

    /// Mark that the notification email went out
    pub async fn mark_email_sent(&self, notification_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE alert_notifications SET sent_email = true WHERE id = $1")
            .bind(notification_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Unread notifications for a user, newest first
    pub async fn unread_notifications(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<AlertNotificationRow>> {
        let notifications = sqlx::query_as::<_, AlertNotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM alert_notifications
            WHERE user_id = $1 AND is_read = false
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(notifications)
    }

    /// Mark a notification read
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE alert_notifications SET is_read = true WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }

        Ok(())
    }
}

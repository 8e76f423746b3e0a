//! Location management service
//!
//! Locations are shared rows; users link to them through
//! user_locations, with the first link becoming the default.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::weather::ObservationRow;
use shared::models::Location;
use shared::validation::validate_coordinates;

/// Location service
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

/// Location row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub created_at: DateTime<Utc>,
}

impl LocationRow {
    pub fn into_model(self) -> Location {
        Location {
            id: self.id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Input for saving a searched location
#[derive(Debug, Deserialize)]
pub struct SaveLocationInput {
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// A location with its most recent observation embedded
#[derive(Debug, Serialize)]
pub struct LocationWithWeather {
    #[serde(flatten)]
    pub location: Location,
    pub latest_weather: Option<ObservationRow>,
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Find a location by name, creating it when missing.
    /// Returns the row and whether it was created.
    pub async fn get_or_create(&self, input: &SaveLocationInput) -> AppResult<(LocationRow, bool)> {
        if input.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Missing location details".to_string(),
            ));
        }
        validate_coordinates(input.latitude, input.longitude).map_err(|msg| {
            AppError::Validation {
                field: "coordinates".to_string(),
                message: msg.to_string(),
            }
        })?;

        if let Some(existing) = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, latitude, longitude, created_at FROM locations WHERE name = $1",
        )
        .bind(&input.name)
        .fetch_optional(&self.db)
        .await?
        {
            return Ok((existing, false));
        }

        let created = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations (name, latitude, longitude)
            VALUES ($1, $2, $3)
            RETURNING id, name, latitude, longitude, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(&self.db)
        .await?;

        Ok((created, true))
    }

    /// Link a location to a user. The user's first location becomes the
    /// default. Linking twice is a no-op.
    pub async fn link_to_user(&self, user_id: Uuid, location_id: Uuid) -> AppResult<()> {
        let has_default = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_locations WHERE user_id = $1 AND is_default = true)",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_locations (user_id, location_id, is_default)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, location_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(location_id)
        .bind(!has_default)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Get a location by ID
    pub async fn get(&self, location_id: Uuid) -> AppResult<LocationRow> {
        sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, latitude, longitude, created_at FROM locations WHERE id = $1",
        )
        .bind(location_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    /// All tracked locations (jobs iterate over this)
    pub async fn list_all(&self) -> AppResult<Vec<LocationRow>> {
        let locations = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, latitude, longitude, created_at FROM locations ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(locations)
    }

    /// All locations with their latest observation embedded
    pub async fn list_with_latest_weather(&self) -> AppResult<Vec<LocationWithWeather>> {
        let locations = self.list_all().await?;

        let mut result = Vec::with_capacity(locations.len());
        for location in locations {
            let latest = sqlx::query_as::<_, ObservationRow>(
                r#"
                SELECT id, location_id, timestamp, temperature, feels_like, humidity, pressure,
                       wind_speed, wind_direction, precipitation_mm, cloud_coverage, uv_index,
                       description, icon_url, created_at
                FROM weather_data
                WHERE location_id = $1
                ORDER BY timestamp DESC
                LIMIT 1
                "#,
            )
            .bind(location.id)
            .fetch_optional(&self.db)
            .await?;

            result.push(LocationWithWeather {
                location: location.into_model(),
                latest_weather: latest,
            });
        }

        Ok(result)
    }

    /// Delete a location
    pub async fn delete(&self, location_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(location_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Location".to_string()));
        }

        Ok(())
    }

    /// The user's default location, falling back to the earliest saved one
    pub async fn default_for_user(&self, user_id: Uuid) -> AppResult<Option<LocationRow>> {
        let location = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT l.id, l.name, l.latitude, l.longitude, l.created_at
            FROM user_locations ul
            JOIN locations l ON l.id = ul.location_id
            WHERE ul.user_id = $1
            ORDER BY ul.is_default DESC, ul.created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(location)
    }

    /// Locations the user has saved
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<LocationRow>> {
        let locations = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT l.id, l.name, l.latitude, l.longitude, l.created_at
            FROM user_locations ul
            JOIN locations l ON l.id = ul.location_id
            WHERE ul.user_id = $1
            ORDER BY ul.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(locations)
    }
}

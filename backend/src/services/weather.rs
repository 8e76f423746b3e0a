//! Weather service for storing and retrieving observations and
//! daily aggregates

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::weather::{CurrentConditions, HistoryDay, WeatherClient};
use crate::services::location::LocationRow;
use shared::models::ObservationReading;

/// Weather service for managing observations and summaries
#[derive(Clone)]
pub struct WeatherService {
    db: PgPool,
    weather_client: Option<WeatherClient>,
}

/// Point-in-time observation row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ObservationRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub precipitation_mm: f64,
    pub cloud_coverage: i32,
    pub uv_index: Option<f64>,
    pub description: String,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ObservationRow {
    pub fn reading(&self) -> ObservationReading {
        ObservationReading {
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            precipitation_mm: self.precipitation_mm,
        }
    }
}

/// Daily aggregate row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailySummaryRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
    pub total_precip_mm: f64,
    pub uv_index: f64,
    pub total_snow_cm: f64,
    pub most_common_description: String,
}

const OBSERVATION_COLUMNS: &str = "id, location_id, timestamp, temperature, feels_like, humidity, \
     pressure, wind_speed, wind_direction, precipitation_mm, cloud_coverage, uv_index, \
     description, icon_url, created_at";

const SUMMARY_COLUMNS: &str = "id, location_id, date, min_temp, max_temp, avg_temp, avg_humidity, \
     avg_wind_speed, total_precip_mm, uv_index, total_snow_cm, most_common_description";

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            weather_client: None,
        }
    }

    /// Create a new WeatherService with an upstream API client
    pub fn with_client(db: PgPool, client: WeatherClient) -> Self {
        Self {
            db,
            weather_client: Some(client),
        }
    }

    /// Store an observation fetched from the upstream API
    pub async fn store_observation(
        &self,
        location_id: Uuid,
        conditions: &CurrentConditions,
        timestamp: DateTime<Utc>,
    ) -> AppResult<ObservationRow> {
        let observation = sqlx::query_as::<_, ObservationRow>(&format!(
            r#"
            INSERT INTO weather_data (
                location_id, timestamp, temperature, feels_like, humidity, pressure,
                wind_speed, wind_direction, precipitation_mm, cloud_coverage, uv_index,
                description, icon_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {OBSERVATION_COLUMNS}
            "#,
        ))
        .bind(location_id)
        .bind(timestamp)
        .bind(conditions.temperature)
        .bind(conditions.feels_like)
        .bind(conditions.humidity)
        .bind(conditions.pressure)
        .bind(conditions.wind_speed)
        .bind(&conditions.wind_direction)
        .bind(conditions.precipitation_mm)
        .bind(conditions.cloud_coverage)
        .bind(conditions.uv_index)
        .bind(&conditions.description)
        .bind(&conditions.icon_url)
        .fetch_one(&self.db)
        .await?;

        Ok(observation)
    }

    /// Today's stored observation if one exists, otherwise fetch from
    /// the upstream API, persist, and return it
    pub async fn current_for_location(&self, location: &LocationRow) -> AppResult<ObservationRow> {
        let today = Utc::now().date_naive();
        let existing = sqlx::query_as::<_, ObservationRow>(&format!(
            r#"
            SELECT {OBSERVATION_COLUMNS}
            FROM weather_data
            WHERE location_id = $1 AND timestamp::date = $2
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        ))
        .bind(location.id)
        .bind(today)
        .fetch_optional(&self.db)
        .await?;

        if let Some(observation) = existing {
            return Ok(observation);
        }

        self.fetch_and_store(location).await
    }

    /// Fetch current conditions from the upstream API and persist them
    pub async fn fetch_and_store(&self, location: &LocationRow) -> AppResult<ObservationRow> {
        let client = self.client()?;
        let conditions = client
            .get_current(location.latitude, location.longitude)
            .await?;

        self.store_observation(location.id, &conditions, Utc::now())
            .await
    }

    /// Latest observation for a location
    pub async fn latest_observation(&self, location_id: Uuid) -> AppResult<Option<ObservationRow>> {
        let observation = sqlx::query_as::<_, ObservationRow>(&format!(
            r#"
            SELECT {OBSERVATION_COLUMNS}
            FROM weather_data
            WHERE location_id = $1
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        ))
        .bind(location_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(observation)
    }

    /// Whether an observation already exists for the given hour.
    /// The poller uses this to avoid duplicate rows per cycle.
    pub async fn observation_exists_for_hour(
        &self,
        location_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM weather_data
                WHERE location_id = $1
                  AND timestamp::date = $2
                  AND EXTRACT(HOUR FROM timestamp) = $3
            )
            "#,
        )
        .bind(location_id)
        .bind(at.date_naive())
        .bind(at.hour() as i32)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// Daily aggregates for a date range, oldest first
    pub async fn summaries_for_range(
        &self,
        location_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailySummaryRow>> {
        let summaries = sqlx::query_as::<_, DailySummaryRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM historical_weather_data
            WHERE location_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        ))
        .bind(location_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(summaries)
    }

    /// Aggregate one day of observations into a daily summary row.
    /// Returns None when the day has no observations. The upsert relies
    /// on the (location_id, date) uniqueness constraint.
    pub async fn summarize_day(
        &self,
        location_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailySummaryRow>> {
        let aggregates = sqlx::query_as::<_, (Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>)>(
            r#"
            SELECT MIN(temperature), MAX(temperature), AVG(temperature),
                   AVG(humidity), AVG(wind_speed), SUM(precipitation_mm), AVG(uv_index)
            FROM weather_data
            WHERE location_id = $1 AND timestamp::date = $2
            "#,
        )
        .bind(location_id)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        let (min_temp, max_temp, avg_temp, avg_humidity, avg_wind_speed, total_precip, avg_uv) =
            aggregates;

        let (Some(min_temp), Some(max_temp), Some(avg_temp)) = (min_temp, max_temp, avg_temp)
        else {
            return Ok(None);
        };

        let description = sqlx::query_scalar::<_, String>(
            r#"
            SELECT description
            FROM weather_data
            WHERE location_id = $1 AND timestamp::date = $2
            GROUP BY description
            ORDER BY COUNT(*) DESC
            LIMIT 1
            "#,
        )
        .bind(location_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?
        .unwrap_or_else(|| "No Data".to_string());

        let summary = sqlx::query_as::<_, DailySummaryRow>(&format!(
            r#"
            INSERT INTO historical_weather_data (
                location_id, date, min_temp, max_temp, avg_temp, avg_humidity,
                avg_wind_speed, total_precip_mm, uv_index, most_common_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (location_id, date) DO UPDATE SET
                min_temp = EXCLUDED.min_temp,
                max_temp = EXCLUDED.max_temp,
                avg_temp = EXCLUDED.avg_temp,
                avg_humidity = EXCLUDED.avg_humidity,
                avg_wind_speed = EXCLUDED.avg_wind_speed,
                total_precip_mm = EXCLUDED.total_precip_mm,
                uv_index = EXCLUDED.uv_index,
                most_common_description = EXCLUDED.most_common_description
            RETURNING {SUMMARY_COLUMNS}
            "#,
        ))
        .bind(location_id)
        .bind(date)
        .bind(min_temp)
        .bind(max_temp)
        .bind(avg_temp)
        .bind(avg_humidity.unwrap_or(0.0))
        .bind(avg_wind_speed.unwrap_or(0.0))
        .bind(total_precip.unwrap_or(0.0))
        .bind(avg_uv.unwrap_or(0.0))
        .bind(&description)
        .fetch_one(&self.db)
        .await?;

        Ok(Some(summary))
    }

    /// Backfill daily aggregates from the upstream bulk history endpoint
    pub async fn backfill_history(
        &self,
        location: &LocationRow,
        days: i64,
    ) -> AppResult<usize> {
        let client = self.client()?;

        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(days - 1);

        let history = client
            .get_history(location.latitude, location.longitude, start, end)
            .await?;

        let mut stored = 0;
        for day in &history {
            self.upsert_history_day(location.id, day).await?;
            stored += 1;
        }

        Ok(stored)
    }

    async fn upsert_history_day(&self, location_id: Uuid, day: &HistoryDay) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO historical_weather_data (
                location_id, date, min_temp, max_temp, avg_temp, avg_humidity,
                avg_wind_speed, total_precip_mm, uv_index, total_snow_cm,
                most_common_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (location_id, date) DO NOTHING
            "#,
        )
        .bind(location_id)
        .bind(day.date)
        .bind(day.min_temp)
        .bind(day.max_temp)
        .bind(day.avg_temp)
        .bind(day.avg_humidity)
        .bind(day.avg_wind_speed)
        .bind(day.total_precip_mm)
        .bind(day.uv_index)
        .bind(day.total_snow_cm)
        .bind(&day.description)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    fn client(&self) -> AppResult<&WeatherClient> {
        self.weather_client
            .as_ref()
            .ok_or_else(|| AppError::Configuration("Weather API client not configured".to_string()))
    }
}

/// Chart-ready series derived from daily summaries
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub dates: Vec<String>,
    pub temperatures: Vec<f64>,
    pub humidity: Vec<f64>,
    pub wind_speed: Vec<f64>,
    pub description: Vec<String>,
}

impl ChartData {
    pub fn from_summaries(summaries: &[DailySummaryRow]) -> Self {
        Self {
            dates: summaries
                .iter()
                .map(|s| format!("{} {:02}", month_abbr(s.date.month()), s.date.day()))
                .collect(),
            temperatures: summaries.iter().map(|s| s.avg_temp).collect(),
            humidity: summaries.iter().map(|s| s.avg_humidity).collect(),
            wind_speed: summaries.iter().map(|s| s.avg_wind_speed).collect(),
            description: summaries
                .iter()
                .map(|s| s.most_common_description.clone())
                .collect(),
        }
    }
}

fn month_abbr(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(date: NaiveDate, avg_temp: f64) -> DailySummaryRow {
        DailySummaryRow {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            date,
            min_temp: avg_temp - 3.0,
            max_temp: avg_temp + 3.0,
            avg_temp,
            avg_humidity: 60.0,
            avg_wind_speed: 4.0,
            total_precip_mm: 0.0,
            uv_index: 3.0,
            total_snow_cm: 0.0,
            most_common_description: "Clear".to_string(),
        }
    }

    #[test]
    fn test_chart_data_labels() {
        let summaries = vec![
            summary(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(), 12.0),
            summary(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(), 14.0),
        ];

        let chart = ChartData::from_summaries(&summaries);
        assert_eq!(chart.dates, vec!["Mar 04", "Mar 05"]);
        assert_eq!(chart.temperatures, vec![12.0, 14.0]);
        assert_eq!(chart.description.len(), 2);
    }
}

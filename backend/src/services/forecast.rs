//! Forecast service
//!
//! Thin orchestration around a third-party sequence model: the
//! location's daily aggregates become a scaled feature window, the
//! model is fitted on sliding windows of that history, and the
//! multi-day prediction is rolled forward one day at a time by
//! rotating each prediction back into the input window.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use ndarray::{arr2, Array2};
use rust_lstm::loss::MSELoss;
use rust_lstm::models::lstm_network::LSTMNetwork;
use rust_lstm::optimizers::Adam;
use rust_lstm::training::{LSTMTrainer, TrainingConfig};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::ForecastConfig;
use crate::error::{AppError, AppResult};
use shared::models::{describe_temperature, DailyForecast};

/// Features fed to the model, in order: avg temp, avg humidity,
/// avg wind speed, total precipitation
const FEATURES: usize = 4;

/// Fraction of sequences held out for validation during fitting
const VALIDATION_SPLIT: f64 = 0.1;

/// Forecast service
#[derive(Clone)]
pub struct ForecastService {
    db: PgPool,
    settings: ForecastConfig,
}

/// Persisted forecast row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ForecastRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub forecast_date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl ForecastRow {
    pub fn into_model(self) -> DailyForecast {
        DailyForecast {
            date: self.forecast_date,
            temperature: self.avg_temp,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            description: self.description,
        }
    }
}

#[derive(Debug, FromRow)]
struct HistoryFeatureRow {
    date: NaiveDate,
    avg_temp: f64,
    avg_humidity: f64,
    avg_wind_speed: f64,
    total_precip_mm: f64,
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(db: PgPool, settings: ForecastConfig) -> Self {
        Self { db, settings }
    }

    /// Return a fresh persisted forecast when one exists, otherwise fit
    /// the model and generate a new one
    pub async fn get_or_generate(
        &self,
        location_id: Uuid,
        days: usize,
    ) -> AppResult<Vec<DailyForecast>> {
        if let Some(cached) = self.cached_forecast(location_id, days).await? {
            return Ok(cached);
        }
        self.generate(location_id, days).await
    }

    /// Persisted forecast rows that are still fresh and cover the
    /// requested horizon
    pub async fn cached_forecast(
        &self,
        location_id: Uuid,
        days: usize,
    ) -> AppResult<Option<Vec<DailyForecast>>> {
        let today = Utc::now().date_naive();
        let stale_before = Utc::now() - Duration::seconds(self.settings.cache_ttl_secs);

        let rows = sqlx::query_as::<_, ForecastRow>(
            r#"
            SELECT id, location_id, forecast_date, min_temp, max_temp, avg_temp,
                   description, created_at
            FROM weather_forecasts
            WHERE location_id = $1
              AND forecast_date > $2
              AND created_at > $3
            ORDER BY forecast_date ASC
            "#,
        )
        .bind(location_id)
        .bind(today)
        .bind(stale_before)
        .fetch_all(&self.db)
        .await?;

        if rows.len() < days {
            return Ok(None);
        }

        Ok(Some(
            rows.into_iter()
                .take(days)
                .map(ForecastRow::into_model)
                .collect(),
        ))
    }

    /// Fit the sequence model on the location's history and roll a
    /// multi-day temperature forecast forward
    pub async fn generate(&self, location_id: Uuid, days: usize) -> AppResult<Vec<DailyForecast>> {
        let history = sqlx::query_as::<_, HistoryFeatureRow>(
            r#"
            SELECT date, avg_temp, avg_humidity, avg_wind_speed, total_precip_mm
            FROM historical_weather_data
            WHERE location_id = $1
            ORDER BY date ASC
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.db)
        .await?;

        // At least one full training window plus its next-day target
        if history.len() <= self.settings.sequence_length {
            return Err(AppError::ValidationError(
                "Insufficient historical data to generate forecast".to_string(),
            ));
        }

        let last_date = history[history.len() - 1].date;
        let rows: Vec<[f64; FEATURES]> = history
            .iter()
            .map(|row| {
                [
                    row.avg_temp,
                    row.avg_humidity,
                    row.avg_wind_speed,
                    row.total_precip_mm,
                ]
            })
            .collect();

        let predicted = self.roll_forecast(&rows, days);

        let forecasts: Vec<DailyForecast> = predicted
            .into_iter()
            .enumerate()
            .map(|(i, temp)| {
                let temp = round1(temp);
                DailyForecast {
                    date: last_date + Duration::days(i as i64 + 1),
                    temperature: temp,
                    min_temp: round1(temp - 2.0),
                    max_temp: round1(temp + 2.0),
                    description: describe_temperature(temp).to_string(),
                }
            })
            .collect();

        self.persist(location_id, &forecasts).await?;

        Ok(forecasts)
    }

    /// Fit on the scaled history and predict `days` temperatures,
    /// rotating each prediction into the input window
    fn roll_forecast(&self, rows: &[[f64; FEATURES]], days: usize) -> Vec<f64> {
        let scalers = fit_scalers(rows);
        let scaled: Vec<[f64; FEATURES]> =
            rows.iter().map(|row| scale_row(row, &scalers)).collect();

        let sequences = build_sequences(&scaled, self.settings.sequence_length);

        let network = LSTMNetwork::new(FEATURES, self.settings.hidden_size, 2);
        let mut trainer = LSTMTrainer::new(network, MSELoss, Adam::new(0.001));

        let mut training = TrainingConfig::default();
        training.epochs = self.settings.epochs;
        training.print_every = self.settings.epochs;
        trainer = trainer.with_config(training);

        let split = ((sequences.len() as f64) * (1.0 - VALIDATION_SPLIT)) as usize;
        let (train_data, val_data) = sequences.split_at(split.max(1).min(sequences.len()));
        if val_data.is_empty() {
            trainer.train(train_data, None);
        } else {
            trainer.train(train_data, Some(val_data));
        }

        let mut window: Vec<[f64; FEATURES]> =
            scaled[scaled.len() - self.settings.sequence_length..].to_vec();
        let mut predictions = Vec::with_capacity(days);

        for _ in 0..days {
            let inputs: Vec<Array2<f64>> = window.iter().map(to_column).collect();
            let outputs = trainer.predict(&inputs);
            let scaled_temp = outputs
                .last()
                .map(|output| output[[0, 0]])
                .unwrap_or_else(|| window[window.len() - 1][0]);

            predictions.push(denormalize(scaled_temp, scalers[0]));
            window = rotate_window(&window, scaled_temp);
        }

        predictions
    }

    /// Replace the location's persisted forecast with the new run
    async fn persist(&self, location_id: Uuid, forecasts: &[DailyForecast]) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM weather_forecasts WHERE location_id = $1")
            .bind(location_id)
            .execute(&mut *tx)
            .await?;

        for forecast in forecasts {
            sqlx::query(
                r#"
                INSERT INTO weather_forecasts (
                    location_id, forecast_date, min_temp, max_temp, avg_temp, description
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(location_id)
            .bind(forecast.date)
            .bind(forecast.min_temp)
            .bind(forecast.max_temp)
            .bind(forecast.temperature)
            .bind(&forecast.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Per-feature (min, max) with a 1% margin so unseen values near the
/// edges still scale into range
fn fit_scalers(rows: &[[f64; FEATURES]]) -> [(f64, f64); FEATURES] {
    let mut scalers = [(f64::INFINITY, f64::NEG_INFINITY); FEATURES];

    for row in rows {
        for (i, &value) in row.iter().enumerate() {
            scalers[i].0 = scalers[i].0.min(value);
            scalers[i].1 = scalers[i].1.max(value);
        }
    }

    for scaler in &mut scalers {
        let range = scaler.1 - scaler.0;
        scaler.0 -= range * 0.01;
        scaler.1 += range * 0.01;
    }

    scalers
}

fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

fn denormalize(value: f64, (min, max): (f64, f64)) -> f64 {
    value * (max - min) + min
}

fn scale_row(row: &[f64; FEATURES], scalers: &[(f64, f64); FEATURES]) -> [f64; FEATURES] {
    let mut scaled = [0.0; FEATURES];
    for i in 0..FEATURES {
        scaled[i] = normalize(row[i], scalers[i]);
    }
    scaled
}

fn to_column(row: &[f64; FEATURES]) -> Array2<f64> {
    Array2::from_shape_vec((FEATURES, 1), row.to_vec()).expect("row has FEATURES values")
}

/// Sliding windows over the scaled history; the target at each step is
/// the next day's (scaled) temperature
fn build_sequences(
    scaled: &[[f64; FEATURES]],
    sequence_length: usize,
) -> Vec<(Vec<Array2<f64>>, Vec<Array2<f64>>)> {
    let mut sequences = Vec::new();

    for start in 0..scaled.len().saturating_sub(sequence_length) {
        let mut inputs = Vec::with_capacity(sequence_length);
        let mut targets = Vec::with_capacity(sequence_length);

        for step in start..start + sequence_length {
            inputs.push(to_column(&scaled[step]));
            targets.push(arr2(&[[scaled[step + 1][0]]]));
        }

        sequences.push((inputs, targets));
    }

    sequences
}

/// Drop the oldest row and append the last row with its temperature
/// replaced by the prediction
fn rotate_window(window: &[[f64; FEATURES]], predicted_temp: f64) -> Vec<[f64; FEATURES]> {
    let mut next = window[1..].to_vec();
    let mut tail = window[window.len() - 1];
    tail[0] = predicted_temp;
    next.push(tail);
    next
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<[f64; FEATURES]> {
        (0..n)
            .map(|i| {
                let temp = 10.0 + (i as f64 % 10.0);
                [temp, 50.0 + (i as f64 % 20.0), 3.0, (i % 3) as f64]
            })
            .collect()
    }

    #[test]
    fn test_scalers_cover_data_with_margin() {
        let data = rows(40);
        let scalers = fit_scalers(&data);

        for row in &data {
            let scaled = scale_row(row, &scalers);
            for value in scaled {
                assert!((0.0..=1.0).contains(&value), "scaled value {value} out of range");
            }
        }
    }

    #[test]
    fn test_normalize_round_trip() {
        let scaler = (5.0, 25.0);
        let value = 18.3;
        let back = denormalize(normalize(value, scaler), scaler);
        assert!((back - value).abs() < 1e-9);
    }

    #[test]
    fn test_constant_feature_scales_to_zero() {
        let scaler = (3.0, 3.0);
        assert_eq!(normalize(3.0, scaler), 0.0);
    }

    #[test]
    fn test_build_sequences_shapes() {
        let data = rows(40);
        let scalers = fit_scalers(&data);
        let scaled: Vec<_> = data.iter().map(|r| scale_row(r, &scalers)).collect();

        let sequences = build_sequences(&scaled, 30);
        assert_eq!(sequences.len(), 10);

        for (inputs, targets) in &sequences {
            assert_eq!(inputs.len(), 30);
            assert_eq!(targets.len(), 30);
            assert_eq!(inputs[0].shape(), &[FEATURES, 1]);
            assert_eq!(targets[0].shape(), &[1, 1]);
        }
    }

    #[test]
    fn test_sequence_targets_are_next_day_temperature() {
        let data = rows(35);
        let scalers = fit_scalers(&data);
        let scaled: Vec<_> = data.iter().map(|r| scale_row(r, &scalers)).collect();

        let sequences = build_sequences(&scaled, 30);
        let (inputs, targets) = &sequences[0];
        // Target at step 0 is the temperature of row 1, which is also
        // the first feature of input step 1
        assert!((targets[0][[0, 0]] - inputs[1][[0, 0]]).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_window_keeps_length_and_injects_prediction() {
        let data = rows(30);
        let rotated = rotate_window(&data, 0.42);

        assert_eq!(rotated.len(), 30);
        assert_eq!(rotated[0], data[1]);
        assert_eq!(rotated[29][0], 0.42);
        // Non-temperature features carry over from the last row
        assert_eq!(rotated[29][1], data[29][1]);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(18.347), 18.3);
        assert_eq!(round1(21.96), 22.0);
    }
}

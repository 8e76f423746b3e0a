//! Alert evaluation job
//!
//! Evaluates every active threshold against the latest observation for
//! its location. The (threshold, weather_data) uniqueness constraint
//! keeps a threshold from firing twice on the same observation; email
//! failures are logged and never block the sweep.

use crate::error::AppResult;
use crate::external::mailer::MailClient;
use crate::services::{AlertService, WeatherService};
use crate::AppState;

pub async fn run(state: &AppState) -> AppResult<()> {
    let alert_service = AlertService::new(state.db.clone());
    let weather_service = WeatherService::new(state.db.clone());
    let mailer = MailClient::new(&state.config.mail);

    let thresholds = alert_service.active_thresholds().await?;
    if thresholds.is_empty() {
        return Ok(());
    }

    let mut fired = 0;

    for threshold in &thresholds {
        let observation = match weather_service.latest_observation(threshold.location_id).await {
            Ok(Some(observation)) => observation,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(
                    "Could not load latest observation for {}: {:?}",
                    threshold.location_name,
                    e
                );
                continue;
            }
        };

        let condition = match threshold.condition() {
            Ok(condition) => condition,
            Err(e) => {
                tracing::error!("Skipping threshold {}: {:?}", threshold.id, e);
                continue;
            }
        };

        let Some(message) = condition.evaluate(threshold.threshold_value, &observation.reading())
        else {
            continue;
        };

        let notification = match alert_service
            .record_notification(threshold, observation.id, &message)
            .await
        {
            Ok(Some(notification)) => notification,
            // Already fired for this observation
            Ok(None) => continue,
            Err(e) => {
                tracing::error!("Failed to record notification: {:?}", e);
                continue;
            }
        };

        fired += 1;

        let subject = format!("Weather Alert for {}", threshold.location_name);
        match mailer.send(&threshold.user_email, &subject, &message).await {
            Ok(()) => {
                if let Err(e) = alert_service.mark_email_sent(notification.id).await {
                    tracing::error!("Failed to flag sent email: {:?}", e);
                }
            }
            Err(e) => {
                tracing::warn!("Alert email to {} failed: {:?}", threshold.user_email, e);
            }
        }
    }

    if fired > 0 {
        tracing::info!("Alert sweep fired {} notification(s)", fired);
    }

    Ok(())
}

//! Periodic background jobs
//!
//! Each job is an independent tokio task on its own interval; a failed
//! run is logged and the next tick tries again. Outbound HTTP inside
//! the jobs goes through the retrying weather client.

pub mod check_alerts;
pub mod daily_summary;
pub mod fetch_weather;

use std::time::Duration;

use tokio::time::interval;

use crate::AppState;

/// Spawn all periodic jobs for this process
pub fn spawn_all(state: AppState) {
    if !state.config.jobs.enabled {
        tracing::info!("Background jobs disabled");
        return;
    }

    let fetch_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(
            fetch_state.config.jobs.fetch_interval_secs,
        ));
        loop {
            ticker.tick().await;
            if let Err(e) = fetch_weather::run(&fetch_state).await {
                tracing::error!("fetch-weather job failed: {:?}", e);
            }
        }
    });

    let summary_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(
            summary_state.config.jobs.summary_interval_secs,
        ));
        loop {
            ticker.tick().await;
            if let Err(e) = daily_summary::run(&summary_state).await {
                tracing::error!("daily-summary job failed: {:?}", e);
            }
        }
    });

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(state.config.jobs.alert_interval_secs));
        loop {
            ticker.tick().await;
            if let Err(e) = check_alerts::run(&state).await {
                tracing::error!("check-alerts job failed: {:?}", e);
            }
        }
    });

    tracing::info!("Background jobs started");
}

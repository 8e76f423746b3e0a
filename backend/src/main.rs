//! Skywatch - Weather Tracking Backend Server
//!
//! Lets users register locations, polls an upstream weather API on a
//! schedule, aggregates daily summaries, serves short-term forecasts,
//! and fires threshold-based alert notifications.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod jobs;
mod middleware;
mod models;
mod routes;
mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::Config::load()?;
    tracing::info!("Starting Skywatch server ({})", config.environment);

    let db_pool = connect_db(&config.database).await?;
    tracing::info!("Database connection established");

    // Migrations run automatically in development only; production
    // deploys them explicitly
    if config.environment == "development" {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
    }

    let state = AppState {
        db: db_pool,
        config: Arc::new(config),
    };

    // Periodic jobs: weather polling, daily summaries, alert sweeps
    jobs::spawn_all(state.clone());

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    )
    .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_app(state)).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skywatch_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn connect_db(settings: &config::DatabaseConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&settings.url)
        .await?;

    Ok(pool)
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Skywatch Weather Tracker API v1.0"
}

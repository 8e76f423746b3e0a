//! Configuration management for the Skywatch weather tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SKYWATCH_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Upstream weather API configuration
    pub weather: WeatherConfig,

    /// Outbound mail configuration
    pub mail: MailConfig,

    /// Background job configuration
    pub jobs: JobsConfig,

    /// Forecast model configuration
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Base URL of the web frontend, used when building password
    /// reset links
    pub frontend_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,

    /// Password reset token expiration in seconds
    pub reset_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API base URL
    pub base_url: String,

    /// Weather API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Mail provider HTTP endpoint
    pub api_endpoint: String,

    /// Mail provider API key
    pub api_key: String,

    /// From address for outgoing mail
    pub from_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    /// Whether background jobs run in this process
    pub enabled: bool,

    /// Seconds between weather polls
    pub fetch_interval_secs: u64,

    /// Seconds between daily summary runs
    pub summary_interval_secs: u64,

    /// Seconds between alert evaluation runs
    pub alert_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Days of history fed into the model window
    pub sequence_length: usize,

    /// Hidden units in the sequence model
    pub hidden_size: usize,

    /// Training epochs per fit
    pub epochs: usize,

    /// Seconds a persisted forecast stays fresh
    pub cache_ttl_secs: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SKYWATCH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.frontend_url", "http://localhost:5173")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("jwt.reset_token_expiry", 3600)?
            .set_default("weather.base_url", "http://api.weatherapi.com/v1")?
            .set_default("mail.api_endpoint", "https://api.mailprovider.example/v1/send")?
            .set_default("mail.from_address", "alerts@skywatch.example")?
            .set_default("jobs.enabled", true)?
            .set_default("jobs.fetch_interval_secs", 3600)?
            .set_default("jobs.summary_interval_secs", 21600)?
            .set_default("jobs.alert_interval_secs", 900)?
            .set_default("forecast.sequence_length", 30)?
            .set_default("forecast.hidden_size", 32)?
            .set_default("forecast.epochs", 20)?
            .set_default("forecast.cache_ttl_secs", 10800)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SKYWATCH_ prefix)
            .add_source(
                Environment::with_prefix("SKYWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

//! Business logic services

pub mod alert;
pub mod auth;
pub mod forecast;
pub mod location;
pub mod weather;

pub use alert::AlertService;
pub use auth::AuthService;
pub use forecast::ForecastService;
pub use location::LocationService;
pub use weather::WeatherService;

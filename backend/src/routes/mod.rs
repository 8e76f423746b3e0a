//! Route definitions for the Skywatch weather tracker

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public + protected change-password)
        .nest("/auth", auth_routes())
        // Protected routes - profile
        .nest("/profile", profile_routes())
        // Protected routes - dashboard
        .route(
            "/dashboard",
            get(handlers::get_dashboard).route_layer(middleware::from_fn(auth_middleware)),
        )
        // Protected routes - locations
        .nest("/locations", location_routes())
        // Protected routes - weather data and history
        .nest("/weather", weather_routes())
        .route(
            "/history",
            get(handlers::get_history).route_layer(middleware::from_fn(auth_middleware)),
        )
        // Protected routes - forecasts
        .route(
            "/forecast/:location_id/:days",
            get(handlers::get_forecast).route_layer(middleware::from_fn(auth_middleware)),
        )
        // Protected routes - alerts and notifications
        .nest("/alerts", alert_routes())
        .nest("/notifications", notification_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/password-reset", post(handlers::password_reset_request))
        .route(
            "/password-reset/confirm",
            post(handlers::password_reset_confirm),
        )
        .route(
            "/change-password",
            post(handlers::change_password).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Profile routes (protected)
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route("/update", patch(handlers::update_profile))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Location routes (protected)
fn location_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_locations).post(handlers::save_location),
        )
        .route("/search", post(handlers::search_locations))
        .route("/:location_id", delete(handlers::delete_location))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Weather routes (protected)
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/:location_id", get(handlers::get_weather))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Alert routes (protected)
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts).post(handlers::create_alert))
        .route("/:alert_id/toggle", post(handlers::toggle_alert))
        .route("/:alert_id", delete(handlers::delete_alert))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/:notification_id/read", post(handlers::mark_notification_read))
        .route_layer(middleware::from_fn(auth_middleware))
}

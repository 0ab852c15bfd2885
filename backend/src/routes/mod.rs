//! Route definitions for the Weather Records Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .nest("/records", record_routes())
        .nest("/integrations", integration_routes())
}

/// Weather lookup routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/geocode", get(handlers::geocode_location))
        .route("/current", get(handlers::get_current_weather))
        .route("/forecast", get(handlers::get_daily_forecast))
        .route("/ip", get(handlers::get_ip_location))
        .route("/range", post(handlers::resolve_weather_range))
}

/// Query record routes
fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_records).post(handlers::create_record))
        .route("/export", get(handlers::export_records))
        .route(
            "/:record_id",
            get(handlers::get_record)
                .patch(handlers::update_record)
                .delete(handlers::delete_record),
        )
}

/// Third-party integration routes
fn integration_routes() -> Router<AppState> {
    Router::new()
        .route("/youtube", get(handlers::youtube_search))
        .route("/google-search", get(handlers::google_search))
        .route("/map-embed", get(handlers::get_map_embed))
}

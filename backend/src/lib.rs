//! Weather Records Platform - Backend
//!
//! Location lookup, current/forecast/historical weather from Open-Meteo, and
//! persisted query records.

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use error::AppResult;
use external::{IpGeolocationClient, OpenMeteoClient};
use services::{IntegrationService, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub weather: WeatherService,
    pub ip_geolocation: IpGeolocationClient,
    pub integrations: IntegrationService,
}

impl AppState {
    /// Wire the Open-Meteo, IP geolocation and Google clients from configuration
    pub fn new(db: PgPool, config: Config) -> AppResult<Self> {
        let open_meteo = Arc::new(OpenMeteoClient::new(&config.weather)?);
        let weather = WeatherService::new(open_meteo.clone(), open_meteo);
        let ip_geolocation = IpGeolocationClient::new(&config.weather)?;
        let integrations = IntegrationService::new(config.integrations.clone())?;

        Ok(Self {
            db,
            config: Arc::new(config),
            weather,
            ip_geolocation,
            integrations,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Weather Records Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

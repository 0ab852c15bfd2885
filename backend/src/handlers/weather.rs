//! HTTP handlers for weather lookup endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use shared::{RangeResult, ResolvedLocation};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::weather::{RangeRequest, DEFAULT_FORECAST_DAYS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub lat: f64,
    pub lon: f64,
    pub days: Option<u16>,
}

/// Resolve a place name or `"lat,lon"` to a location
pub async fn geocode_location(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<ResolvedLocation>> {
    let location = state.weather.geocode(&query.q).await?;
    Ok(Json(location))
}

/// Get current conditions at a coordinate pair
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(query): Query<CoordinatesQuery>,
) -> AppResult<Json<Value>> {
    let payload = state.weather.current(query.lat, query.lon).await?;
    Ok(Json(payload))
}

/// Get the daily forecast at a coordinate pair
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<Value>> {
    let days = query.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    let payload = state.weather.forecast(query.lat, query.lon, days).await?;
    Ok(Json(payload))
}

/// Approximate the caller's location from their public IP
pub async fn get_ip_location(State(state): State<AppState>) -> AppResult<Json<ResolvedLocation>> {
    let location = state
        .ip_geolocation
        .locate()
        .await?
        .ok_or_else(|| AppError::LocationNotFound("IP geolocation".to_string()))?;
    Ok(Json(location))
}

/// Resolve daily weather over a date range
pub async fn resolve_weather_range(
    State(state): State<AppState>,
    Json(input): Json<RangeRequest>,
) -> AppResult<Json<RangeResult>> {
    input.validate()?;
    let result = state
        .weather
        .resolve_range(&input.input_location, input.start_date, input.end_date)
        .await?;
    Ok(Json(result))
}

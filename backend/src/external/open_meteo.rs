//! Open-Meteo API client
//!
//! Geocoding, forecast and historical archive lookups. None of these
//! endpoints need an API key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use shared::{DailySeries, DateRange, GpsCoordinates, ResolvedLocation};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};
use crate::services::location::Geocoder;
use crate::services::range::WeatherFetcher;

/// Daily variables requested from both the archive and the forecast
pub const DAILY_VARIABLES: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
    archive_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    country_code: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeocodingResult> for ResolvedLocation {
    fn from(result: GeocodingResult) -> Self {
        let name = match result.country_code {
            Some(code) => format!("{}, {}", result.name, code),
            None => result.name,
        };
        ResolvedLocation::new(name, result.latitude, result.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: Option<DailySeries>,
}

impl OpenMeteoClient {
    /// Create a new client from the weather configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            archive_url: config.archive_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Open-Meteo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Open-Meteo error: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse Open-Meteo response: {}", e)))
    }

    async fn fetch_daily(
        &self,
        url: &str,
        coords: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<DailySeries> {
        let params = [
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("start_date", range.start().to_string()),
            ("end_date", range.end().to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
        ];

        let response: DailyResponse = self.get_json(url, &params).await?;
        let daily = response
            .daily
            .ok_or_else(|| AppError::ExternalService("Open-Meteo response has no daily block".to_string()))?;
        daily
            .validate()
            .map_err(|e| AppError::ExternalService(format!("Malformed daily series: {}", e)))?;

        tracing::debug!(url, days = daily.days(), "Fetched daily series");
        Ok(daily)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    async fn search(&self, name: &str) -> AppResult<Option<ResolvedLocation>> {
        let params = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        let response: GeocodingResponse = self.get_json(&self.geocoding_url, &params).await?;
        Ok(response.results.into_iter().next().map(ResolvedLocation::from))
    }
}

#[async_trait]
impl WeatherFetcher for OpenMeteoClient {
    async fn fetch_historical(
        &self,
        coords: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<DailySeries> {
        self.fetch_daily(&self.archive_url, coords, range).await
    }

    async fn fetch_forecast(
        &self,
        coords: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<DailySeries> {
        self.fetch_daily(&self.forecast_url, coords, range).await
    }

    async fn fetch_current(&self, coords: GpsCoordinates) -> AppResult<Value> {
        let params = [
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("current_weather", "true".to_string()),
        ];
        self.get_json(&self.forecast_url, &params).await
    }

    async fn fetch_daily_forecast(&self, coords: GpsCoordinates, days: u8) -> AppResult<Value> {
        let params = [
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("forecast_days", days.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(&self.forecast_url, &params).await
    }
}

//! Approximate location lookup by public IP (ipapi.co)

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared::ResolvedLocation;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// IP geolocation client
#[derive(Clone)]
pub struct IpGeolocationClient {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Option<ResolvedLocation> {
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        let name = match (self.city, self.country) {
            (Some(city), Some(country)) if !city.is_empty() && !country.is_empty() => {
                format!("{}, {}", city, country)
            }
            _ => "Approximate Location".to_string(),
        };
        Some(ResolvedLocation::new(name, latitude, longitude))
    }
}

impl IpGeolocationClient {
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.ip_geolocation_url.clone(),
        })
    }

    /// Locate the caller's public IP; `None` when the upstream has no coordinates
    pub async fn locate(&self) -> AppResult<Option<ResolvedLocation>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("IP geolocation request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "IP geolocation error: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse IP geolocation response: {}", e))
        })?;

        Ok(data.into_location())
    }
}

//! Third-party integrations: video search, web search and map embeds

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validate_coordinates;

use crate::config::IntegrationsConfig;
use crate::error::{AppError, AppResult};
use crate::external::GoogleApiClient;

pub const DEFAULT_YOUTUBE_RESULTS: u8 = 6;
pub const MAX_YOUTUBE_RESULTS: u8 = 50;
pub const DEFAULT_SEARCH_RESULTS: u8 = 5;
pub const MAX_SEARCH_RESULTS: u8 = 10;

const MAP_EMBED_BASE: &str = "https://maps.google.com/maps";

/// Embeddable map URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapEmbed {
    pub embed: String,
}

/// Integration service wrapping the Google APIs
#[derive(Clone)]
pub struct IntegrationService {
    config: IntegrationsConfig,
    client: GoogleApiClient,
}

impl IntegrationService {
    pub fn new(config: IntegrationsConfig) -> AppResult<Self> {
        let client = GoogleApiClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Search YouTube for videos matching `q`
    pub async fn youtube_search(&self, q: &str, max_results: Option<u8>) -> AppResult<Value> {
        let api_key = self
            .config
            .youtube_key()
            .ok_or_else(|| AppError::MissingCredentials("YouTube API key is not configured".to_string()))?;

        let max_results = max_results.unwrap_or(DEFAULT_YOUTUBE_RESULTS);
        if max_results > MAX_YOUTUBE_RESULTS {
            return Err(AppError::validation(
                "max_results",
                format!("max_results must be at most {}", MAX_YOUTUBE_RESULTS),
            ));
        }

        self.client.youtube_search(api_key, q, max_results).await
    }

    /// Run a Google Custom Search for `q`
    pub async fn google_search(&self, q: &str, num: Option<u8>) -> AppResult<Value> {
        let (api_key, cx) = self.config.custom_search_credentials().ok_or_else(|| {
            AppError::MissingCredentials("Google Custom Search key or engine ID is not configured".to_string())
        })?;

        let num = num.unwrap_or(DEFAULT_SEARCH_RESULTS);
        if num == 0 || num > MAX_SEARCH_RESULTS {
            return Err(AppError::validation(
                "num",
                format!("num must be between 1 and {}", MAX_SEARCH_RESULTS),
            ));
        }

        self.client.custom_search(api_key, cx, q, num).await
    }
}

/// Build a Google Maps embed URL; coordinates take precedence over `q`
pub fn map_embed(latitude: Option<f64>, longitude: Option<f64>, q: Option<&str>) -> AppResult<MapEmbed> {
    if let (Some(lat), Some(lon)) = (latitude, longitude) {
        validate_coordinates(lat, lon).map_err(|msg| AppError::validation("lat", msg))?;
        return Ok(MapEmbed {
            embed: format!("{}?q={},{}&z=12&output=embed", MAP_EMBED_BASE, lat, lon),
        });
    }

    match q.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Ok(MapEmbed {
            embed: format!(
                "{}?q={}&z=12&output=embed",
                MAP_EMBED_BASE,
                urlencoding::encode(q)
            ),
        }),
        None => Err(AppError::validation("q", "Provide lat/lon or q")),
    }
}

//! Google API client for YouTube and Custom Search

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::config::IntegrationsConfig;
use crate::error::{AppError, AppResult};

/// Google API client
#[derive(Clone)]
pub struct GoogleApiClient {
    client: Client,
    youtube_url: String,
    custom_search_url: String,
}

impl GoogleApiClient {
    pub fn new(config: &IntegrationsConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            youtube_url: config.youtube_url.clone(),
            custom_search_url: config.custom_search_url.clone(),
        })
    }

    /// Search YouTube videos
    pub async fn youtube_search(&self, api_key: &str, q: &str, max_results: u8) -> AppResult<Value> {
        let params = [
            ("part", "snippet".to_string()),
            ("q", q.to_string()),
            ("type", "video".to_string()),
            ("maxResults", max_results.to_string()),
            ("key", api_key.to_string()),
            ("safeSearch", "moderate".to_string()),
        ];
        self.get_json("YouTube", &self.youtube_url, &params).await
    }

    /// Run a Programmable Search Engine query
    pub async fn custom_search(&self, api_key: &str, cx: &str, q: &str, num: u8) -> AppResult<Value> {
        let params = [
            ("key", api_key.to_string()),
            ("cx", cx.to_string()),
            ("q", q.to_string()),
            ("num", num.to_string()),
            ("safe", "active".to_string()),
        ];
        self.get_json("Custom Search", &self.custom_search_url, &params)
            .await
    }

    async fn get_json(&self, service: &str, url: &str, params: &[(&str, String)]) -> AppResult<Value> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("{} request failed: {}", service, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "{} API error: {} - {}",
                service, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse {} response: {}", service, e)))
    }
}

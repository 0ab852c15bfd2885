//! Configuration management for the Weather Records Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WX_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const DEFAULT_IP_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
const DEFAULT_YOUTUBE_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const DEFAULT_CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/weather_records";

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Open-Meteo and geolocation endpoints
    pub weather: WeatherConfig,

    /// Third-party search integrations
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
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
pub struct WeatherConfig {
    /// Open-Meteo geocoding search endpoint
    pub geocoding_url: String,

    /// Open-Meteo forecast endpoint
    pub forecast_url: String,

    /// Open-Meteo historical archive endpoint
    pub archive_url: String,

    /// IP geolocation endpoint
    pub ip_geolocation_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IntegrationsConfig {
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,

    /// Google Custom Search API key
    pub cse_api_key: Option<String>,

    /// Google Custom Search engine ID
    pub cse_cx: Option<String>,

    /// YouTube search endpoint
    pub youtube_url: String,

    /// Google Custom Search endpoint
    pub custom_search_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WX_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", DEFAULT_DATABASE_URL)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("weather.geocoding_url", DEFAULT_GEOCODING_URL)?
            .set_default("weather.forecast_url", DEFAULT_FORECAST_URL)?
            .set_default("weather.archive_url", DEFAULT_ARCHIVE_URL)?
            .set_default("weather.ip_geolocation_url", DEFAULT_IP_GEOLOCATION_URL)?
            .set_default("weather.timeout_secs", 20)?
            .set_default("integrations.youtube_url", DEFAULT_YOUTUBE_URL)?
            .set_default("integrations.custom_search_url", DEFAULT_CUSTOM_SEARCH_URL)?
            .set_default("integrations.timeout_secs", 20)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WX_SECTION__KEY)
            .add_source(
                Environment::with_prefix("WX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl IntegrationsConfig {
    /// YouTube key, treating an empty value as unset
    pub fn youtube_key(&self) -> Option<&str> {
        non_empty(&self.youtube_api_key)
    }

    /// Custom Search key and engine ID, both required
    pub fn custom_search_credentials(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.cse_api_key)?, non_empty(&self.cse_cx)?))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            ip_geolocation_url: DEFAULT_IP_GEOLOCATION_URL.to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            cse_api_key: None,
            cse_cx: None,
            youtube_url: DEFAULT_YOUTUBE_URL.to_string(),
            custom_search_url: DEFAULT_CUSTOM_SEARCH_URL.to_string(),
            timeout_secs: 20,
        }
    }
}

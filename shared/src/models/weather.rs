//! Weather source and result models

use std::fmt;

use serde::{Deserialize, Serialize};

use super::daily_series::DailySeries;
use crate::types::ResolvedLocation;

/// Upstream provider a daily series came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    /// Archive of observed days, strictly before today
    Historical,
    /// Forecast for today onwards
    Forecast,
}

impl WeatherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::Historical => "historical",
            WeatherSource::Forecast => "forecast",
        }
    }
}

impl fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable summary of a WMO weather interpretation code
pub fn weather_code_label(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 | 2 => "Mostly clear / Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog / Depositing rime fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snowfall",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 97 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// Daily weather for a resolved location over a requested date range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeResult {
    pub resolved: ResolvedLocation,
    pub daily: DailySeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(WeatherSource::Historical.to_string(), "historical");
        assert_eq!(
            serde_json::to_string(&WeatherSource::Forecast).unwrap(),
            "\"forecast\""
        );
    }

    #[test]
    fn test_weather_code_labels() {
        assert_eq!(weather_code_label(0), "Clear sky");
        assert_eq!(weather_code_label(81), "Rain showers");
        assert_eq!(weather_code_label(99), "Thunderstorm with hail");
        assert_eq!(weather_code_label(4), "Unknown");
    }

    #[test]
    fn test_range_result_shape() {
        let result = RangeResult {
            resolved: ResolvedLocation::new("Austin, US", 30.27, -97.74),
            daily: DailySeries::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["resolved"]["name"], "Austin, US");
        assert!(json["daily"].as_object().unwrap().is_empty());
    }
}

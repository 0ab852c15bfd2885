//! Weather lookups: geocoding, current conditions, forecasts and date ranges

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use shared::{
    validate_coordinates, validate_forecast_days, weather_code_label, DateRange, GpsCoordinates,
    RangeResult, RecordQuery, ResolvedLocation,
};
use validator::Validate;

use super::location::{Geocoder, LocationResolver};
use super::range::{RangeResolver, WeatherFetcher};
use crate::error::{AppError, AppResult};

/// Forecast length used when none is requested
pub const DEFAULT_FORECAST_DAYS: u16 = 5;

/// Input for a date-range lookup
#[derive(Debug, Deserialize, Validate)]
pub struct RangeRequest {
    #[validate(length(min = 1, message = "Location is required"))]
    pub input_location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A resolved location with the payload fetched for it
#[derive(Debug, Clone)]
pub struct FetchedWeather {
    pub resolved: ResolvedLocation,
    pub payload: Value,
}

/// Weather service composing the location and range resolvers
#[derive(Clone)]
pub struct WeatherService {
    locations: LocationResolver,
    ranges: RangeResolver,
    fetcher: Arc<dyn WeatherFetcher>,
}

impl WeatherService {
    pub fn new(geocoder: Arc<dyn Geocoder>, fetcher: Arc<dyn WeatherFetcher>) -> Self {
        Self {
            locations: LocationResolver::new(geocoder),
            ranges: RangeResolver::new(fetcher.clone()),
            fetcher,
        }
    }

    /// Resolve free text or `"lat,lon"` to a location
    pub async fn geocode(&self, query: &str) -> AppResult<ResolvedLocation> {
        self.locations.resolve(query).await
    }

    /// Current conditions at a coordinate pair
    pub async fn current(&self, latitude: f64, longitude: f64) -> AppResult<Value> {
        let coords = checked_coordinates(latitude, longitude)?;
        let mut payload = self.fetcher.fetch_current(coords).await?;
        label_current_conditions(&mut payload);
        Ok(payload)
    }

    /// Daily forecast for the next `days` days
    pub async fn forecast(&self, latitude: f64, longitude: f64, days: u16) -> AppResult<Value> {
        let coords = checked_coordinates(latitude, longitude)?;
        validate_forecast_days(days).map_err(|msg| AppError::validation("days", msg))?;
        let days = u8::try_from(days)
            .map_err(|_| AppError::validation("days", "Forecast days out of range"))?;
        self.fetcher.fetch_daily_forecast(coords, days).await
    }

    /// Geocode once, then resolve the range as of the current UTC date
    pub async fn resolve_range(
        &self,
        location_query: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<RangeResult> {
        let today = Utc::now().date_naive();
        self.resolve_range_at(location_query, start_date, end_date, today)
            .await
    }

    /// Same as [`Self::resolve_range`] with an explicit `today`
    pub async fn resolve_range_at(
        &self,
        location_query: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<RangeResult> {
        // Rejected before geocoding so a bad range never touches the network
        let range = DateRange::new(start_date, end_date).map_err(|_| AppError::InvalidRange)?;
        let location = self.locations.resolve(location_query).await?;
        self.ranges.resolve(location, range, today).await
    }

    /// Fetch the payload a stored record carries for `query`
    ///
    /// Range payloads are the serialized [`RangeResult`]. Current and forecast
    /// payloads are the upstream object with a `resolved` entry added.
    pub async fn fetch_for_query(
        &self,
        location_query: &str,
        query: RecordQuery,
    ) -> AppResult<FetchedWeather> {
        match query {
            RecordQuery::Range(range) => {
                let result = self
                    .resolve_range(location_query, range.start(), range.end())
                    .await?;
                let payload = serde_json::to_value(&result)
                    .map_err(|e| AppError::Internal(format!("Failed to encode range result: {}", e)))?;
                Ok(FetchedWeather {
                    resolved: result.resolved,
                    payload,
                })
            }
            RecordQuery::Current => {
                let resolved = self.locations.resolve(location_query).await?;
                let payload = self.current(resolved.latitude, resolved.longitude).await?;
                Ok(with_resolved(resolved, payload))
            }
            RecordQuery::Forecast => {
                let resolved = self.locations.resolve(location_query).await?;
                let payload = self
                    .forecast(resolved.latitude, resolved.longitude, DEFAULT_FORECAST_DAYS)
                    .await?;
                Ok(with_resolved(resolved, payload))
            }
        }
    }
}

fn checked_coordinates(latitude: f64, longitude: f64) -> AppResult<GpsCoordinates> {
    validate_coordinates(latitude, longitude).map_err(|msg| AppError::validation("lat", msg))?;
    Ok(GpsCoordinates::new(latitude, longitude))
}

fn with_resolved(resolved: ResolvedLocation, mut payload: Value) -> FetchedWeather {
    if let (Value::Object(map), Ok(location)) = (&mut payload, serde_json::to_value(&resolved)) {
        map.insert("resolved".to_string(), location);
    }
    FetchedWeather { resolved, payload }
}

/// Add a `summary` label next to the upstream `weathercode`
fn label_current_conditions(payload: &mut Value) {
    let Some(current) = payload.get_mut("current_weather").and_then(Value::as_object_mut) else {
        return;
    };
    if let Some(code) = current.get("weathercode").and_then(Value::as_f64) {
        let label = weather_code_label(code as i64);
        current.insert("summary".to_string(), Value::from(label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_conditions_get_summary() {
        let mut payload = json!({"current_weather": {"temperature": 21.4, "weathercode": 3}});
        label_current_conditions(&mut payload);
        assert_eq!(payload["current_weather"]["summary"], "Overcast");
    }

    #[test]
    fn test_payload_without_code_is_untouched() {
        let mut payload = json!({"current_weather": {"temperature": 21.4}});
        let before = payload.clone();
        label_current_conditions(&mut payload);
        assert_eq!(payload, before);
    }

    #[test]
    fn test_with_resolved_embeds_location() {
        let fetched = with_resolved(
            ResolvedLocation::new("Oslo, NO", 59.91, 10.75),
            json!({"daily": {}}),
        );
        assert_eq!(fetched.payload["resolved"]["name"], "Oslo, NO");
        assert!(fetched.payload.get("daily").is_some());
    }

    #[test]
    fn test_range_request_requires_location() {
        let request = RangeRequest {
            input_location: String::new(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
        };
        assert!(request.validate().is_err());
    }
}

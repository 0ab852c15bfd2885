//! Date-range weather resolution
//!
//! Decides which upstream source serves each part of a requested range and
//! merges the two halves when the range straddles today. Days strictly before
//! `today` come from the archive, `today` and later from the forecast.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use shared::{
    DailySeries, DateRange, GpsCoordinates, RangePlan, RangeResult, ResolvedLocation,
    WeatherSource,
};

use crate::error::{AppError, AppResult};

/// Upstream weather data provider
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    /// Observed daily series for days strictly before today
    async fn fetch_historical(
        &self,
        coords: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<DailySeries>;

    /// Forecast daily series for today and later
    async fn fetch_forecast(
        &self,
        coords: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<DailySeries>;

    /// Raw current-conditions payload
    async fn fetch_current(&self, coords: GpsCoordinates) -> AppResult<Value>;

    /// Raw daily forecast payload for the next `days` days
    async fn fetch_daily_forecast(&self, coords: GpsCoordinates, days: u8) -> AppResult<Value>;
}

/// Applies the archive/forecast split to a resolved location
#[derive(Clone)]
pub struct RangeResolver {
    fetcher: Arc<dyn WeatherFetcher>,
}

impl RangeResolver {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch and, if needed, merge the daily series for `range` as of `today`.
    ///
    /// Any failed fetch is reported as `SourceUnavailable` for its source. When
    /// both sources are needed, a failure of either one fails the whole call.
    pub async fn resolve(
        &self,
        location: ResolvedLocation,
        range: DateRange,
        today: NaiveDate,
    ) -> AppResult<RangeResult> {
        let coords = location.coordinates();
        let plan = range.plan(today);

        tracing::debug!(
            location = %location.display_name,
            start = %range.start(),
            end = %range.end(),
            %today,
            split = plan.is_split(),
            ?plan,
            "Resolving weather range"
        );

        let daily = match plan {
            RangePlan::Historical(range) => self.historical(coords, range).await?,
            RangePlan::Forecast(range) => self.forecast(coords, range).await?,
            RangePlan::Split {
                historical,
                forecast,
            } => {
                let (past, future) = tokio::try_join!(
                    self.historical(coords, historical),
                    self.forecast(coords, forecast),
                )?;
                DailySeries::merge(past, future)
            }
        };

        Ok(RangeResult {
            resolved: location,
            daily,
        })
    }

    async fn historical(&self, coords: GpsCoordinates, range: DateRange) -> AppResult<DailySeries> {
        self.fetcher
            .fetch_historical(coords, range)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Archive fetch failed");
                AppError::source_unavailable(WeatherSource::Historical, e)
            })
    }

    async fn forecast(&self, coords: GpsCoordinates, range: DateRange) -> AppResult<DailySeries> {
        self.fetcher
            .fetch_forecast(coords, range)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Forecast fetch failed");
                AppError::source_unavailable(WeatherSource::Forecast, e)
            })
    }
}

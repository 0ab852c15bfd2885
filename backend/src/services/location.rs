//! Location resolution
//!
//! Turns free-text user input into a [`ResolvedLocation`]. Raw `"lat,lon"`
//! input is taken as-is; anything else goes through a [`Geocoder`].

use std::sync::Arc;

use async_trait::async_trait;
use shared::{parse_gps_coordinates, validate_coordinates, ResolvedLocation};

use crate::error::{AppError, AppResult};

/// Name-based geocoding backend
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `name`, or `None` when the backend knows no such place
    async fn search(&self, name: &str) -> AppResult<Option<ResolvedLocation>>;
}

/// Resolves user location input to coordinates and a display name
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Resolve a location query
    ///
    /// Blank input and unknown names both yield `LocationNotFound`.
    pub async fn resolve(&self, query: &str) -> AppResult<ResolvedLocation> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::LocationNotFound(String::new()));
        }

        if let Some(coords) = parse_gps_coordinates(query) {
            validate_coordinates(coords.latitude, coords.longitude)
                .map_err(|msg| AppError::validation("input_location", msg))?;
            return Ok(ResolvedLocation::from_gps(coords));
        }

        tracing::debug!(query, "Geocoding location");

        self.geocoder
            .search(query)
            .await?
            .ok_or_else(|| AppError::LocationNotFound(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticGeocoder {
        hit: Option<ResolvedLocation>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn search(&self, _name: &str) -> AppResult<Option<ResolvedLocation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hit.clone())
        }
    }

    fn build(hit: Option<ResolvedLocation>) -> (LocationResolver, Arc<StaticGeocoder>) {
        let geocoder = Arc::new(StaticGeocoder {
            hit,
            calls: AtomicUsize::new(0),
        });
        (LocationResolver::new(geocoder.clone()), geocoder)
    }

    #[tokio::test]
    async fn test_gps_input_skips_geocoder() {
        let (resolver, geocoder) = build(None);
        let loc = resolver.resolve(" 52.52,13.405 ").await.unwrap();
        assert_eq!(loc.display_name, "GPS(52.5200,13.4050)");
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_bounds_gps_is_rejected() {
        let (resolver, _) = build(None);
        let err = resolver.resolve("95.0,10.0").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "input_location"));
    }

    #[tokio::test]
    async fn test_blank_input_is_not_found() {
        let (resolver, geocoder) = build(None);
        let err = resolver.resolve("   ").await.unwrap_err();
        assert!(matches!(err, AppError::LocationNotFound(_)));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let (resolver, _) = build(None);
        let err = resolver.resolve("Atlantis").await.unwrap_err();
        assert!(matches!(err, AppError::LocationNotFound(ref q) if q == "Atlantis"));
    }

    #[tokio::test]
    async fn test_name_uses_geocoder_hit() {
        let hit = ResolvedLocation::new("Paris, FR", 48.85, 2.35);
        let (resolver, geocoder) = build(Some(hit.clone()));
        assert_eq!(resolver.resolve("Paris").await.unwrap(), hit);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }
}

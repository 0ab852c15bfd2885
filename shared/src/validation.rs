//! Validation utilities for the Weather Records Platform

use crate::types::GpsCoordinates;

/// Days the forecast endpoint can serve
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Validate that a location query has something to resolve
pub fn validate_location_query(query: &str) -> Result<(), &'static str> {
    if query.trim().is_empty() {
        return Err("Location must not be empty");
    }
    Ok(())
}

/// Validate latitude/longitude bounds
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate the number of forecast days requested
pub fn validate_forecast_days(days: u16) -> Result<(), &'static str> {
    if days == 0 || days > u16::from(MAX_FORECAST_DAYS) {
        return Err("Forecast days must be between 1 and 16");
    }
    Ok(())
}

/// Parse raw GPS input of the form `"lat,lon"`.
///
/// Returns `None` for anything that is not exactly two comma-separated
/// numbers, so callers can fall back to name-based geocoding. Bounds are not
/// checked here; see [`validate_coordinates`].
pub fn parse_gps_coordinates(input: &str) -> Option<GpsCoordinates> {
    let mut parts = input.trim().split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(GpsCoordinates::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_location_query_validation() {
        assert!(validate_location_query("Austin, TX").is_ok());
        assert!(validate_location_query("   ").is_err());
        assert!(validate_location_query("").is_err());
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(validate_coordinates(40.7128, -74.0060).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.1).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_forecast_days_bounds() {
        assert!(validate_forecast_days(1).is_ok());
        assert!(validate_forecast_days(16).is_ok());
        assert!(validate_forecast_days(0).is_err());
        assert!(validate_forecast_days(17).is_err());
        assert!(validate_forecast_days(300).is_err());
    }

    #[test]
    fn test_parse_gps() {
        assert_eq!(
            parse_gps_coordinates("40.7128,-74.0060"),
            Some(GpsCoordinates::new(40.7128, -74.006))
        );
        assert_eq!(
            parse_gps_coordinates(" 40.7 , -74.0 "),
            Some(GpsCoordinates::new(40.7, -74.0))
        );
    }

    #[test]
    fn test_parse_gps_rejects_place_names() {
        assert_eq!(parse_gps_coordinates("Austin, TX"), None);
        assert_eq!(parse_gps_coordinates("78701"), None);
        assert_eq!(parse_gps_coordinates("1,2,3"), None);
        assert_eq!(parse_gps_coordinates(""), None);
    }

    proptest! {
        #[test]
        fn prop_formatted_coordinates_parse_back(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0
        ) {
            let parsed = parse_gps_coordinates(&format!("{lat},{lon}")).unwrap();
            prop_assert_eq!(parsed.latitude, lat);
            prop_assert_eq!(parsed.longitude, lon);
            prop_assert!(validate_coordinates(parsed.latitude, parsed.longitude).is_ok());
        }
    }
}

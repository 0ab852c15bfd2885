//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A location after geocoding
///
/// Serialized as `{"name", "lat", "lon"}`, the shape clients already consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedLocation {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl ResolvedLocation {
    pub fn new(display_name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            display_name: display_name.into(),
            latitude,
            longitude,
        }
    }

    /// Location named after its own coordinates, e.g. `GPS(52.5200,13.4050)`
    pub fn from_gps(coords: GpsCoordinates) -> Self {
        Self::new(
            format!("GPS({:.4},{:.4})", coords.latitude, coords.longitude),
            coords.latitude,
            coords.longitude,
        )
    }

    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_name_uses_four_decimals() {
        let loc = ResolvedLocation::from_gps(GpsCoordinates::new(52.52, 13.405));
        assert_eq!(loc.display_name, "GPS(52.5200,13.4050)");
        assert_eq!(loc.latitude, 52.52);
    }

    #[test]
    fn test_resolved_location_wire_shape() {
        let loc = ResolvedLocation::new("Berlin, DE", 52.52, 13.41);
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["name"], "Berlin, DE");
        assert_eq!(json["lat"], 52.52);
        assert_eq!(json["lon"], 13.41);
    }
}

//! External API integrations

pub mod google;
pub mod ip_geolocation;
pub mod open_meteo;

pub use google::GoogleApiClient;
pub use ip_geolocation::IpGeolocationClient;
pub use open_meteo::OpenMeteoClient;

//! Business logic services for the Weather Records Platform

pub mod integrations;
pub mod location;
pub mod range;
pub mod records;
pub mod weather;

pub use integrations::IntegrationService;
pub use location::{Geocoder, LocationResolver};
pub use range::{RangeResolver, WeatherFetcher};
pub use records::RecordService;
pub use weather::WeatherService;

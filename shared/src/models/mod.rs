//! Domain models for the Weather Records Platform

mod daily_series;
mod range;
mod record;
mod weather;

pub use daily_series::*;
pub use range::*;
pub use record::*;
pub use weather::*;

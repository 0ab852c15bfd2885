//! HTTP request handlers

pub mod health;
pub mod integrations;
pub mod records;
pub mod weather;

pub use health::*;
pub use integrations::*;
pub use records::*;
pub use weather::*;

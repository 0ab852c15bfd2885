//! Shared types and models for the Weather Records Platform
//!
//! This crate contains the I/O-free domain: date ranges and how they are
//! split between archive and forecast sources, daily weather series and
//! their merge, and the tagged query kinds stored with each record.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;

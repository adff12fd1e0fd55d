pub mod config;
pub mod error;
pub mod geocoding;
pub mod marketplace;
pub mod store;
pub mod telemetry;

//! Configuration utilities

pub mod config;

pub use config::{EngineConfig, SatelliteRefresh};

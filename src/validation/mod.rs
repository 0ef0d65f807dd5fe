//! Error types shared across the crate

pub mod error;

pub use error::{ConfigError, EngineError, LoadError, Unavailable};

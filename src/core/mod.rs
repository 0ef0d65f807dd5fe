//! Core types and constants for beacon positioning

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;

//! Error classification for the positioning engine
//!
//! Estimation failures are never fatal: each one degrades a single
//! algorithm's state until the next batch supersedes it. Loader and
//! configuration failures are ordinary `Result` errors.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Reason an algorithm has no position to report
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Unavailable {
    #[error("observation batch was empty")]
    NoObservations,

    #[error("no observation matched the reference table with a positive distance")]
    NoValidBeacons,

    #[error("insufficient beacons: {count} valid, 3 required")]
    InsufficientBeacons { count: usize },

    #[error("beacon geometry is degenerate (collinear or coincident)")]
    DegenerateGeometry,

    #[error("algorithm is deactivated")]
    Deactivated,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("no satellite fix available")]
    NoFix,
}

/// Reference data load failures; any of these aborts the whole load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read reference data '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference data '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration validation and persistence failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("configuration file I/O error: {message}")]
    Io { message: String },

    #[error("configuration serialization error: {message}")]
    Serialization { message: String },
}

/// Engine API failures that are not estimation outcomes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown listener handle {0}")]
    UnknownListener(u32),
}

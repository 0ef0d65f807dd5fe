//! Beacon Position Engine
//!
//! Estimates a device's geographic position from ranged beacon observations
//! using an inverse-distance weighted centroid and three-beacon trilateration,
//! alongside a host-provided satellite fix.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use core::{Algorithm, BeaconFix, GeoPoint, Observation, PositionEstimate, EARTH_MEAN_RADIUS_M};
pub use algorithms::{GeoProjection, PositionEstimator, SatelliteFixAdapter, TrilaterationEstimator, WeightedCentroidEstimator};
pub use processing::{LoadReport, ReferenceLoader, ReferenceTable};
pub use validation::{ConfigError, EngineError, LoadError, Unavailable};
pub use utils::{EngineConfig, SatelliteRefresh};
pub use hardware::{FixSource, LocationProvider, MockLocationProvider, NoLocationProvider};
pub use api::{
    AlgorithmSlot, EngineEvent, EventListener, GateState, GateTransition, ListenerHandle, PositionEngine, Radio,
    ScanGate, SharedPositionEngine,
};

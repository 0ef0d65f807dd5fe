//! Engine-facing API
//!
//! The position engine, its event listeners, a thread-safe handle for hosts
//! that deliver batches from a background thread, and the scan gate that
//! decides when the radio driver may run.

pub mod callback;
pub mod engine;
pub mod shared;
pub mod scan_gate;

// Re-export commonly used API types
pub use callback::{EngineEvent, EventListener, ListenerHandle};
pub use engine::{AlgorithmSlot, PositionEngine};
pub use shared::SharedPositionEngine;
pub use scan_gate::{GateCallback, GateState, GateTransition, Radio, ScanGate};

//! Engine events for the presentation layer
//!
//! The engine owns no rendering objects. A presentation layer registers a
//! listener and creates, moves, or removes its own markers in response.

use crate::core::{Algorithm, PositionEstimate};

/// Slot state changes published by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A slot was recomputed (batch, activation or satellite refresh)
    EstimateUpdated {
        algorithm: Algorithm,
        estimate: PositionEstimate,
    },
    /// An active slot was deactivated; its presentation resources should go
    SlotRemoved { algorithm: Algorithm },
}

impl EngineEvent {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            EngineEvent::EstimateUpdated { algorithm, .. } => *algorithm,
            EngineEvent::SlotRemoved { algorithm } => *algorithm,
        }
    }
}

/// Listener invoked synchronously for each event
pub type EventListener = Box<dyn Fn(&EngineEvent) + Send>;

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(u32);

impl ListenerHandle {
    pub(crate) fn new(id: u32) -> Self {
        ListenerHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

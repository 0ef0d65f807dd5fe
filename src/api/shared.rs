//! Thread-safe engine handle
//!
//! Radio drivers usually deliver batches from a background thread while the
//! presentation layer reads and toggles slots from another. Every call goes
//! through one mutex, so updates never interleave.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::engine::PositionEngine;
use crate::core::{Algorithm, Observation, PositionEstimate};
use crate::processing::ReferenceTable;

/// Cloneable handle serializing access to one `PositionEngine`.
///
/// Listeners registered on the engine run while the lock is held and must
/// not call back into the same handle.
#[derive(Clone)]
pub struct SharedPositionEngine {
    inner: Arc<Mutex<PositionEngine>>,
}

impl SharedPositionEngine {
    pub fn new(engine: PositionEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn update(&self, batch: Vec<Observation>) -> BTreeMap<Algorithm, PositionEstimate> {
        self.lock().update(batch)
    }

    pub fn set_active(&self, algorithm: Algorithm, active: bool) {
        self.lock().set_active(algorithm, active)
    }

    /// Swap in a new table; no update ever sees a partially installed one
    pub fn install_reference_table(&self, table: impl Into<Arc<ReferenceTable>>) {
        self.lock().install_reference_table(table)
    }

    pub fn refresh_satellite_fix(&self) -> PositionEstimate {
        self.lock().refresh_satellite_fix()
    }

    pub fn estimate(&self, algorithm: Algorithm) -> PositionEstimate {
        self.lock().estimate(algorithm).clone()
    }

    /// Run `f` with exclusive access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut PositionEngine) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, PositionEngine> {
        // Engine state is plain data; a panicking listener leaves it consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<PositionEngine> for SharedPositionEngine {
    fn from(engine: PositionEngine) -> Self {
        Self::new(engine)
    }
}

//! Mock location provider for testing and host integration

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::GeoPoint;
use crate::hardware::{FixSource, LocationProvider};

#[derive(Debug, Default)]
struct MockState {
    permission: bool,
    live_fix: Option<GeoPoint>,
    cached_fixes: HashMap<FixSource, GeoPoint>,
    queries: u32,
}

/// Scriptable location provider.
///
/// Clones share state, so a test can hand one clone to the engine and keep
/// another to change fixes or permission afterwards.
#[derive(Debug, Clone, Default)]
pub struct MockLocationProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockLocationProvider {
    /// Create a provider with permission granted and no fixes
    pub fn new() -> Self {
        let provider = Self::default();
        provider.set_permission(true);
        provider
    }

    pub fn set_permission(&self, granted: bool) {
        self.lock().permission = granted;
    }

    pub fn set_live_fix(&self, fix: Option<GeoPoint>) {
        self.lock().live_fix = fix;
    }

    pub fn set_cached_fix(&self, source: FixSource, fix: Option<GeoPoint>) {
        let mut state = self.lock();
        match fix {
            Some(fix) => {
                state.cached_fixes.insert(source, fix);
            }
            None => {
                state.cached_fixes.remove(&source);
            }
        }
    }

    /// Number of `live_fix` queries served so far
    pub fn query_count(&self) -> u32 {
        self.lock().queries
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocationProvider for MockLocationProvider {
    fn has_permission(&self) -> bool {
        self.lock().permission
    }

    fn live_fix(&self) -> Option<GeoPoint> {
        let mut state = self.lock();
        state.queries += 1;
        state.live_fix
    }

    fn last_known_fix(&self, source: FixSource) -> Option<GeoPoint> {
        self.lock().cached_fixes.get(&source).copied()
    }
}

//! Location subsystem interface consumed by the satellite-fix adapter

use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;

/// Providers the host location subsystem can cache fixes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixSource {
    Gps,
    Network,
    Passive,
}

/// Cached sources consulted, in order, when no live fix is available
pub const FALLBACK_SOURCES: [FixSource; 2] = [FixSource::Network, FixSource::Passive];

/// Hardware abstraction over the host positioning subsystem
pub trait LocationProvider: Send {
    /// Whether the location permission is currently granted
    fn has_permission(&self) -> bool;

    /// Most recent fix from the live positioning subsystem, if any
    fn live_fix(&self) -> Option<GeoPoint>;

    /// Last fix the host cached for `source`, if any
    fn last_known_fix(&self, source: FixSource) -> Option<GeoPoint>;
}

/// Provider for hosts without a location subsystem: never grants permission
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocationProvider;

impl LocationProvider for NoLocationProvider {
    fn has_permission(&self) -> bool {
        false
    }

    fn live_fix(&self) -> Option<GeoPoint> {
        None
    }

    fn last_known_fix(&self, _source: FixSource) -> Option<GeoPoint> {
        None
    }
}

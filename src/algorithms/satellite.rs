//! Passthrough of the host's satellite fix
//!
//! No beacon data is analysed here. Fallback order on each query:
//! 1. live fix from the positioning subsystem
//! 2. cached fix from each of [`FALLBACK_SOURCES`], in order
//! 3. `NoFix`
//!
//! A missing permission yields `PermissionDenied` for that call only.

use crate::core::PositionEstimate;
use crate::hardware::{LocationProvider, FALLBACK_SOURCES};
use crate::validation::Unavailable;

pub struct SatelliteFixAdapter {
    provider: Box<dyn LocationProvider>,
}

impl SatelliteFixAdapter {
    pub fn new(provider: Box<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    pub fn current_fix(&self) -> PositionEstimate {
        if !self.provider.has_permission() {
            log::warn!("Satellite fix requested without location permission");
            return Err(Unavailable::PermissionDenied);
        }

        if let Some(fix) = self.provider.live_fix() {
            return Ok(fix);
        }

        FALLBACK_SOURCES
            .iter()
            .find_map(|source| self.provider.last_known_fix(*source))
            .ok_or(Unavailable::NoFix)
    }
}

impl std::fmt::Debug for SatelliteFixAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SatelliteFixAdapter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeoPoint;
    use crate::hardware::{FixSource, MockLocationProvider, NoLocationProvider};

    fn adapter_with(provider: &MockLocationProvider) -> SatelliteFixAdapter {
        SatelliteFixAdapter::new(Box::new(provider.clone()))
    }

    #[test]
    fn test_live_fix_wins() {
        let provider = MockLocationProvider::new();
        provider.set_live_fix(Some(GeoPoint::new(52.0, 21.0)));
        provider.set_cached_fix(FixSource::Network, Some(GeoPoint::new(1.0, 1.0)));

        assert_eq!(adapter_with(&provider).current_fix(), Ok(GeoPoint::new(52.0, 21.0)));
    }

    #[test]
    fn test_fallback_priority() {
        let provider = MockLocationProvider::new();
        provider.set_cached_fix(FixSource::Passive, Some(GeoPoint::new(2.0, 2.0)));
        let adapter = adapter_with(&provider);
        assert_eq!(adapter.current_fix(), Ok(GeoPoint::new(2.0, 2.0)));

        provider.set_cached_fix(FixSource::Network, Some(GeoPoint::new(1.0, 1.0)));
        assert_eq!(adapter.current_fix(), Ok(GeoPoint::new(1.0, 1.0)));
    }

    #[test]
    fn test_gps_cache_is_not_a_fallback() {
        let provider = MockLocationProvider::new();
        provider.set_cached_fix(FixSource::Gps, Some(GeoPoint::new(5.0, 5.0)));
        assert_eq!(adapter_with(&provider).current_fix(), Err(Unavailable::NoFix));
    }

    #[test]
    fn test_permission_denied_is_per_call() {
        let provider = MockLocationProvider::new();
        provider.set_live_fix(Some(GeoPoint::new(52.0, 21.0)));
        provider.set_permission(false);
        let adapter = adapter_with(&provider);

        assert_eq!(adapter.current_fix(), Err(Unavailable::PermissionDenied));
        assert_eq!(provider.query_count(), 0);

        provider.set_permission(true);
        assert_eq!(adapter.current_fix(), Ok(GeoPoint::new(52.0, 21.0)));
    }

    #[test]
    fn test_no_location_provider() {
        let adapter = SatelliteFixAdapter::new(Box::new(NoLocationProvider));
        assert_eq!(adapter.current_fix(), Err(Unavailable::PermissionDenied));
    }
}

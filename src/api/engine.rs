//! Multi-algorithm position engine
//!
//! Holds one slot per algorithm. Beacon-driven slots are recomputed from
//! each observation batch while active; the satellite-fix slot follows the
//! configured refresh cadence. A deactivated slot always reads
//! `Unavailable::Deactivated`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::algorithms::{PositionEstimator, SatelliteFixAdapter, TrilaterationEstimator, WeightedCentroidEstimator};
use crate::api::callback::{EngineEvent, EventListener, ListenerHandle};
use crate::core::{Algorithm, Observation, PositionEstimate};
use crate::hardware::LocationProvider;
use crate::processing::ReferenceTable;
use crate::utils::{EngineConfig, SatelliteRefresh};
use crate::validation::{ConfigError, EngineError, Unavailable};

/// Per-algorithm state read by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSlot {
    pub algorithm: Algorithm,
    pub active: bool,
    pub last_estimate: PositionEstimate,
}

impl AlgorithmSlot {
    fn inactive(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            active: false,
            last_estimate: Err(Unavailable::Deactivated),
        }
    }
}

/// Position engine orchestrating all estimators
pub struct PositionEngine {
    config: EngineConfig,
    reference: Arc<ReferenceTable>,
    weighted_centroid: WeightedCentroidEstimator,
    trilateration: TrilaterationEstimator,
    satellite: SatelliteFixAdapter,
    slots: BTreeMap<Algorithm, AlgorithmSlot>,
    /// Most recent batch, replayed when a beacon-driven slot is activated
    last_batch: Option<Vec<Observation>>,
    listeners: BTreeMap<ListenerHandle, EventListener>,
    listener_counter: u32,
}

impl PositionEngine {
    /// Create an engine with every slot inactive and an empty reference table
    pub fn new(config: EngineConfig, location: Box<dyn LocationProvider>) -> Result<Self, ConfigError> {
        config.validate()?;

        let slots = Algorithm::ALL
            .iter()
            .map(|algorithm| (*algorithm, AlgorithmSlot::inactive(*algorithm)))
            .collect();

        Ok(Self {
            weighted_centroid: WeightedCentroidEstimator::new(),
            trilateration: TrilaterationEstimator::new(config.earth_radius_m, config.degenerate_determinant_epsilon),
            satellite: SatelliteFixAdapter::new(location),
            reference: Arc::new(ReferenceTable::new()),
            slots,
            last_batch: None,
            listeners: BTreeMap::new(),
            listener_counter: 0,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of the reference table currently in use
    pub fn reference_table(&self) -> Arc<ReferenceTable> {
        Arc::clone(&self.reference)
    }

    /// Replace the reference table wholesale; takes effect from the next computation
    pub fn install_reference_table(&mut self, table: impl Into<Arc<ReferenceTable>>) {
        let table = table.into();
        log::info!(
            "Installing reference table with {} beacons (replacing {})",
            table.len(),
            self.reference.len()
        );
        self.reference = table;
    }

    /// Process one observation batch.
    ///
    /// Returns the estimate of every active slot after the update.
    pub fn update(&mut self, batch: Vec<Observation>) -> BTreeMap<Algorithm, PositionEstimate> {
        log::debug!("Observation batch with {} beacons", batch.len());

        for algorithm in self.active_algorithms() {
            let recompute = algorithm.uses_beacons() || self.config.satellite_refresh == SatelliteRefresh::EveryBatch;
            if recompute {
                let estimate = self.compute(algorithm, &batch);
                self.store(algorithm, estimate);
            }
        }

        self.last_batch = Some(batch);

        self.slots
            .values()
            .filter(|slot| slot.active)
            .map(|slot| (slot.algorithm, slot.last_estimate.clone()))
            .collect()
    }

    /// Activate or deactivate one algorithm.
    ///
    /// Activation computes once right away (from the cached batch for
    /// beacon-driven algorithms). Deactivation resets the slot to
    /// `Deactivated` and publishes a removal event.
    pub fn set_active(&mut self, algorithm: Algorithm, active: bool) {
        let was_active = self.slot(algorithm).active;

        if active {
            if was_active {
                return;
            }
            self.slot_mut(algorithm).active = true;

            let estimate = match (&self.last_batch, algorithm.uses_beacons()) {
                (Some(batch), true) => self.compute(algorithm, batch),
                (None, true) => Err(Unavailable::NoObservations),
                (_, false) => self.satellite.current_fix(),
            };
            log::debug!("Activated {}", algorithm);
            self.store(algorithm, estimate);
        } else {
            let slot = self.slot_mut(algorithm);
            slot.active = false;
            slot.last_estimate = Err(Unavailable::Deactivated);

            if was_active {
                log::debug!("Deactivated {}", algorithm);
                self.emit(&EngineEvent::SlotRemoved { algorithm });
            }
        }
    }

    /// Re-query the satellite fix if that slot is active
    pub fn refresh_satellite_fix(&mut self) -> PositionEstimate {
        if !self.slot(Algorithm::SatelliteFix).active {
            return Err(Unavailable::Deactivated);
        }

        let estimate = self.satellite.current_fix();
        self.store(Algorithm::SatelliteFix, estimate.clone());
        estimate
    }

    pub fn estimate(&self, algorithm: Algorithm) -> &PositionEstimate {
        &self.slot(algorithm).last_estimate
    }

    pub fn slot(&self, algorithm: Algorithm) -> &AlgorithmSlot {
        // Every algorithm gets a slot in `new`
        &self.slots[&algorithm]
    }

    pub fn slots(&self) -> impl Iterator<Item = &AlgorithmSlot> {
        self.slots.values()
    }

    pub fn active_algorithms(&self) -> Vec<Algorithm> {
        self.slots.values().filter(|slot| slot.active).map(|slot| slot.algorithm).collect()
    }

    pub fn last_batch(&self) -> Option<&[Observation]> {
        self.last_batch.as_deref()
    }

    /// Register an event listener. Listeners run synchronously inside engine calls.
    pub fn register_listener(&mut self, listener: EventListener) -> ListenerHandle {
        self.listener_counter += 1;
        let handle = ListenerHandle::new(self.listener_counter);
        self.listeners.insert(handle, listener);
        handle
    }

    pub fn unregister_listener(&mut self, handle: ListenerHandle) -> Result<(), EngineError> {
        self.listeners
            .remove(&handle)
            .map(|_| ())
            .ok_or(EngineError::UnknownListener(handle.id()))
    }

    fn compute(&self, algorithm: Algorithm, batch: &[Observation]) -> PositionEstimate {
        let estimate = match algorithm {
            Algorithm::WeightedCentroid => self.weighted_centroid.estimate(batch, &self.reference),
            Algorithm::Trilateration => self.trilateration.estimate(batch, &self.reference),
            Algorithm::SatelliteFix => self.satellite.current_fix(),
        };

        if let Err(reason) = &estimate {
            log::debug!("{} unavailable: {}", algorithm, reason);
        }
        estimate
    }

    fn store(&mut self, algorithm: Algorithm, estimate: PositionEstimate) {
        self.slot_mut(algorithm).last_estimate = estimate.clone();
        self.emit(&EngineEvent::EstimateUpdated { algorithm, estimate });
    }

    fn slot_mut(&mut self, algorithm: Algorithm) -> &mut AlgorithmSlot {
        self.slots
            .entry(algorithm)
            .or_insert_with(|| AlgorithmSlot::inactive(algorithm))
    }

    fn emit(&self, event: &EngineEvent) {
        for listener in self.listeners.values() {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BeaconFix, GeoPoint};
    use crate::hardware::MockLocationProvider;
    use std::sync::{Arc, Mutex};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn triangle_table() -> ReferenceTable {
        ReferenceTable::from_fixes(vec![
            BeaconFix::new("A", 0.0, 0.0),
            BeaconFix::new("B", 0.0, 0.01),
            BeaconFix::new("C", 0.01, 0.0),
        ])
    }

    fn triangle_batch() -> Vec<Observation> {
        vec![
            Observation::new("A", 50.0),
            Observation::new("B", 70.0),
            Observation::new("C", 70.0),
        ]
    }

    fn engine_with(location: &MockLocationProvider, config: EngineConfig) -> PositionEngine {
        init_logging();
        let mut engine = PositionEngine::new(config, Box::new(location.clone())).unwrap();
        engine.install_reference_table(triangle_table());
        engine
    }

    fn default_engine() -> PositionEngine {
        engine_with(&MockLocationProvider::new(), EngineConfig::default())
    }

    fn record_events(engine: &mut PositionEngine) -> Arc<Mutex<Vec<EngineEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        engine.register_listener(Box::new(move |event: &EngineEvent| sink.lock().unwrap().push(event.clone())));
        events
    }

    #[test]
    fn test_slots_start_inactive() {
        let engine = default_engine();
        for algorithm in Algorithm::ALL {
            let slot = engine.slot(algorithm);
            assert!(!slot.active);
            assert_eq!(slot.last_estimate, Err(Unavailable::Deactivated));
        }
        assert!(engine.active_algorithms().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            earth_radius_m: 0.0,
            ..Default::default()
        };
        assert!(PositionEngine::new(config, Box::new(MockLocationProvider::new())).is_err());
    }

    #[test]
    fn test_update_only_touches_active_slots() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::WeightedCentroid, true);

        let results = engine.update(triangle_batch());
        assert_eq!(results.len(), 1);
        assert!(results[&Algorithm::WeightedCentroid].is_ok());
        assert_eq!(engine.estimate(Algorithm::Trilateration), &Err(Unavailable::Deactivated));
    }

    #[test]
    fn test_algorithms_fail_independently() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::WeightedCentroid, true);
        engine.set_active(Algorithm::Trilateration, true);

        let results = engine.update(vec![Observation::new("A", 10.0), Observation::new("B", 12.0)]);
        assert!(results[&Algorithm::WeightedCentroid].is_ok());
        assert_eq!(
            results[&Algorithm::Trilateration],
            Err(Unavailable::InsufficientBeacons { count: 2 })
        );

        // A later good batch supersedes the failure
        let results = engine.update(triangle_batch());
        assert!(results[&Algorithm::Trilateration].is_ok());
    }

    #[test]
    fn test_activation_without_batch_reports_no_observations() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::Trilateration, true);
        assert_eq!(engine.estimate(Algorithm::Trilateration), &Err(Unavailable::NoObservations));
    }

    #[test]
    fn test_activation_replays_cached_batch() {
        let mut engine = default_engine();
        engine.update(triangle_batch());
        assert_eq!(engine.last_batch().map(|b| b.len()), Some(3));

        engine.set_active(Algorithm::WeightedCentroid, true);
        assert!(engine.estimate(Algorithm::WeightedCentroid).is_ok());
    }

    #[test]
    fn test_deactivation_clears_estimate_immediately() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::WeightedCentroid, true);
        engine.update(triangle_batch());
        assert!(engine.estimate(Algorithm::WeightedCentroid).is_ok());

        engine.set_active(Algorithm::WeightedCentroid, false);
        assert_eq!(engine.estimate(Algorithm::WeightedCentroid), &Err(Unavailable::Deactivated));

        // Later batches do not bring a stale value back
        let results = engine.update(triangle_batch());
        assert!(results.is_empty());
        assert_eq!(engine.estimate(Algorithm::WeightedCentroid), &Err(Unavailable::Deactivated));
    }

    #[test]
    fn test_events_for_activation_update_and_removal() {
        let mut engine = default_engine();
        let events = record_events(&mut engine);

        engine.set_active(Algorithm::WeightedCentroid, true);
        engine.set_active(Algorithm::WeightedCentroid, true);
        engine.update(triangle_batch());
        engine.set_active(Algorithm::WeightedCentroid, false);
        engine.set_active(Algorithm::WeightedCentroid, false);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            EngineEvent::EstimateUpdated {
                algorithm: Algorithm::WeightedCentroid,
                estimate: Err(Unavailable::NoObservations),
            }
        );
        assert!(matches!(
            &events[1],
            EngineEvent::EstimateUpdated { estimate: Ok(_), .. }
        ));
        assert_eq!(
            events[2],
            EngineEvent::SlotRemoved {
                algorithm: Algorithm::WeightedCentroid
            }
        );
    }

    #[test]
    fn test_unregister_listener() {
        let mut engine = default_engine();
        let events = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&events);
        let handle = engine.register_listener(Box::new(move |_: &EngineEvent| *sink.lock().unwrap() += 1));

        engine.set_active(Algorithm::Trilateration, true);
        assert!(engine.unregister_listener(handle).is_ok());
        engine.update(triangle_batch());

        assert_eq!(*events.lock().unwrap(), 1);
        assert_eq!(
            engine.unregister_listener(handle),
            Err(EngineError::UnknownListener(handle.id()))
        );
    }

    #[test]
    fn test_satellite_refresh_on_demand() {
        let location = MockLocationProvider::new();
        location.set_live_fix(Some(GeoPoint::new(52.0, 21.0)));
        let mut engine = engine_with(&location, EngineConfig::default());

        assert_eq!(engine.refresh_satellite_fix(), Err(Unavailable::Deactivated));

        engine.set_active(Algorithm::SatelliteFix, true);
        assert_eq!(engine.estimate(Algorithm::SatelliteFix), &Ok(GeoPoint::new(52.0, 21.0)));

        // Batches do not re-query the location subsystem
        location.set_live_fix(Some(GeoPoint::new(53.0, 22.0)));
        let queries = location.query_count();
        let results = engine.update(triangle_batch());
        assert_eq!(location.query_count(), queries);
        assert_eq!(results[&Algorithm::SatelliteFix], Ok(GeoPoint::new(52.0, 21.0)));

        assert_eq!(engine.refresh_satellite_fix(), Ok(GeoPoint::new(53.0, 22.0)));
        assert_eq!(engine.estimate(Algorithm::SatelliteFix), &Ok(GeoPoint::new(53.0, 22.0)));
    }

    #[test]
    fn test_satellite_refresh_every_batch() {
        let location = MockLocationProvider::new();
        location.set_live_fix(Some(GeoPoint::new(52.0, 21.0)));
        let config = EngineConfig {
            satellite_refresh: SatelliteRefresh::EveryBatch,
            ..Default::default()
        };
        let mut engine = engine_with(&location, config);
        engine.set_active(Algorithm::SatelliteFix, true);

        location.set_live_fix(Some(GeoPoint::new(53.0, 22.0)));
        let results = engine.update(Vec::new());
        assert_eq!(results[&Algorithm::SatelliteFix], Ok(GeoPoint::new(53.0, 22.0)));
    }

    #[test]
    fn test_satellite_permission_denied_is_not_fatal() {
        let location = MockLocationProvider::new();
        location.set_permission(false);
        let mut engine = engine_with(&location, EngineConfig::default());

        engine.set_active(Algorithm::SatelliteFix, true);
        engine.set_active(Algorithm::WeightedCentroid, true);
        assert_eq!(engine.estimate(Algorithm::SatelliteFix), &Err(Unavailable::PermissionDenied));

        let results = engine.update(triangle_batch());
        assert!(results[&Algorithm::WeightedCentroid].is_ok());

        location.set_permission(true);
        location.set_live_fix(Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(engine.refresh_satellite_fix(), Ok(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn test_reference_swap_applies_to_next_update() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::WeightedCentroid, true);
        let before = engine.reference_table();

        engine.install_reference_table(ReferenceTable::from_fixes(vec![BeaconFix::new("Z", 5.0, 5.0)]));
        assert_eq!(before.len(), 3);
        assert_eq!(engine.reference_table().len(), 1);

        let results = engine.update(triangle_batch());
        assert_eq!(results[&Algorithm::WeightedCentroid], Err(Unavailable::NoValidBeacons));

        let results = engine.update(vec![Observation::new("Z", 3.0)]);
        assert_eq!(results[&Algorithm::WeightedCentroid], Ok(GeoPoint::new(5.0, 5.0)));
    }

    #[test]
    fn test_empty_batch() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::WeightedCentroid, true);
        engine.set_active(Algorithm::Trilateration, true);

        let results = engine.update(Vec::new());
        assert_eq!(results[&Algorithm::WeightedCentroid], Err(Unavailable::NoObservations));
        assert_eq!(
            results[&Algorithm::Trilateration],
            Err(Unavailable::InsufficientBeacons { count: 0 })
        );
    }

    #[test]
    fn test_slot_serializes() {
        let mut engine = default_engine();
        engine.set_active(Algorithm::WeightedCentroid, true);
        engine.update(vec![Observation::new("B", 1.0)]);

        let json = serde_json::to_string(engine.slot(Algorithm::WeightedCentroid)).unwrap();
        let slot: AlgorithmSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(slot.last_estimate, Ok(GeoPoint::new(0.0, 0.01)));
        assert!(slot.active);
    }
}

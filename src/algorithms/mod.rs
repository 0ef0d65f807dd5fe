//! Position estimation algorithms

pub mod projection;
pub mod weighted_centroid;
pub mod trilateration;
pub mod satellite;

pub use projection::GeoProjection;
pub use weighted_centroid::WeightedCentroidEstimator;
pub use trilateration::TrilaterationEstimator;
pub use satellite::SatelliteFixAdapter;

use crate::core::{Algorithm, Observation, PositionEstimate, ValidObservation};
use crate::processing::ReferenceTable;

/// Beacon-driven estimator: a pure function of one batch and the reference table
pub trait PositionEstimator {
    fn algorithm(&self) -> Algorithm;

    fn estimate(&self, observations: &[Observation], table: &ReferenceTable) -> PositionEstimate;
}

/// Join a batch against the reference table, keeping batch order and
/// dropping unknown ids and unusable distances
pub fn join_observations<'a>(observations: &[Observation], table: &'a ReferenceTable) -> Vec<ValidObservation<'a>> {
    observations
        .iter()
        .filter_map(|observation| {
            let distance_m = observation.usable_distance()?;
            let fix = table.get(&observation.id)?;
            Some(ValidObservation { fix, distance_m })
        })
        .collect()
}

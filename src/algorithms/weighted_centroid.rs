//! Inverse-distance weighted centroid of the ranged beacons

use crate::algorithms::{join_observations, PositionEstimator};
use crate::core::{Algorithm, GeoPoint, Observation, PositionEstimate};
use crate::processing::ReferenceTable;
use crate::validation::Unavailable;

/// Weighted average of known beacon coordinates with weight `1 / distance`.
///
/// Only relative weights matter, so the nearest beacon gets weight 1.
///
/// No minimum beacon count: a single valid beacon yields its own coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCentroidEstimator;

impl WeightedCentroidEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl PositionEstimator for WeightedCentroidEstimator {
    fn algorithm(&self) -> Algorithm {
        Algorithm::WeightedCentroid
    }

    fn estimate(&self, observations: &[Observation], table: &ReferenceTable) -> PositionEstimate {
        if observations.is_empty() {
            return Err(Unavailable::NoObservations);
        }

        let valid = join_observations(observations, table);
        if valid.is_empty() {
            return Err(Unavailable::NoValidBeacons);
        }

        // Weights are scaled by the shortest range so they stay within (0, 1]
        // even for sub-normal distances
        let shortest = valid.iter().map(|observation| observation.distance_m).fold(f64::INFINITY, f64::min);

        let mut weighted_lat_sum = 0.0;
        let mut weighted_lon_sum = 0.0;
        let mut weight_sum = 0.0;

        for observation in &valid {
            let weight = shortest / observation.distance_m;
            weighted_lat_sum += observation.fix.position.lat * weight;
            weighted_lon_sum += observation.fix.position.lon * weight;
            weight_sum += weight;
        }

        Ok(GeoPoint {
            lat: weighted_lat_sum / weight_sum,
            lon: weighted_lon_sum / weight_sum,
        })
    }
}

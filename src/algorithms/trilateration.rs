//! Closed-form 2D trilateration from the three nearest beacons
//!
//! The nearest beacon becomes the planar origin. Subtracting its circle
//! equation from the other two linearises the problem into
//!
//! ```text
//! A·x + B·y = C
//! D·x + E·y = F
//! ```
//!
//! which is solved directly with Cramer's rule. There is no refinement and
//! no use of a fourth or later beacon.

use nalgebra::{Matrix2, Vector2};

use crate::algorithms::{join_observations, GeoProjection, PositionEstimator};
use crate::core::{
    Algorithm, GeoPoint, Observation, PositionEstimate, ValidObservation, DEGENERATE_DETERMINANT_EPSILON,
    EARTH_MEAN_RADIUS_M, MIN_TRILATERATION_BEACONS,
};
use crate::processing::ReferenceTable;
use crate::validation::Unavailable;

/// Three-beacon circle-intersection estimator
#[derive(Debug, Clone, Copy)]
pub struct TrilaterationEstimator {
    projection: GeoProjection,
    /// Singularity threshold on |det|; a numerical-stability knob (m²)
    determinant_epsilon: f64,
}

impl Default for TrilaterationEstimator {
    fn default() -> Self {
        Self::new(EARTH_MEAN_RADIUS_M, DEGENERATE_DETERMINANT_EPSILON)
    }
}

impl TrilaterationEstimator {
    pub fn new(earth_radius_m: f64, determinant_epsilon: f64) -> Self {
        Self {
            projection: GeoProjection::new(earth_radius_m),
            determinant_epsilon,
        }
    }

    pub fn projection(&self) -> &GeoProjection {
        &self.projection
    }

    /// Solve for the planar point given beacon positions relative to the
    /// first one (which sits at the origin) and the three ranges.
    fn solve_planar(&self, p2: &Vector2<f64>, p3: &Vector2<f64>, ranges: [f64; 3]) -> Option<Vector2<f64>> {
        let p1 = Vector2::<f64>::zeros();
        let [r1, r2, r3] = ranges;

        let system = Matrix2::new(
            2.0 * (p2.x - p1.x), 2.0 * (p2.y - p1.y),
            2.0 * (p3.x - p1.x), 2.0 * (p3.y - p1.y),
        );
        let c = r1 * r1 - r2 * r2 + p2.norm_squared() - p1.norm_squared();
        let f = r1 * r1 - r3 * r3 + p3.norm_squared() - p1.norm_squared();

        let (a, b) = (system[(0, 0)], system[(0, 1)]);
        let (d, e) = (system[(1, 0)], system[(1, 1)]);
        let det = system.determinant();

        if !det.is_finite() || det.abs() < self.determinant_epsilon {
            log::debug!("Trilateration determinant {:.3e} below {:.1e}", det, self.determinant_epsilon);
            return None;
        }

        let solution = Vector2::new((c * e - f * b) / det, (f * a - c * d) / det);
        if !solution.iter().all(|v| v.is_finite()) {
            log::debug!("Trilateration solution overflowed for ranges {:?}", ranges);
            return None;
        }
        Some(solution)
    }
}

impl PositionEstimator for TrilaterationEstimator {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Trilateration
    }

    fn estimate(&self, observations: &[Observation], table: &ReferenceTable) -> PositionEstimate {
        let mut valid: Vec<ValidObservation<'_>> = join_observations(observations, table);

        if valid.len() < MIN_TRILATERATION_BEACONS {
            return Err(Unavailable::InsufficientBeacons { count: valid.len() });
        }

        // Stable sort keeps batch order among equal distances
        valid.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        let nearest = &valid[..MIN_TRILATERATION_BEACONS];

        let origin = nearest[0].fix.position;
        let p2 = self.projection.to_planar(&nearest[1].fix.position, &origin);
        let p3 = self.projection.to_planar(&nearest[2].fix.position, &origin);
        let ranges = [nearest[0].distance_m, nearest[1].distance_m, nearest[2].distance_m];

        let planar = self
            .solve_planar(&p2, &p3, ranges)
            .ok_or(Unavailable::DegenerateGeometry)?;

        let position = self.projection.to_geo(&planar, &origin);
        if !(position.lat.is_finite() && position.lon.is_finite()) {
            return Err(Unavailable::DegenerateGeometry);
        }
        Ok(position)
    }
}

//! Physical constants and numerical defaults

/// Mean Earth radius used by the equirectangular projection (meters)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Below this absolute determinant the trilateration system is treated as singular
pub const DEGENERATE_DETERMINANT_EPSILON: f64 = 1e-6;

/// Trilateration uses exactly this many beacons (the nearest ones)
pub const MIN_TRILATERATION_BEACONS: usize = 3;

//! Geographic <-> local planar coordinate transform
//!
//! Equirectangular approximation anchored at an arbitrary origin:
//! - latitude delta maps straight to meters along y (north)
//! - longitude delta is scaled by the cosine of the mean latitude of
//!   point and origin before mapping to meters along x (east)
//!
//! Accuracy degrades past a few hundred kilometers from the origin; no
//! correction is applied for that range.

use nalgebra::Vector2;

use crate::core::{GeoPoint, EARTH_MEAN_RADIUS_M};

/// Stateless planar projection parameterised by the Earth radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjection {
    earth_radius_m: f64,
}

impl Default for GeoProjection {
    fn default() -> Self {
        Self {
            earth_radius_m: EARTH_MEAN_RADIUS_M,
        }
    }
}

impl GeoProjection {
    pub fn new(earth_radius_m: f64) -> Self {
        Self { earth_radius_m }
    }

    pub fn earth_radius_m(&self) -> f64 {
        self.earth_radius_m
    }

    /// Project `point` to meters east/north of `origin`
    pub fn to_planar(&self, point: &GeoPoint, origin: &GeoPoint) -> Vector2<f64> {
        let mean_lat_rad = ((point.lat + origin.lat) / 2.0).to_radians();
        let lat_diff = (point.lat - origin.lat).to_radians();
        let lon_diff = (point.lon - origin.lon).to_radians();

        Vector2::new(
            self.earth_radius_m * lon_diff * mean_lat_rad.cos(),
            self.earth_radius_m * lat_diff,
        )
    }

    /// Inverse of [`to_planar`](Self::to_planar) for the same origin.
    ///
    /// Latitude is recovered first since y depends on latitude only; the
    /// recovered latitude then gives the same mean-latitude scale the
    /// forward transform used for x.
    ///
    /// Longitude is undefined near the poles, where the cosine scale
    /// approaches zero; results there may be huge or non-finite.
    pub fn to_geo(&self, planar: &Vector2<f64>, origin: &GeoPoint) -> GeoPoint {
        let lat = origin.lat + (planar.y / self.earth_radius_m).to_degrees();
        let mean_lat_rad = ((lat + origin.lat) / 2.0).to_radians();
        let lon = origin.lon + (planar.x / (self.earth_radius_m * mean_lat_rad.cos())).to_degrees();

        GeoPoint { lat, lon }
    }
}

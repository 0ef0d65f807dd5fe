//! Core data types for beacon positioning

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::error::Unavailable;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lon)
    }
}

/// Surveyed beacon with a known coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeaconFix {
    pub id: String,
    pub position: GeoPoint,
}

impl BeaconFix {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            position: GeoPoint::new(lat, lon),
        }
    }
}

/// Live ranging result for one beacon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    /// Estimated distance in meters, `None` when the radio could not range it
    pub distance_m: Option<f64>,
}

impl Observation {
    pub fn new(id: impl Into<String>, distance_m: f64) -> Self {
        Self {
            id: id.into(),
            distance_m: Some(distance_m),
        }
    }

    pub fn without_distance(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            distance_m: None,
        }
    }

    /// Distance if it is usable by the estimators (finite and strictly positive)
    pub fn usable_distance(&self) -> Option<f64> {
        self.distance_m.filter(|d| d.is_finite() && *d > 0.0)
    }
}

/// Observation joined with its reference coordinate; lives for one estimate only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidObservation<'a> {
    pub fix: &'a BeaconFix,
    pub distance_m: f64,
}

/// Positioning algorithms tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    WeightedCentroid,
    Trilateration,
    SatelliteFix,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::WeightedCentroid,
        Algorithm::Trilateration,
        Algorithm::SatelliteFix,
    ];

    /// Whether the algorithm consumes beacon observation batches
    pub fn uses_beacons(&self) -> bool {
        !matches!(self, Algorithm::SatelliteFix)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::WeightedCentroid => "weighted-centroid",
            Algorithm::Trilateration => "trilateration",
            Algorithm::SatelliteFix => "satellite-fix",
        };
        f.write_str(name)
    }
}

/// Outcome of one estimation: a coordinate or the reason none is available
pub type PositionEstimate = Result<GeoPoint, Unavailable>;

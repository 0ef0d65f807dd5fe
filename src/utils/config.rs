use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{DEGENERATE_DETERMINANT_EPSILON, EARTH_MEAN_RADIUS_M};
use crate::validation::ConfigError;

/// When an active satellite-fix slot is refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SatelliteRefresh {
    /// Only on activation and explicit `refresh_satellite_fix` calls
    OnDemand,
    /// Additionally on every observation batch
    EveryBatch,
}

/// Engine-wide configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Earth radius used by the planar projection (meters)
    pub earth_radius_m: f64,
    /// Determinant magnitude below which trilateration reports degenerate geometry
    pub degenerate_determinant_epsilon: f64,
    /// Satellite-fix refresh cadence
    pub satellite_refresh: SatelliteRefresh,
    /// Reference asset files must start with this prefix
    pub reference_file_prefix: String,
    /// Reference asset files must end with this suffix
    pub reference_file_suffix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            earth_radius_m: EARTH_MEAN_RADIUS_M,
            degenerate_determinant_epsilon: DEGENERATE_DETERMINANT_EPSILON,
            satellite_refresh: SatelliteRefresh::OnDemand,
            reference_file_prefix: "beacons_".to_string(),
            reference_file_suffix: ".txt".to_string(),
        }
    }
}

impl EngineConfig {
    /// Check every parameter, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "earth_radius_m".to_string(),
                value: self.earth_radius_m.to_string(),
                reason: "Earth radius must be a positive finite number of meters".to_string(),
            });
        }

        if !self.degenerate_determinant_epsilon.is_finite() || self.degenerate_determinant_epsilon < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "degenerate_determinant_epsilon".to_string(),
                value: self.degenerate_determinant_epsilon.to_string(),
                reason: "Epsilon must be a non-negative finite number".to_string(),
            });
        }

        if self.reference_file_suffix.is_empty() && self.reference_file_prefix.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "reference_file_prefix".to_string(),
                value: String::new(),
                reason: "At least one of prefix or suffix must be set to select reference files".to_string(),
            });
        }

        Ok(())
    }

    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        config.validate()?;
        log::debug!("Loaded engine configuration from {}", path_str);
        Ok(config)
    }

    /// Save configuration to a pretty-printed JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        Ok(())
    }
}

//! Reference asset loader
//!
//! Each asset file is a JSON document of the form
//!
//! ```json
//! { "items": [ { "beaconUid": "0C:F3:EE:00:00:01", "latitude": 52.2297, "longitude": 21.0122 } ] }
//! ```
//!
//! Entries without an id, with an invalid coordinate, or not matching the
//! schema are skipped one by one. A file that cannot be read or is not a
//! JSON document at all fails the whole load.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{BeaconFix, GeoPoint};
use crate::processing::ReferenceTable;
use crate::utils::EngineConfig;
use crate::validation::LoadError;

#[derive(Debug, Deserialize)]
struct BeaconFile {
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct BeaconItem {
    #[serde(rename = "beaconUid", default)]
    beacon_uid: Option<String>,
    latitude: f64,
    longitude: f64,
}

/// Summary of one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Asset files read
    pub files: usize,
    /// Entries turned into beacon fixes
    pub accepted: usize,
    /// Entries dropped as malformed
    pub skipped: usize,
}

impl LoadReport {
    fn merge(&mut self, other: LoadReport) {
        self.files += other.files;
        self.accepted += other.accepted;
        self.skipped += other.skipped;
    }
}

/// Builds reference tables from beacon asset files
#[derive(Debug, Clone)]
pub struct ReferenceLoader {
    file_prefix: String,
    file_suffix: String,
}

impl Default for ReferenceLoader {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ReferenceLoader {
    pub fn new(file_prefix: impl Into<String>, file_suffix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            file_suffix: file_suffix.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.reference_file_prefix.clone(), config.reference_file_suffix.clone())
    }

    /// Parse one asset document
    pub fn parse_str(&self, content: &str) -> Result<(Vec<BeaconFix>, LoadReport), serde_json::Error> {
        let file: BeaconFile = serde_json::from_str(content)?;
        let mut report = LoadReport::default();
        let mut fixes = Vec::new();

        for (index, value) in file.items.unwrap_or_default().into_iter().enumerate() {
            match Self::parse_item(value) {
                Some(fix) => {
                    fixes.push(fix);
                    report.accepted += 1;
                }
                None => {
                    log::warn!("Skipping malformed beacon entry at index {}", index);
                    report.skipped += 1;
                }
            }
        }

        Ok((fixes, report))
    }

    /// Read and parse one asset file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<(Vec<BeaconFix>, LoadReport), LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (fixes, mut report) = self.parse_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        report.files = 1;

        log::debug!(
            "Parsed {}: {} beacons, {} skipped",
            path.display(),
            report.accepted,
            report.skipped
        );
        Ok((fixes, report))
    }

    /// Load every matching asset file in `dir` into one table.
    ///
    /// Files are read in name order so a duplicate id resolves the same way
    /// on every load.
    pub fn load_directory<P: AsRef<Path>>(&self, dir: P) -> Result<(ReferenceTable, LoadReport), LoadError> {
        let dir = dir.as_ref();
        let io_error = |source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let selected = entry
                .file_name()
                .to_str()
                .map(|name| self.is_reference_file(name))
                .unwrap_or(false);
            if selected && entry.path().is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut report = LoadReport::default();
        let mut fixes = Vec::new();
        for path in &paths {
            let (file_fixes, file_report) = self.load_file(path)?;
            fixes.extend(file_fixes);
            report.merge(file_report);
        }

        let table = ReferenceTable::from_fixes(fixes);
        log::info!(
            "Loaded {} reference beacons from {} files in {} ({} entries skipped)",
            table.len(),
            report.files,
            dir.display(),
            report.skipped
        );
        Ok((table, report))
    }

    fn is_reference_file(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.file_prefix) && file_name.ends_with(&self.file_suffix)
    }

    fn parse_item(value: serde_json::Value) -> Option<BeaconFix> {
        let item: BeaconItem = serde_json::from_value(value).ok()?;
        let id = item.beacon_uid.filter(|id| !id.trim().is_empty())?;
        let position = GeoPoint::new(item.latitude, item.longitude);
        if !position.is_valid() {
            return None;
        }
        Some(BeaconFix { id, position })
    }
}

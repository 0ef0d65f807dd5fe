//! Immutable beacon id -> coordinate lookup

use std::collections::HashMap;

use crate::core::{BeaconFix, GeoPoint};

/// Surveyed beacon coordinates, unique by id.
///
/// Never edited in place: a reload builds a new table and the engine swaps
/// it in whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    fixes: HashMap<String, BeaconFix>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table; a later fix with a repeated id replaces the earlier one
    pub fn from_fixes<I>(fixes: I) -> Self
    where
        I: IntoIterator<Item = BeaconFix>,
    {
        let mut table = HashMap::new();
        for fix in fixes {
            if let Some(previous) = table.insert(fix.id.clone(), fix) {
                log::debug!("Beacon {} listed more than once; keeping the later entry", previous.id);
            }
        }
        Self { fixes: table }
    }

    pub fn get(&self, id: &str) -> Option<&BeaconFix> {
        self.fixes.get(id)
    }

    pub fn position(&self, id: &str) -> Option<GeoPoint> {
        self.fixes.get(id).map(|fix| fix.position)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fixes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BeaconFix> {
        self.fixes.values()
    }
}

impl FromIterator<BeaconFix> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = BeaconFix>>(iter: I) -> Self {
        Self::from_fixes(iter)
    }
}

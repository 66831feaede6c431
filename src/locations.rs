//! Static taxi zone lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the zone lookup table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    #[serde(rename = "LocationID")]
    pub location_id: u32,
    #[serde(rename = "Borough", default)]
    pub borough: Option<String>,
    #[serde(rename = "Zone")]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub service_zone: Option<String>,
}

/// Read-only lookup from location id to zone.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    entries: HashMap<u32, Location>,
}

impl LocationTable {
    pub fn new(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            entries: locations
                .into_iter()
                .map(|l| (l.location_id, l))
                .collect(),
        }
    }

    pub fn get(&self, location_id: u32) -> Option<&Location> {
        self.entries.get(&location_id)
    }

    /// Display name for a location id. Unmatched ids yield `None`.
    pub fn zone_name(&self, location_id: u32) -> Option<&str> {
        self.get(location_id)?.zone_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zone count per borough, sorted by borough name. Missing boroughs are grouped under "Unknown".
    pub fn zones_per_borough(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for loc in self.entries.values() {
            *counts
                .entry(loc.borough.as_deref().unwrap_or("Unknown"))
                .or_default() += 1;
        }
        let mut out: Vec<_> = counts
            .into_iter()
            .map(|(b, n)| (b.to_string(), n))
            .collect();
        out.sort();
        out
    }
}

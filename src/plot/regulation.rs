//! Regulation records and the keyed lookup registry
//!
//! Regulations are fetched before a generation run starts and never mutated
//! by the pipeline. A missing record or unset field falls back to the
//! constants in [`EngineConfig`](crate::core::config::EngineConfig).

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::LandUse;

/// Regulatory envelope for a location + land use.
///
/// Every constraint field is optional; resolution order at use sites is
/// user override, then regulation, then hardcoded fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Regulation {
    pub setback: Option<f64>,
    pub floor_area_ratio: Option<f64>,
    /// Fraction of plot area, 0..=1
    pub max_ground_coverage: Option<f64>,
    pub max_height: Option<f64>,
    pub road_width: Option<f64>,
    #[serde(default)]
    pub solar_ready: bool,
    #[serde(default)]
    pub rainwater_harvesting: bool,
}

impl Regulation {
    /// Any active sustainability certification implies a stricter minimum
    /// open-space ratio than the base regulation.
    pub fn has_green_certification(&self) -> bool {
        self.solar_ready || self.rainwater_harvesting
    }
}

/// In-memory regulation store keyed by location + land use
#[derive(Debug, Clone, Default)]
pub struct RegulationRegistry {
    records: AHashMap<(String, LandUse), Regulation>,
}

impl RegulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, location: impl Into<String>, land_use: LandUse, reg: Regulation) {
        self.records.insert((location.into(), land_use), reg);
    }

    pub fn lookup(&self, location: &str, land_use: LandUse) -> Option<&Regulation> {
        self.records.get(&(location.to_string(), land_use))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_keyed_by_location_and_use() {
        let mut reg = RegulationRegistry::new();
        reg.register(
            "zone-a",
            LandUse::Residential,
            Regulation {
                floor_area_ratio: Some(2.5),
                ..Default::default()
            },
        );
        assert!(reg.lookup("zone-a", LandUse::Residential).is_some());
        assert!(reg.lookup("zone-a", LandUse::Commercial).is_none());
        assert!(reg.lookup("zone-b", LandUse::Residential).is_none());
    }

    #[test]
    fn sustainability_flags_mark_certification() {
        let mut r = Regulation::default();
        assert!(!r.has_green_certification());
        r.rainwater_harvesting = true;
        assert!(r.has_green_certification());
    }
}

//! Parameters for one generation run

use serde::{Deserialize, Serialize};

use crate::core::types::{LandUse, ParkingKind, Typology, UtilityKind};

/// Immutable parameter set for a single pipeline run.
///
/// The seed drives every structural placement decision; identical
/// (plot, params, seed) inputs must reproduce identical footprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub typologies: Vec<Typology>,
    /// Clear distance in metres kept between shapes and around perimeter
    /// strategies
    pub spacing: f64,
    /// Footprint rotation in degrees
    pub orientation_deg: f64,
    pub setback_override: Option<f64>,
    pub min_floors: Option<u32>,
    pub max_floors: Option<u32>,
    pub land_use: LandUse,
    pub utilities: Vec<UtilityKind>,
    pub parking: Vec<ParkingKind>,
    pub vastu: bool,
    pub seed: u64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            typologies: vec![Typology::Point],
            spacing: 6.0,
            orientation_deg: 0.0,
            setback_override: None,
            min_floors: None,
            max_floors: None,
            land_use: LandUse::Residential,
            utilities: Vec::new(),
            parking: Vec::new(),
            vastu: false,
            seed: 0,
        }
    }
}

impl GenerationParams {
    /// Requested typologies sorted heaviest first (placement priority order)
    pub fn typologies_by_weight(&self) -> Vec<Typology> {
        let mut out = self.typologies.clone();
        out.sort_by(|a, b| b.placement_weight().cmp(&a.placement_weight()));
        out.dedup();
        out
    }

    pub fn wants_surface_parking(&self) -> bool {
        self.parking.contains(&ParkingKind::Surface)
    }

    pub fn wants_peripheral_road(&self) -> bool {
        self.utilities.contains(&UtilityKind::Roads)
    }
}

//! Engine configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose.
//! Binaries may override values from a TOML file; the pipeline itself only
//! ever reads an immutable [`EngineConfig`].

use serde::Deserialize;

/// Tuning and fallback constants for the generation pipeline
///
/// Fallback values apply whenever a regulation record is missing or a field
/// on it is unset; generation never blocks on missing regulation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === REGULATION FALLBACKS ===
    /// Floor-area ratio assumed when no regulation provides one
    pub fallback_far: f64,

    /// Ground-coverage cap (fraction of plot area) assumed when unset
    pub fallback_coverage: f64,

    /// Height cap in metres assumed when unset
    pub fallback_max_height: f64,

    /// Setback distance in metres assumed when unset
    pub fallback_setback: f64,

    // === MASSING ===
    /// Floor-to-floor height in metres; drives target floor counts and
    /// building heights
    pub floor_to_floor: f64,

    /// Height of each underground parking floor in metres
    pub basement_floor_height: f64,

    /// FAR / coverage overage tolerance before correction or reporting kicks
    /// in. At 1.05, up to 5% overage is accepted as-is.
    pub overage_tolerance: f64,

    /// Minimum open-space fraction enforced when the regulation carries
    /// active sustainability certifications. Tightens (never relaxes) the
    /// coverage ceiling.
    pub cert_min_open_space: f64,

    // === PERIPHERAL ZONES ===
    /// Width in metres of the peripheral surface-parking ring
    pub peripheral_parking_width: f64,

    /// Width in metres of the peripheral internal road ring
    pub peripheral_road_width: f64,

    /// Obstacle buffer in metres applied to manually-authored road
    /// centerlines before placement
    pub road_obstacle_buffer: f64,

    // === PARKING ===
    /// Usable fraction of a parking area after aisles and circulation
    pub parking_efficiency: f64,

    /// Area of a single parking unit in square metres
    pub parking_unit_size: f64,

    /// Stilt parking may be globally disabled by policy
    pub allow_stilt_parking: bool,

    // === OPEN SPACE ===
    /// Fragments below this area (square metres) are discarded as slivers
    pub sliver_min_area: f64,

    /// Outward dilation in metres applied to clip geometry during robust
    /// subtraction so the cut fully consumes shared edges
    pub subtract_epsilon: f64,

    // === PLACEMENT ===
    /// Jittered anchor candidates tried per strategy before falling through
    /// the chain
    pub placement_attempts: u32,

    /// Footprints below this area (square metres) are rejected outright
    pub min_footprint_area: f64,

    // === EXTERNAL UTILITY ZONES (square side lengths, metres) ===
    pub stp_size: f64,
    pub wtp_size: f64,
    pub water_tank_size: f64,
    pub fire_tank_size: f64,
    pub gas_bank_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_far: 2.0,
            fallback_coverage: 0.5,
            fallback_max_height: 15.0,
            fallback_setback: 4.0,
            floor_to_floor: 3.0,
            basement_floor_height: 2.8,
            overage_tolerance: 1.05,
            cert_min_open_space: 0.30,
            peripheral_parking_width: 5.0,
            peripheral_road_width: 6.0,
            road_obstacle_buffer: 3.0,
            parking_efficiency: 0.75,
            parking_unit_size: 12.5,
            allow_stilt_parking: true,
            sliver_min_area: 10.0,
            subtract_epsilon: 0.05,
            placement_attempts: 12,
            min_footprint_area: 25.0,
            stp_size: 12.0,
            wtp_size: 10.0,
            water_tank_size: 8.0,
            fire_tank_size: 6.0,
            gas_bank_size: 5.0,
        }
    }
}

impl EngineConfig {
    /// Parse overrides from a TOML string; unset keys keep their defaults
    pub fn from_toml(text: &str) -> crate::core::error::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Side length of the external utility zone square for `kind`
    pub fn utility_zone_size(&self, kind: crate::core::types::UtilityKind) -> f64 {
        use crate::core::types::UtilityKind;
        match kind {
            UtilityKind::Stp => self.stp_size,
            UtilityKind::Wtp => self.wtp_size,
            UtilityKind::WaterTank => self.water_tank_size,
            UtilityKind::FireTank => self.fire_tank_size,
            UtilityKind::Gas => self.gas_bank_size,
            // internal utilities and roads have no square zone
            UtilityKind::Hvac | UtilityKind::Electrical | UtilityKind::Roads => 0.0,
        }
    }
}

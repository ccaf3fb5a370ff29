//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotId(pub Uuid);

impl PlotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub Uuid);

impl BuildingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BuildingId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for derived/authored area records (green, parking,
/// utility, buildable, entries, roads)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaId(pub Uuid);

impl AreaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AreaId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who created a sub-collection entity.
///
/// Regeneration fully replaces `Generated` entries and never touches
/// `Authored` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    Authored,
    Generated,
}

/// Intended land use for the plot / a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandUse {
    Residential,
    Commercial,
    MixedUse,
    Institutional,
}

/// Building typology - the massing shape requested for generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Typology {
    Point,
    Slab,
    LShaped,
    TShaped,
    UShaped,
    HShaped,
    Perimeter,
}

impl Typology {
    /// Placement weight: heavier typologies claim priority sectors first
    pub fn placement_weight(&self) -> u8 {
        match self {
            Typology::HShaped => 7,
            Typology::UShaped => 6,
            Typology::LShaped => 5,
            Typology::TShaped => 4,
            Typology::Slab => 3,
            Typology::Perimeter => 2,
            Typology::Point => 1,
        }
    }

    /// Ordered fallback chain: if the exact shape cannot be placed, the
    /// orchestrator walks this list so an unsatisfiable request still yields
    /// some footprint.
    pub fn fallback_chain(&self) -> &'static [Typology] {
        match self {
            Typology::HShaped => &[
                Typology::HShaped,
                Typology::UShaped,
                Typology::Slab,
                Typology::Point,
            ],
            Typology::UShaped => &[
                Typology::UShaped,
                Typology::LShaped,
                Typology::Slab,
                Typology::Point,
            ],
            Typology::LShaped => &[Typology::LShaped, Typology::Slab, Typology::Point],
            Typology::TShaped => &[Typology::TShaped, Typology::Slab, Typology::Point],
            Typology::Perimeter => &[Typology::Perimeter, Typology::Slab, Typology::Point],
            Typology::Slab => &[Typology::Slab, Typology::Point],
            Typology::Point => &[Typology::Point],
        }
    }

    /// Number of wing polygons the shape generator emits for this typology
    pub fn wing_count(&self) -> usize {
        match self {
            Typology::Point | Typology::Slab => 1,
            Typology::LShaped | Typology::TShaped => 2,
            Typology::UShaped | Typology::HShaped => 3,
            Typology::Perimeter => 4,
        }
    }
}

/// Parking configurations a generation run may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParkingKind {
    /// Peripheral or plot-level lot; never attached to a building
    Surface,
    /// Two basement floors at negative levels
    Underground,
    /// One open floor at level 0, building base raised by one floor height
    Stilt,
}

/// Utility kinds; internal ones become building floors, external ones become
/// anchored zones on the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtilityKind {
    /// Rooftop plant floor
    Hvac,
    /// Base-level electrical floor
    Electrical,
    /// Sewage treatment plant
    Stp,
    /// Water treatment plant
    Wtp,
    WaterTank,
    FireTank,
    Gas,
    /// Peripheral internal road ring
    Roads,
}

impl UtilityKind {
    /// Internal utilities attach to buildings as floors; external ones are
    /// standalone zones on the plot.
    pub fn is_internal(&self) -> bool {
        matches!(self, UtilityKind::Hvac | UtilityKind::Electrical)
    }
}

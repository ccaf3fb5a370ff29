//! Plot, building, and area-collection types
//!
//! The plot owns every sub-collection; each entity carries a [`Provenance`]
//! tag so regeneration can fully replace generated entries without touching
//! anything the user authored by hand.

use geo::{Area, Centroid, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::core::types::{
    AreaId, BuildingId, LandUse, ParkingKind, PlotId, Provenance, Typology, UtilityKind,
};
use crate::geometry::repair::polygon_from_vertices;

/// A boundary side of the plot with road access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

/// One storey of a building.
///
/// Level 0 is the ground floor; basement parking sits at negative levels.
/// The optional tags mark floors inserted by utility/parking attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub level: i32,
    pub height: f64,
    /// Cosmetic only; drawn from the unseeded generator
    pub color: [u8; 3],
    pub parking: Option<ParkingKind>,
    pub utility: Option<UtilityKind>,
}

impl Floor {
    pub fn plain(level: i32, height: f64, color: [u8; 3]) -> Self {
        Self {
            level,
            height,
            color,
            parking: None,
            utility: None,
        }
    }
}

/// A generated or authored building with its ordered floor stack
#[derive(Debug, Clone)]
pub struct Building {
    pub id: BuildingId,
    pub footprint: Polygon<f64>,
    pub typology: Typology,
    pub land_use: LandUse,
    pub floors: Vec<Floor>,
    pub provenance: Provenance,
}

impl Building {
    pub fn footprint_area(&self) -> f64 {
        self.footprint.unsigned_area()
    }

    pub fn centroid(&self) -> Option<Point<f64>> {
        self.footprint.centroid()
    }

    /// Above-grade height; stilt decks count, basements do not
    pub fn height(&self) -> f64 {
        self.floors
            .iter()
            .filter(|f| f.level >= 0)
            .map(|f| f.height)
            .sum()
    }

    /// Floors counted toward FAR: above grade, neither parking decks nor
    /// service floors
    pub fn counted_floors(&self) -> usize {
        self.floors
            .iter()
            .filter(|f| f.level >= 0 && f.parking.is_none() && f.utility.is_none())
            .count()
    }

    /// FAR contribution of this building
    pub fn gross_floor_area(&self) -> f64 {
        self.footprint_area() * self.counted_floors() as f64
    }
}

/// Residual open space fragment, fully derived
#[derive(Debug, Clone)]
pub struct GreenArea {
    pub id: AreaId,
    pub geometry: Polygon<f64>,
    pub area: f64,
    pub centroid: Point<f64>,
    pub provenance: Provenance,
}

impl GreenArea {
    /// Build a green area from a fragment, caching its derived fields
    pub fn from_fragment(geometry: Polygon<f64>, provenance: Provenance) -> Option<Self> {
        let area = geometry.unsigned_area();
        let centroid = geometry.centroid()?;
        Some(Self {
            id: AreaId::new(),
            geometry,
            area,
            centroid,
            provenance,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ParkingArea {
    pub id: AreaId,
    pub geometry: Polygon<f64>,
    pub kind: ParkingKind,
    pub capacity: u32,
    /// Carved from the peripheral ring rather than placed on the plot interior
    pub peripheral: bool,
    pub provenance: Provenance,
}

#[derive(Debug, Clone)]
pub struct UtilityArea {
    pub id: AreaId,
    pub geometry: Polygon<f64>,
    pub kind: UtilityKind,
    pub peripheral: bool,
    pub provenance: Provenance,
}

/// One chunk of the buildable envelope after setback/peripheral carving
#[derive(Debug, Clone)]
pub struct BuildableArea {
    pub id: AreaId,
    pub geometry: Polygon<f64>,
    pub provenance: Provenance,
}

/// Site entry point on a road-access side
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: AreaId,
    pub position: Point<f64>,
    pub side: Side,
    pub provenance: Provenance,
}

/// A road centerline; authored roads are buffered into placement obstacles
#[derive(Debug, Clone)]
pub struct Road {
    pub id: AreaId,
    pub centerline: LineString<f64>,
    pub width: f64,
    pub provenance: Provenance,
}

/// A development plot and everything on it
#[derive(Debug, Clone)]
pub struct Plot {
    pub id: PlotId,
    pub name: String,
    pub boundary: Polygon<f64>,
    pub setback: f64,
    pub road_access: Vec<Side>,
    /// Key into the regulation registry (location + land use resolves there)
    pub regulation_key: Option<String>,
    pub buildings: Vec<Building>,
    pub green_areas: Vec<GreenArea>,
    pub parking_areas: Vec<ParkingArea>,
    pub utility_areas: Vec<UtilityArea>,
    pub buildable_areas: Vec<BuildableArea>,
    pub entries: Vec<Entry>,
    pub roads: Vec<Road>,
}

impl Plot {
    pub fn new(name: impl Into<String>, boundary: Polygon<f64>, setback: f64) -> Self {
        Self {
            id: PlotId::new(),
            name: name.into(),
            boundary,
            setback,
            road_access: vec![Side::South],
            regulation_key: None,
            buildings: Vec::new(),
            green_areas: Vec::new(),
            parking_areas: Vec::new(),
            utility_areas: Vec::new(),
            buildable_areas: Vec::new(),
            entries: Vec::new(),
            roads: Vec::new(),
        }
    }

    /// Axis-aligned rectangular plot anchored at the origin
    pub fn rectangular(name: impl Into<String>, width: f64, depth: f64, setback: f64) -> Self {
        let boundary =
            polygon_from_vertices(&[[0.0, 0.0], [width, 0.0], [width, depth], [0.0, depth]])
                .unwrap_or_else(|| Polygon::new(LineString::new(vec![]), vec![]));
        Self::new(name, boundary, setback)
    }

    pub fn area(&self) -> f64 {
        self.boundary.unsigned_area()
    }

    pub fn has_boundary(&self) -> bool {
        self.boundary.exterior().0.len() >= 4 && self.area() > 0.0
    }

    /// Strip every generated entry from the derived collections, keeping
    /// authored geometry intact. Regeneration calls this before writing the
    /// fresh set.
    pub fn clear_generated(&mut self) {
        self.buildings.retain(|b| b.provenance == Provenance::Authored);
        self.green_areas.retain(|g| g.provenance == Provenance::Authored);
        self.parking_areas.retain(|p| p.provenance == Provenance::Authored);
        self.utility_areas.retain(|u| u.provenance == Provenance::Authored);
        self.buildable_areas.retain(|a| a.provenance == Provenance::Authored);
        self.entries.retain(|e| e.provenance == Provenance::Authored);
    }
}

/// Base tone per land use for the cosmetic floor gradient
fn base_tone(land_use: LandUse) -> [u8; 3] {
    match land_use {
        LandUse::Residential => [196, 148, 90],
        LandUse::Commercial => [96, 140, 200],
        LandUse::MixedUse => [150, 120, 170],
        LandUse::Institutional => [120, 170, 140],
    }
}

/// Cosmetic floor color gradient: base tone lightened per level with a small
/// random jitter. Callers pass the unseeded generator so this never perturbs
/// structural determinism.
pub fn floor_gradient(land_use: LandUse, count: usize, rng: &mut impl rand::Rng) -> Vec<[u8; 3]> {
    let base = base_tone(land_use);
    (0..count)
        .map(|i| {
            let lift = (i as f64 / count.max(1) as f64 * 40.0) as i16;
            let jitter: i16 = rng.gen_range(-6..=6);
            let mut c = [0u8; 3];
            for (k, channel) in base.iter().enumerate() {
                c[k] = (*channel as i16 + lift + jitter).clamp(0, 255) as u8;
            }
            c
        })
        .collect()
}

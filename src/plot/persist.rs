//! Serde records for plot persistence
//!
//! These structs define the stored JSON shape of a plot and everything on it.
//! Geometry fields round-trip through the ring schema in
//! [`geometry::codec`](crate::geometry::codec); a record whose geometry fails
//! to decode is dropped with a warning rather than failing the whole plot.

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SiteplanError};
use crate::core::types::{
    AreaId, BuildingId, LandUse, ParkingKind, PlotId, Provenance, Typology, UtilityKind,
};
use crate::geometry::codec::{decode_polygon, encode_polygon, PolygonRecord};
use crate::plot::model::{
    BuildableArea, Building, Entry, Floor, GreenArea, ParkingArea, Plot, Road, Side, UtilityArea,
};

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub id: BuildingId,
    pub typology: Typology,
    pub land_use: LandUse,
    pub provenance: Provenance,
    pub floors: Vec<Floor>,
    pub footprint: PolygonRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreenAreaRecord {
    pub id: AreaId,
    pub provenance: Provenance,
    pub geometry: PolygonRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingAreaRecord {
    pub id: AreaId,
    pub kind: ParkingKind,
    pub capacity: u32,
    pub peripheral: bool,
    pub provenance: Provenance,
    pub geometry: PolygonRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilityAreaRecord {
    pub id: AreaId,
    pub kind: UtilityKind,
    pub peripheral: bool,
    pub provenance: Provenance,
    pub geometry: PolygonRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildableAreaRecord {
    pub id: AreaId,
    pub provenance: Provenance,
    pub geometry: PolygonRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: AreaId,
    pub side: Side,
    pub position: [f64; 2],
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadRecord {
    pub id: AreaId,
    pub width: f64,
    pub provenance: Provenance,
    pub centerline: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotRecord {
    pub id: PlotId,
    pub name: String,
    pub setback: f64,
    pub road_access: Vec<Side>,
    pub regulation_key: Option<String>,
    pub boundary: PolygonRecord,
    pub buildings: Vec<BuildingRecord>,
    pub green_areas: Vec<GreenAreaRecord>,
    pub parking_areas: Vec<ParkingAreaRecord>,
    pub utility_areas: Vec<UtilityAreaRecord>,
    pub buildable_areas: Vec<BuildableAreaRecord>,
    pub entries: Vec<EntryRecord>,
    pub roads: Vec<RoadRecord>,
}

// ============================================================================
// ENCODE / DECODE
// ============================================================================

pub fn encode_plot(plot: &Plot) -> PlotRecord {
    PlotRecord {
        id: plot.id,
        name: plot.name.clone(),
        setback: plot.setback,
        road_access: plot.road_access.clone(),
        regulation_key: plot.regulation_key.clone(),
        boundary: encode_polygon(&plot.boundary),
        buildings: plot
            .buildings
            .iter()
            .map(|b| BuildingRecord {
                id: b.id,
                typology: b.typology,
                land_use: b.land_use,
                provenance: b.provenance,
                floors: b.floors.clone(),
                footprint: encode_polygon(&b.footprint),
            })
            .collect(),
        green_areas: plot
            .green_areas
            .iter()
            .map(|g| GreenAreaRecord {
                id: g.id,
                provenance: g.provenance,
                geometry: encode_polygon(&g.geometry),
            })
            .collect(),
        parking_areas: plot
            .parking_areas
            .iter()
            .map(|p| ParkingAreaRecord {
                id: p.id,
                kind: p.kind,
                capacity: p.capacity,
                peripheral: p.peripheral,
                provenance: p.provenance,
                geometry: encode_polygon(&p.geometry),
            })
            .collect(),
        utility_areas: plot
            .utility_areas
            .iter()
            .map(|u| UtilityAreaRecord {
                id: u.id,
                kind: u.kind,
                peripheral: u.peripheral,
                provenance: u.provenance,
                geometry: encode_polygon(&u.geometry),
            })
            .collect(),
        buildable_areas: plot
            .buildable_areas
            .iter()
            .map(|a| BuildableAreaRecord {
                id: a.id,
                provenance: a.provenance,
                geometry: encode_polygon(&a.geometry),
            })
            .collect(),
        entries: plot
            .entries
            .iter()
            .map(|e| EntryRecord {
                id: e.id,
                side: e.side,
                position: [e.position.x(), e.position.y()],
                provenance: e.provenance,
            })
            .collect(),
        roads: plot
            .roads
            .iter()
            .map(|r| RoadRecord {
                id: r.id,
                width: r.width,
                provenance: r.provenance,
                centerline: r.centerline.0.iter().map(|c| [c.x, c.y]).collect(),
            })
            .collect(),
    }
}

/// Rebuild a plot from its stored record.
///
/// A missing/degenerate boundary is the only hard failure; collection
/// entries with undecodable geometry are dropped. Derived fields (area,
/// centroid) are recomputed on decode.
pub fn decode_plot(record: &PlotRecord) -> Result<Plot> {
    let boundary = decode_polygon(&record.boundary).ok_or(SiteplanError::MissingBoundary)?;
    let mut plot = Plot::new(record.name.clone(), boundary, record.setback);
    plot.id = record.id;
    plot.road_access = record.road_access.clone();
    plot.regulation_key = record.regulation_key.clone();

    for b in &record.buildings {
        match decode_polygon(&b.footprint) {
            Some(footprint) => plot.buildings.push(Building {
                id: b.id,
                footprint,
                typology: b.typology,
                land_use: b.land_use,
                floors: b.floors.clone(),
                provenance: b.provenance,
            }),
            None => tracing::warn!(?b.id, "dropping building with undecodable footprint"),
        }
    }
    for g in &record.green_areas {
        match decode_polygon(&g.geometry).and_then(|p| GreenArea::from_fragment(p, g.provenance)) {
            Some(mut green) => {
                green.id = g.id;
                plot.green_areas.push(green);
            }
            None => tracing::warn!(?g.id, "dropping green area with undecodable geometry"),
        }
    }
    for p in &record.parking_areas {
        match decode_polygon(&p.geometry) {
            Some(geometry) => plot.parking_areas.push(ParkingArea {
                id: p.id,
                geometry,
                kind: p.kind,
                capacity: p.capacity,
                peripheral: p.peripheral,
                provenance: p.provenance,
            }),
            None => tracing::warn!(?p.id, "dropping parking area with undecodable geometry"),
        }
    }
    for u in &record.utility_areas {
        match decode_polygon(&u.geometry) {
            Some(geometry) => plot.utility_areas.push(UtilityArea {
                id: u.id,
                geometry,
                kind: u.kind,
                peripheral: u.peripheral,
                provenance: u.provenance,
            }),
            None => tracing::warn!(?u.id, "dropping utility area with undecodable geometry"),
        }
    }
    for a in &record.buildable_areas {
        match decode_polygon(&a.geometry) {
            Some(geometry) => plot.buildable_areas.push(BuildableArea {
                id: a.id,
                geometry,
                provenance: a.provenance,
            }),
            None => tracing::warn!(?a.id, "dropping buildable area with undecodable geometry"),
        }
    }
    for e in &record.entries {
        plot.entries.push(Entry {
            id: e.id,
            position: Point::new(e.position[0], e.position[1]),
            side: e.side,
            provenance: e.provenance,
        });
    }
    for r in &record.roads {
        if r.centerline.len() < 2 {
            tracing::warn!(?r.id, "dropping road with degenerate centerline");
            continue;
        }
        plot.roads.push(Road {
            id: r.id,
            centerline: LineString::from(
                r.centerline.iter().map(|[x, y]| (*x, *y)).collect::<Vec<_>>(),
            ),
            width: r.width,
            provenance: r.provenance,
        });
    }
    Ok(plot)
}

pub fn plot_to_json(plot: &Plot) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode_plot(plot))?)
}

pub fn plot_from_json(text: &str) -> Result<Plot> {
    let record: PlotRecord = serde_json::from_str(text)?;
    decode_plot(&record)
}

//! Utility and parking attachment
//!
//! Internal utilities become extra building floors (HVAC at the roof,
//! Electrical at the base). Parking becomes basement/stilt floors or a
//! standalone surface area. External utilities become fixed-size squares
//! anchored to deterministic corners/edges of the buildable bounding box.

use geo::{Area, BoundingRect, Polygon, Rect};

use crate::core::types::{AreaId, ParkingKind, Provenance, UtilityKind};
use crate::geometry::repair::polygon_from_vertices;
use crate::pipeline::workspace::{Notice, PlotWorkspace};
use crate::plot::model::{Floor, ParkingArea, UtilityArea};

const UTILITY_FLOOR_COLOR: [u8; 3] = [110, 110, 118];
const PARKING_FLOOR_COLOR: [u8; 3] = [70, 70, 76];

/// Attach requested utilities and parking to the generated layout
pub fn attach_amenities(mut ws: PlotWorkspace) -> PlotWorkspace {
    attach_utility_floors(&mut ws);
    attach_parking_floors(&mut ws);
    attach_surface_parking(&mut ws);
    attach_peripheral_road(&mut ws);
    attach_external_zones(&mut ws);
    ws
}

/// HVAC appends at the roof; Electrical prepends at the base, shifting every
/// other floor up. Utility floors are only ever removed by full regeneration.
fn attach_utility_floors(ws: &mut PlotWorkspace) {
    let wants_hvac = ws.params.utilities.contains(&UtilityKind::Hvac);
    let wants_electrical = ws.params.utilities.contains(&UtilityKind::Electrical);
    if !wants_hvac && !wants_electrical {
        return;
    }
    let floor_height = ws.config.floor_to_floor;
    for building in ws
        .plot
        .buildings
        .iter_mut()
        .filter(|b| b.provenance == Provenance::Generated)
    {
        if wants_electrical {
            for floor in building.floors.iter_mut() {
                if floor.level >= 0 {
                    floor.level += 1;
                }
            }
            building.floors.insert(
                0,
                Floor {
                    level: 0,
                    height: floor_height,
                    color: UTILITY_FLOOR_COLOR,
                    parking: None,
                    utility: Some(UtilityKind::Electrical),
                },
            );
        }
        if wants_hvac {
            let top = building
                .floors
                .iter()
                .map(|f| f.level)
                .max()
                .unwrap_or(-1);
            building.floors.push(Floor {
                level: top + 1,
                height: floor_height,
                color: UTILITY_FLOOR_COLOR,
                parking: None,
                utility: Some(UtilityKind::Hvac),
            });
        }
    }
}

/// Underground parking adds two basement floors; stilt parking inserts one
/// open level-0 deck, raising the habitable base by one floor height.
fn attach_parking_floors(ws: &mut PlotWorkspace) {
    let underground = ws.params.parking.contains(&ParkingKind::Underground);
    let stilt =
        ws.params.parking.contains(&ParkingKind::Stilt) && ws.config.allow_stilt_parking;
    if ws.params.parking.contains(&ParkingKind::Stilt) && !ws.config.allow_stilt_parking {
        tracing::info!("stilt parking disabled by policy; skipping");
    }
    if !underground && !stilt {
        return;
    }
    let basement_height = ws.config.basement_floor_height;
    let floor_height = ws.config.floor_to_floor;
    for building in ws
        .plot
        .buildings
        .iter_mut()
        .filter(|b| b.provenance == Provenance::Generated)
    {
        if underground {
            for level in [-1, -2] {
                building.floors.push(Floor {
                    level,
                    height: basement_height,
                    color: PARKING_FLOOR_COLOR,
                    parking: Some(ParkingKind::Underground),
                    utility: None,
                });
            }
        }
        if stilt {
            for floor in building.floors.iter_mut() {
                if floor.level >= 0 {
                    floor.level += 1;
                }
            }
            building.floors.insert(
                0,
                Floor {
                    level: 0,
                    height: floor_height,
                    color: PARKING_FLOOR_COLOR,
                    parking: Some(ParkingKind::Stilt),
                    utility: None,
                },
            );
        }
    }
}

/// Surface parking is never attached to a building; it becomes a peripheral
/// ring zone when one was carved, or a plot-level corner lot otherwise.
fn attach_surface_parking(ws: &mut PlotWorkspace) {
    if !ws.params.wants_surface_parking() {
        return;
    }
    let geometry = match ws.parking_zone.clone() {
        Some(ring) => Some((ring, true)),
        None => corner_lot(ws).map(|p| (p, false)),
    };
    match geometry {
        Some((geometry, peripheral)) => {
            let capacity = surface_capacity(&geometry, ws);
            ws.plot.parking_areas.push(ParkingArea {
                id: AreaId::new(),
                geometry,
                kind: ParkingKind::Surface,
                capacity,
                peripheral,
                provenance: Provenance::Generated,
            });
        }
        None => tracing::warn!("no room for a surface parking lot"),
    }
}

fn surface_capacity(geometry: &Polygon<f64>, ws: &PlotWorkspace) -> u32 {
    let usable = geometry.unsigned_area() * ws.config.parking_efficiency;
    (usable / ws.config.parking_unit_size).floor() as u32
}

/// The carved road ring becomes a peripheral Roads utility zone
fn attach_peripheral_road(ws: &mut PlotWorkspace) {
    if !ws.params.wants_peripheral_road() {
        return;
    }
    if let Some(ring) = ws.road_zone.clone() {
        ws.plot.utility_areas.push(UtilityArea {
            id: AreaId::new(),
            geometry: ring,
            kind: UtilityKind::Roads,
            peripheral: true,
            provenance: Provenance::Generated,
        });
    } else {
        ws.notice(Notice::UtilityPlacementFailed(UtilityKind::Roads));
    }
}

/// External utility squares anchored to deterministic corner/edge offsets of
/// the buildable bounding box. A square that collides with a building or an
/// earlier square is skipped with an advisory notice.
fn attach_external_zones(ws: &mut PlotWorkspace) {
    let kinds: Vec<UtilityKind> = ws
        .params
        .utilities
        .iter()
        .copied()
        .filter(|k| !k.is_internal() && *k != UtilityKind::Roads)
        .collect();
    if kinds.is_empty() {
        return;
    }
    let Some(bbox) = buildable_bbox(ws) else {
        for kind in kinds {
            ws.notice(Notice::UtilityPlacementFailed(kind));
        }
        return;
    };
    for kind in kinds {
        let size = ws.config.utility_zone_size(kind);
        let Some(square) = anchored_square(&bbox, kind, size) else {
            ws.notice(Notice::UtilityPlacementFailed(kind));
            continue;
        };
        let collides = ws
            .plot
            .buildings
            .iter()
            .map(|b| &b.footprint)
            .chain(ws.plot.utility_areas.iter().map(|u| &u.geometry))
            .any(|g| crate::pipeline::placement::overlap_area(&square, g) > 1e-3);
        if collides {
            tracing::debug!(?kind, "utility square collides with an earlier placement; skipped");
            ws.notice(Notice::UtilityPlacementFailed(kind));
            continue;
        }
        ws.obstacles.push(square.clone());
        ws.plot.utility_areas.push(UtilityArea {
            id: AreaId::new(),
            geometry: square,
            kind,
            peripheral: false,
            provenance: Provenance::Generated,
        });
    }
}

fn buildable_bbox(ws: &PlotWorkspace) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;
    for chunk in &ws.valid_chunks {
        let b = chunk.bounding_rect()?;
        bounds = Some(match bounds {
            None => b,
            Some(acc) => Rect::new(
                geo::coord! { x: acc.min().x.min(b.min().x), y: acc.min().y.min(b.min().y) },
                geo::coord! { x: acc.max().x.max(b.max().x), y: acc.max().y.max(b.max().y) },
            ),
        });
    }
    bounds
}

/// Fixed anchor per kind: STP southwest, WTP southeast, water northwest,
/// fire northeast, gas mid east edge
fn anchored_square(bbox: &Rect<f64>, kind: UtilityKind, size: f64) -> Option<Polygon<f64>> {
    if size <= 0.0 || bbox.width() < size || bbox.height() < size {
        return None;
    }
    let (min, max) = (bbox.min(), bbox.max());
    let (x0, y0) = match kind {
        UtilityKind::Stp => (min.x, min.y),
        UtilityKind::Wtp => (max.x - size, min.y),
        UtilityKind::WaterTank => (min.x, max.y - size),
        UtilityKind::FireTank => (max.x - size, max.y - size),
        UtilityKind::Gas => (max.x - size, (min.y + max.y) / 2.0 - size / 2.0),
        _ => return None,
    };
    polygon_from_vertices(&[
        [x0, y0],
        [x0 + size, y0],
        [x0 + size, y0 + size],
        [x0, y0 + size],
    ])
}

/// Plot-level fallback lot in the first buildable corner free of buildings
fn corner_lot(ws: &PlotWorkspace) -> Option<Polygon<f64>> {
    let bbox = buildable_bbox(ws)?;
    let side = (bbox.width().min(bbox.height()) * 0.25).min(20.0);
    if side < 5.0 {
        return None;
    }
    let (min, max) = (bbox.min(), bbox.max());
    let corners = [
        (min.x, min.y),
        (max.x - side, min.y),
        (min.x, max.y - side),
        (max.x - side, max.y - side),
    ];
    for (x0, y0) in corners {
        let lot = polygon_from_vertices(&[
            [x0, y0],
            [x0 + side, y0],
            [x0 + side, y0 + side],
            [x0, y0 + side],
        ])?;
        let collides = ws.plot.buildings.iter().any(|b| {
            crate::pipeline::placement::overlap_area(&lot, &b.footprint) > 1e-3
        });
        if !collides {
            return Some(lot);
        }
    }
    None
}

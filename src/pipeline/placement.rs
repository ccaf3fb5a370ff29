//! Typology placement orchestration
//!
//! Walks each requested typology's strategy chain over every buildable
//! chunk, collision-testing wing polygons against a shared obstacle list.
//! Rejections are silent and frequent; the fallback chain guarantees an
//! unsatisfiable exact request still tends to yield some footprint.

use geo::{Area, BooleanOps, BoundingRect, Contains, MultiPolygon, Point, Polygon, Translate};
use rand::Rng;

use crate::core::types::{Provenance, Typology};
use crate::geometry::buffer::{buffer_centerline, offset_polygon};
use crate::pipeline::strategies::{strategy_for, PlacementContext};
use crate::pipeline::workspace::{Notice, PlotWorkspace};
use crate::plot::model::{floor_gradient, Building, Floor};

/// Pairwise footprint overlap above this area (square metres) counts as a
/// collision
const OVERLAP_EPSILON: f64 = 1e-3;

/// Place every requested typology, heaviest first
pub fn place_typologies(mut ws: PlotWorkspace) -> PlotWorkspace {
    seed_obstacles(&mut ws);
    let chunks = ws.valid_chunks.clone();
    let ctx = PlacementContext {
        max_single_footprint: ws.envelope.avg_footprint,
        spacing: ws.params.spacing,
        orientation_deg: ws.params.orientation_deg,
    };

    for requested in ws.params.typologies_by_weight() {
        let mut placed_any = false;
        for chunk in &chunks {
            if try_place_in_chunk(&mut ws, requested, chunk, &ctx) {
                placed_any = true;
            }
        }
        if !placed_any && !chunks.is_empty() {
            tracing::debug!(?requested, "typology yielded no footprint in any chunk");
            ws.notice(Notice::NothingPlaced(requested));
        }
    }
    ws
}

/// Obstacles every run starts from: vastu reservations are already present;
/// add buffered authored roads and authored building footprints.
fn seed_obstacles(ws: &mut PlotWorkspace) {
    let road_quads: Vec<Polygon<f64>> = ws
        .plot
        .roads
        .iter()
        .flat_map(|r| {
            buffer_centerline(&r.centerline, r.width.max(ws.config.road_obstacle_buffer))
        })
        .collect();
    ws.obstacles.extend(road_quads);
    let authored: Vec<Polygon<f64>> = ws
        .plot
        .buildings
        .iter()
        .filter(|b| b.provenance == Provenance::Authored)
        .map(|b| b.footprint.clone())
        .collect();
    ws.obstacles.extend(authored);
}

/// Walk the fallback chain for one typology inside one chunk.
///
/// Returns true when at least one wing was accepted.
fn try_place_in_chunk(
    ws: &mut PlotWorkspace,
    requested: Typology,
    chunk: &Polygon<f64>,
    ctx: &PlacementContext,
) -> bool {
    let anchors = candidate_anchors(ws, requested, chunk);
    for fallback in requested.fallback_chain() {
        let strategy = strategy_for(*fallback);
        for anchor in &anchors {
            let wings = strategy.propose(chunk, *anchor, ctx);
            if wings.is_empty() {
                // sizing failed; larger anchors won't change that
                break;
            }
            let wings = slide_into_chunk(wings, chunk);
            let accepted = accept_wings(ws, chunk, &wings);
            if !accepted.is_empty() {
                for wing in accepted {
                    ws.obstacles.push(wing.clone());
                    let building = make_building(ws, *fallback, wing);
                    ws.plot.buildings.push(building);
                }
                return true;
            }
        }
    }
    false
}

/// Anchor candidates: the typology's bias target, the chunk centroid, then
/// seeded jitter across the chunk's bounding box
fn candidate_anchors(
    ws: &mut PlotWorkspace,
    typology: Typology,
    chunk: &Polygon<f64>,
) -> Vec<Point<f64>> {
    let mut anchors = Vec::new();
    if let Some(bias) = ws.bias_for(typology) {
        anchors.push(bias);
    }
    if let Some(c) = geo::Centroid::centroid(chunk) {
        anchors.push(c);
    }
    if let Some(bbox) = chunk.bounding_rect() {
        for _ in 0..ws.config.placement_attempts {
            let x = ws.rng.gen_range(bbox.min().x..=bbox.max().x);
            let y = ws.rng.gen_range(bbox.min().y..=bbox.max().y);
            anchors.push(Point::new(x, y));
        }
    }
    anchors
}

/// Translate the wing set so its collective bounding box sits inside the
/// chunk's, preserving the shape's internal layout
fn slide_into_chunk(wings: Vec<Polygon<f64>>, chunk: &Polygon<f64>) -> Vec<Polygon<f64>> {
    let Some(chunk_bbox) = chunk.bounding_rect() else {
        return wings;
    };
    let mut set_bbox: Option<geo::Rect<f64>> = None;
    for wing in &wings {
        if let Some(b) = wing.bounding_rect() {
            set_bbox = Some(match set_bbox {
                None => b,
                Some(acc) => geo::Rect::new(
                    geo::coord! { x: acc.min().x.min(b.min().x), y: acc.min().y.min(b.min().y) },
                    geo::coord! { x: acc.max().x.max(b.max().x), y: acc.max().y.max(b.max().y) },
                ),
            });
        }
    }
    let Some(set) = set_bbox else {
        return wings;
    };
    let mut dx = 0.0;
    let mut dy = 0.0;
    if set.min().x < chunk_bbox.min().x {
        dx = chunk_bbox.min().x - set.min().x;
    } else if set.max().x > chunk_bbox.max().x {
        dx = chunk_bbox.max().x - set.max().x;
    }
    if set.min().y < chunk_bbox.min().y {
        dy = chunk_bbox.min().y - set.min().y;
    } else if set.max().y > chunk_bbox.max().y {
        dy = chunk_bbox.max().y - set.max().y;
    }
    if dx == 0.0 && dy == 0.0 {
        return wings;
    }
    wings.into_iter().map(|w| w.translate(dx, dy)).collect()
}

/// Independently collision-test each wing; accepted wings immediately join
/// the obstacle set for their siblings. Rejected wings are dropped without
/// retry.
fn accept_wings(
    ws: &PlotWorkspace,
    chunk: &Polygon<f64>,
    wings: &[Polygon<f64>],
) -> Vec<Polygon<f64>> {
    let mut accepted: Vec<Polygon<f64>> = Vec::new();
    for wing in wings {
        if wing.unsigned_area() < ws.config.min_footprint_area {
            continue;
        }
        if !chunk.contains(wing) {
            continue;
        }
        // spacing clearance against everything already standing
        let clearance_mp = offset_polygon(wing, ws.params.spacing / 2.0);
        let clearance = crate::geometry::repair::largest_part(&clearance_mp)
            .unwrap_or_else(|| wing.clone());
        if ws.obstacles.iter().any(|o| overlap_area(&clearance, o) > OVERLAP_EPSILON) {
            continue;
        }
        // siblings touch along shared edges, so test them without clearance
        if accepted.iter().any(|a| overlap_area(wing, a) > OVERLAP_EPSILON) {
            continue;
        }
        accepted.push(wing.clone());
    }
    accepted
}

/// Intersection area between two polygons; a panicking boolean step counts
/// as a collision so placement stays conservative
pub(crate) fn overlap_area(a: &Polygon<f64>, b: &Polygon<f64>) -> f64 {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let ma = MultiPolygon(vec![a.clone()]);
        let mb = MultiPolygon(vec![b.clone()]);
        ma.intersection(&mb).0.iter().map(|p| p.unsigned_area()).sum::<f64>()
    }));
    result.unwrap_or(f64::MAX)
}

/// Construct a building on an accepted wing; floor colors come from the
/// unseeded cosmetic generator
fn make_building(ws: &PlotWorkspace, typology: Typology, footprint: Polygon<f64>) -> Building {
    let floors_n = ws.envelope.target_floors.max(1) as usize;
    let mut cosmetic = rand::thread_rng();
    let colors = floor_gradient(ws.params.land_use, floors_n, &mut cosmetic);
    let floors = (0..floors_n)
        .map(|i| Floor::plain(i as i32, ws.config.floor_to_floor, colors[i]))
        .collect();
    Building {
        id: crate::core::types::BuildingId::new(),
        footprint,
        typology,
        land_use: ws.params.land_use,
        floors,
        provenance: Provenance::Generated,
    }
}

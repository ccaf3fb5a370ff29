//! Setback and peripheral-zone derivation
//!
//! Produces the buildable envelope: the plot inward-buffered by the setback,
//! optionally minus peripheral surface-parking and internal-road rings.
//! Buffering and ring carving on arbitrary plot shapes routinely produce
//! invalid or multi-part results, so every stage repairs defensively and a
//! collapsed buffer yields an empty envelope rather than an error.

use geo::{Area, BoundingRect, MultiPolygon, Point, Polygon};

use crate::core::types::Provenance;
use crate::geometry::buffer::{buffer_centerline, inset_largest};
use crate::geometry::repair::repair;
use crate::geometry::subtract::robust_subtract;
use crate::plot::model::{BuildableArea, Entry, Side};
use crate::pipeline::workspace::{Notice, PlotWorkspace};

/// Derive `valid_chunks`, and the peripheral parking/road zone geometries
/// when requested by the run's parameters.
pub fn derive_envelope(mut ws: PlotWorkspace) -> PlotWorkspace {
    let setback = ws.envelope.effective_setback;
    let Some(setback_boundary) = inset_largest(&ws.plot.boundary, setback) else {
        tracing::warn!(setback, "setback buffer collapsed; empty buildable envelope");
        ws.notice(Notice::SetbackCollapsed);
        return ws;
    };
    let setback_boundary = repair(&setback_boundary);

    // Carve peripheral rings from the outside in: parking first, then road
    let mut current = setback_boundary;
    if ws.params.wants_surface_parking() {
        match carve_ring(&current, ws.config.peripheral_parking_width, ws.config.subtract_epsilon) {
            Some((ring, inner)) => {
                ws.parking_zone = Some(ring);
                current = inner;
            }
            None => {
                // Ring consumed the whole envelope
                ws.parking_zone = Some(current);
                ws.notice(Notice::SetbackCollapsed);
                return ws;
            }
        }
    }
    if ws.params.wants_peripheral_road() {
        match carve_ring(&current, ws.config.peripheral_road_width, ws.config.subtract_epsilon) {
            Some((ring, inner)) => {
                ws.road_zone = Some(ring);
                current = inner;
            }
            None => {
                ws.road_zone = Some(current);
                ws.notice(Notice::SetbackCollapsed);
                return ws;
            }
        }
    }

    // Manually-authored roads bisect the envelope into disjoint chunks
    let road_quads: Vec<Polygon<f64>> = ws
        .plot
        .roads
        .iter()
        .flat_map(|r| {
            buffer_centerline(&r.centerline, r.width.max(ws.config.road_obstacle_buffer))
        })
        .collect();
    let valid = robust_subtract(
        MultiPolygon(vec![current]),
        &road_quads,
        ws.config.subtract_epsilon,
    );

    ws.valid_chunks = valid
        .0
        .into_iter()
        .map(|p| repair(&p))
        .filter(|p| p.unsigned_area() >= ws.config.min_footprint_area)
        .collect();
    if ws.valid_chunks.is_empty() {
        ws.notice(Notice::SetbackCollapsed);
    }

    for chunk in &ws.valid_chunks {
        ws.plot.buildable_areas.push(BuildableArea {
            id: crate::core::types::AreaId::new(),
            geometry: chunk.clone(),
            provenance: Provenance::Generated,
        });
    }
    derive_entries(&mut ws);
    ws
}

/// Split `outer` into (ring, inner) where the ring has the given width.
///
/// Returns `None` when the inner inset collapses.
fn carve_ring(
    outer: &Polygon<f64>,
    width: f64,
    epsilon: f64,
) -> Option<(Polygon<f64>, Polygon<f64>)> {
    let inner = inset_largest(outer, width)?;
    let ring_mp = robust_subtract(MultiPolygon(vec![outer.clone()]), &[inner.clone()], epsilon);
    let ring = crate::geometry::repair::largest_part(&ring_mp)?;
    if ring.unsigned_area() < 1e-6 {
        return None;
    }
    Some((ring, inner))
}

/// One generated entry point at the midpoint of each road-access side
fn derive_entries(ws: &mut PlotWorkspace) {
    let Some(bbox) = ws.plot.boundary.bounding_rect() else {
        return;
    };
    let (min, max) = (bbox.min(), bbox.max());
    let mid_x = (min.x + max.x) / 2.0;
    let mid_y = (min.y + max.y) / 2.0;
    for side in ws.plot.road_access.clone() {
        let position = match side {
            Side::North => Point::new(mid_x, max.y),
            Side::South => Point::new(mid_x, min.y),
            Side::East => Point::new(max.x, mid_y),
            Side::West => Point::new(min.x, mid_y),
        };
        ws.plot.entries.push(Entry {
            id: crate::core::types::AreaId::new(),
            position,
            side,
            provenance: Provenance::Generated,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::{ParkingKind, UtilityKind};
    use crate::pipeline::compliance::derive_compliance;
    use crate::pipeline::params::GenerationParams;
    use crate::plot::model::Plot;

    fn run(width: f64, depth: f64, setback: f64, params: GenerationParams) -> PlotWorkspace {
        let plot = Plot::rectangular("s", width, depth, setback);
        let ws = PlotWorkspace::new(&plot, None, params, EngineConfig::default());
        let mut ws = derive_compliance(ws);
        ws.envelope.effective_setback = setback;
        derive_envelope(ws)
    }

    #[test]
    fn setback_shrinks_envelope() {
        let ws = run(100.0, 100.0, 10.0, GenerationParams::default());
        assert_eq!(ws.valid_chunks.len(), 1);
        let area = ws.valid_chunks[0].unsigned_area();
        assert!((area - 6400.0).abs() < 10.0, "area was {area}");
        assert_eq!(ws.plot.buildable_areas.len(), 1);
    }

    #[test]
    fn oversized_setback_collapses_without_error() {
        let ws = run(20.0, 20.0, 15.0, GenerationParams::default());
        assert!(ws.valid_chunks.is_empty());
        assert!(ws.notices.contains(&Notice::SetbackCollapsed));
    }

    #[test]
    fn peripheral_rings_are_carved_in_order() {
        let params = GenerationParams {
            parking: vec![ParkingKind::Surface],
            utilities: vec![UtilityKind::Roads],
            ..Default::default()
        };
        let ws = run(120.0, 120.0, 5.0, params);
        let parking = ws.parking_zone.as_ref().expect("parking ring");
        let road = ws.road_zone.as_ref().expect("road ring");
        assert!(parking.unsigned_area() > 0.0);
        assert!(road.unsigned_area() > 0.0);
        // 120 - 2*5 setback = 110; minus 2*5 parking = 100; minus 2*6 road = 88
        let inner = ws.valid_chunks[0].unsigned_area();
        assert!((inner - 88.0 * 88.0).abs() < 100.0, "inner was {inner}");
    }

    #[test]
    fn entries_land_on_access_sides() {
        let ws = run(50.0, 50.0, 4.0, GenerationParams::default());
        assert_eq!(ws.plot.entries.len(), 1);
        // default road access is the south side
        assert!((ws.plot.entries[0].position.y() - 0.0).abs() < 1e-9);
    }
}

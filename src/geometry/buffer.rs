//! Polygon offsetting wrappers
//!
//! Negative distances buffer inward. A buffer that collapses (setback larger
//! than the shape can absorb) yields an empty multi-polygon, never an error.

use geo::{Area, MultiPolygon, Polygon};

use super::repair::largest_part;

/// Area below which an offset result is treated as fully collapsed
const COLLAPSE_EPSILON: f64 = 1e-6;

/// Offset a polygon by `distance` metres (negative = inward).
///
/// The skeleton-based kernel can panic on degenerate rings; panics are
/// contained and mapped to an empty result.
pub fn offset_polygon(polygon: &Polygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if polygon.exterior().0.len() < 4 {
        return MultiPolygon(vec![]);
    }
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        geo_buffer::buffer_polygon(polygon, distance)
    }));
    match result {
        Ok(mp) => {
            let parts: Vec<Polygon<f64>> = mp
                .0
                .into_iter()
                .filter(|p| p.unsigned_area() > COLLAPSE_EPSILON)
                .collect();
            MultiPolygon(parts)
        }
        Err(_) => {
            tracing::warn!(distance, "polygon offset panicked; treating as collapsed");
            MultiPolygon(vec![])
        }
    }
}

/// Inward-offset and keep only the largest surviving part.
///
/// Returns `None` when the buffer collapses entirely.
pub fn inset_largest(polygon: &Polygon<f64>, distance: f64) -> Option<Polygon<f64>> {
    let mp = offset_polygon(polygon, -distance.abs());
    largest_part(&mp)
}

/// Buffer a road centerline into one quad per segment.
///
/// The skeleton kernel only offsets polygons, and per-segment quads are all
/// collision rejection needs from an authored road.
pub fn buffer_centerline(line: &geo::LineString<f64>, width: f64) -> Vec<Polygon<f64>> {
    let half = width / 2.0;
    let mut quads = Vec::new();
    for pair in line.0.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-9 {
            continue;
        }
        // unit normal
        let nx = -dy / len * half;
        let ny = dx / len * half;
        let quad = crate::geometry::repair::polygon_from_vertices(&[
            [a.x + nx, a.y + ny],
            [b.x + nx, b.y + ny],
            [b.x - nx, b.y - ny],
            [a.x - nx, a.y - ny],
        ]);
        if let Some(q) = quad {
            quads.push(q);
        }
    }
    quads
}

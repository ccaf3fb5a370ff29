//! Defensive topology repair: self-union, largest-part fallback, ring closing

use geo::{Area, BooleanOps, LineString, MultiPolygon, Polygon};
use ordered_float::OrderedFloat;

/// Build a closed polygon from a list of [x, y] vertices.
///
/// Returns `None` for degenerate input (fewer than 3 distinct vertices).
pub fn polygon_from_vertices(vertices: &[[f64; 2]]) -> Option<Polygon<f64>> {
    if vertices.len() < 3 {
        return None;
    }
    let mut coords: Vec<(f64, f64)> = vertices.iter().map(|[x, y]| (*x, *y)).collect();
    // Close the ring
    if let Some(first) = coords.first().cloned() {
        if coords.last() != Some(&first) {
            coords.push(first);
        }
    }
    Some(Polygon::new(LineString::from(coords), vec![]))
}

/// Pick the largest single polygon out of a multi-polygon.
///
/// This is the standard fallback when an operation that conceptually yields
/// one region returns several parts.
pub fn largest_part(mp: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    mp.0.iter()
        .max_by_key(|p| OrderedFloat(p.unsigned_area()))
        .cloned()
}

/// Explode a multi-polygon into independent single polygons
pub fn flatten(mp: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    mp.0
}

/// Resolve self-intersections by unioning the polygon with itself.
///
/// The boolean kernel can panic on badly degenerate rings; in that case the
/// input is returned unchanged rather than propagating the failure.
pub fn repair(polygon: &Polygon<f64>) -> Polygon<f64> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mp = polygon.union(polygon);
        largest_part(&mp)
    }));
    match result {
        Ok(Some(fixed)) => fixed,
        _ => polygon.clone(),
    }
}

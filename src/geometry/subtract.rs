//! Robust sequential polygon subtraction
//!
//! Open-space derivation subtracts dozens of generated footprints and zones
//! from the buildable envelope. Each clip is flattened, repaired, and dilated
//! by a small epsilon so the cut fully consumes shared edges; a step that
//! panics inside the boolean kernel is skipped, preserving the running base.

use geo::{BooleanOps, MultiPolygon, Polygon};

use super::buffer::offset_polygon;
use super::repair::repair;

/// Subtract every clip polygon from `base`, one boolean difference at a time.
///
/// Any single failing step leaves the running base untouched instead of
/// aborting the whole derivation.
pub fn robust_subtract(
    base: MultiPolygon<f64>,
    clips: &[Polygon<f64>],
    epsilon: f64,
) -> MultiPolygon<f64> {
    let mut running = base;
    for clip in clips {
        if running.0.is_empty() {
            break;
        }
        let resolved = repair(clip);
        // Dilate so shared edges are fully consumed by the cut
        let dilated = offset_polygon(&resolved, epsilon);
        for part in &dilated.0 {
            let cut = MultiPolygon(vec![part.clone()]);
            let step = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                running.difference(&cut)
            }));
            match step {
                Ok(next) => running = next,
                Err(_) => {
                    tracing::debug!("difference step panicked; keeping running base");
                }
            }
        }
    }
    running
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::repair::polygon_from_vertices;
    use geo::Area;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon_from_vertices(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1]]).unwrap()
    }

    #[test]
    fn subtracting_interior_rect_removes_its_area() {
        let base = MultiPolygon(vec![rect(0.0, 0.0, 100.0, 100.0)]);
        let out = robust_subtract(base, &[rect(10.0, 10.0, 30.0, 30.0)], 0.05);
        let remaining: f64 = out.0.iter().map(|p| p.unsigned_area()).sum();
        // 10000 - 400, minus a hair more for the epsilon dilation
        assert!(remaining < 9600.0 + 1.0);
        assert!(remaining > 9500.0);
    }

    #[test]
    fn disjoint_clip_leaves_base_unchanged() {
        let base = MultiPolygon(vec![rect(0.0, 0.0, 50.0, 50.0)]);
        let out = robust_subtract(base, &[rect(200.0, 200.0, 220.0, 220.0)], 0.05);
        let remaining: f64 = out.0.iter().map(|p| p.unsigned_area()).sum();
        assert!((remaining - 2500.0).abs() < 1.0);
    }

    #[test]
    fn degenerate_clip_is_skipped_not_fatal() {
        let base = MultiPolygon(vec![rect(0.0, 0.0, 50.0, 50.0)]);
        // zero-area sliver clip
        let sliver = polygon_from_vertices(&[[0.0, 0.0], [10.0, 0.0], [0.0, 0.0]]);
        let clips: Vec<Polygon<f64>> = sliver.into_iter().collect();
        let out = robust_subtract(base, &clips, 0.05);
        let remaining: f64 = out.0.iter().map(|p| p.unsigned_area()).sum();
        assert!(remaining > 2400.0);
    }
}

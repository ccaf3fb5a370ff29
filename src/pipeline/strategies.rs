//! Pluggable typology shape generators
//!
//! Each strategy proposes one or more wing polygons for a given anchor
//! inside a buildable chunk. Wings touch along shared edges but never
//! overlap each other, so the orchestrator can collision-test them
//! independently. Orientation is applied by rotating the whole wing set
//! around the anchor.

use geo::{BoundingRect, Point, Polygon, Rotate};

use crate::core::types::Typology;
use crate::geometry::repair::polygon_from_vertices;

/// Shared sizing inputs for every strategy
#[derive(Debug, Clone)]
pub struct PlacementContext {
    /// Per-building footprint ceiling in square metres
    pub max_single_footprint: f64,
    /// Clear distance kept from chunk edges by the perimeter strategy
    pub spacing: f64,
    /// Rotation applied to the proposed wing set, degrees
    pub orientation_deg: f64,
}

/// A typology shape generator
pub trait PlacementStrategy {
    fn typology(&self) -> Typology;

    /// Propose wing polygons anchored at `anchor` inside `chunk`.
    ///
    /// An empty result means the strategy cannot express itself at this
    /// anchor; the orchestrator moves on.
    fn propose(
        &self,
        chunk: &Polygon<f64>,
        anchor: Point<f64>,
        ctx: &PlacementContext,
    ) -> Vec<Polygon<f64>>;
}

/// Strategy instance for a typology
pub fn strategy_for(typology: Typology) -> Box<dyn PlacementStrategy> {
    match typology {
        Typology::Perimeter => Box::new(PerimeterStrategy),
        other => Box::new(WingStrategy { typology: other }),
    }
}

/// Approximate footprint area of the full wing set in units of `u^2`; used
/// to cap the base unit against the per-building ceiling
fn area_factor(typology: Typology) -> f64 {
    match typology {
        Typology::Point => 1.0,
        Typology::Slab => 1.8,
        Typology::LShaped => 2.3,
        Typology::TShaped => 2.5,
        Typology::HShaped => 3.3,
        Typology::UShaped => 3.5,
        Typology::Perimeter => 3.0,
    }
}

/// Base unit dimension derived from the chunk size, capped so the full
/// shape respects the per-building footprint ceiling
fn base_unit(chunk: &Polygon<f64>, typology: Typology, ctx: &PlacementContext) -> Option<f64> {
    let bbox = chunk.bounding_rect()?;
    let from_chunk = bbox.width().min(bbox.height()) * 0.25;
    let from_ceiling = (ctx.max_single_footprint / area_factor(typology)).sqrt();
    let u = from_chunk.min(20.0).min(from_ceiling);
    (u >= 3.0).then_some(u)
}

/// Axis-aligned rectangle centered at (cx, cy)
fn rect_centered(cx: f64, cy: f64, w: f64, h: f64) -> Option<Polygon<f64>> {
    polygon_from_vertices(&[
        [cx - w / 2.0, cy - h / 2.0],
        [cx + w / 2.0, cy - h / 2.0],
        [cx + w / 2.0, cy + h / 2.0],
        [cx - w / 2.0, cy + h / 2.0],
    ])
}

/// Wing offsets (cx, cy, w, h) in units of `u`, relative to the anchor
fn wing_layout(typology: Typology) -> &'static [[f64; 4]] {
    match typology {
        Typology::Point => &[[0.0, 0.0, 1.0, 1.0]],
        Typology::Slab => &[[0.0, 0.0, 2.2, 0.8]],
        // horizontal bar plus vertical return at the left end
        Typology::LShaped => &[[0.0, 0.0, 2.0, 0.7], [-0.65, 1.0, 0.7, 1.3]],
        // bar plus centered stem below
        Typology::TShaped => &[[0.0, 0.0, 2.2, 0.7], [0.0, -1.0, 0.7, 1.3]],
        // bottom bar plus two wings up
        Typology::UShaped => &[
            [0.0, 0.0, 2.4, 0.7],
            [-0.85, 1.0, 0.7, 1.3],
            [0.85, 1.0, 0.7, 1.3],
        ],
        // two verticals plus connector
        Typology::HShaped => &[
            [-0.85, 0.0, 0.7, 2.4],
            [0.85, 0.0, 0.7, 2.4],
            [0.0, 0.0, 1.0, 0.6],
        ],
        Typology::Perimeter => &[],
    }
}

/// Rectangle-composition strategy covering every non-perimeter typology
pub struct WingStrategy {
    pub typology: Typology,
}

impl PlacementStrategy for WingStrategy {
    fn typology(&self) -> Typology {
        self.typology
    }

    fn propose(
        &self,
        chunk: &Polygon<f64>,
        anchor: Point<f64>,
        ctx: &PlacementContext,
    ) -> Vec<Polygon<f64>> {
        let Some(u) = base_unit(chunk, self.typology, ctx) else {
            return Vec::new();
        };
        wing_layout(self.typology)
            .iter()
            .filter_map(|[cx, cy, w, h]| {
                rect_centered(anchor.x() + cx * u, anchor.y() + cy * u, w * u, h * u)
            })
            .map(|wing| wing.rotate_around_point(ctx.orientation_deg, anchor))
            .collect()
    }
}

/// Traces an inset ring of four slabs along the chunk's bounding edges
pub struct PerimeterStrategy;

impl PlacementStrategy for PerimeterStrategy {
    fn typology(&self) -> Typology {
        Typology::Perimeter
    }

    fn propose(
        &self,
        chunk: &Polygon<f64>,
        anchor: Point<f64>,
        ctx: &PlacementContext,
    ) -> Vec<Polygon<f64>> {
        let Some(bbox) = chunk.bounding_rect() else {
            return Vec::new();
        };
        let Some(u) = base_unit(chunk, Typology::Perimeter, ctx) else {
            return Vec::new();
        };
        let t = 0.6 * u;
        let x0 = bbox.min().x + ctx.spacing;
        let x1 = bbox.max().x - ctx.spacing;
        let y0 = bbox.min().y + ctx.spacing;
        let y1 = bbox.max().y - ctx.spacing;
        if x1 - x0 < 3.0 * t || y1 - y0 < 3.0 * t {
            return Vec::new();
        }
        let bars = [
            // south, north
            [[x0 + t, y0], [x1 - t, y0], [x1 - t, y0 + t], [x0 + t, y0 + t]],
            [[x0 + t, y1 - t], [x1 - t, y1 - t], [x1 - t, y1], [x0 + t, y1]],
            // west, east
            [[x0, y0 + t], [x0 + t, y0 + t], [x0 + t, y1 - t], [x0, y1 - t]],
            [[x1 - t, y0 + t], [x1, y0 + t], [x1, y1 - t], [x1 - t, y1 - t]],
        ];
        bars.iter()
            .filter_map(|verts| polygon_from_vertices(verts))
            .map(|bar| bar.rotate_around_point(ctx.orientation_deg, anchor))
            .collect()
    }
}

//! Vastu sector model: directional placement-priority zones
//!
//! The bounding box of the buildable envelope is partitioned into a 3x3
//! grid: eight compass sectors plus a center cell (the Brahmasthan), which
//! is never buildable. Heavier typologies are biased toward the
//! priority sectors; with vastu off, multiple typologies are spread across
//! the four corners as a simple anti-clustering heuristic.

use geo::{BoundingRect, Point, Polygon, Rect};

use crate::core::types::Typology;
use crate::geometry::repair::polygon_from_vertices;
use crate::pipeline::workspace::PlotWorkspace;

/// Compass sectors of the 3x3 grid, plus the reserved center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    SouthWest,
    South,
    SouthEast,
    West,
    Center,
    East,
    NorthWest,
    North,
    NorthEast,
}

/// Fixed priority order for heaviest placement; center never appears
pub const SECTOR_PRIORITY: [Sector; 8] = [
    Sector::SouthWest,
    Sector::South,
    Sector::West,
    Sector::SouthEast,
    Sector::NorthWest,
    Sector::North,
    Sector::East,
    Sector::NorthEast,
];

/// Corner sectors used for the non-vastu anti-clustering bias
pub const CORNER_SECTORS: [Sector; 4] = [
    Sector::SouthWest,
    Sector::SouthEast,
    Sector::NorthWest,
    Sector::NorthEast,
];

/// 3x3 partition of the buildable envelope's bounding box
#[derive(Debug, Clone)]
pub struct SectorGrid {
    bbox: Rect<f64>,
}

impl SectorGrid {
    /// Grid over all chunks of the buildable envelope.
    ///
    /// `None` when the envelope is empty.
    pub fn from_chunks(chunks: &[Polygon<f64>]) -> Option<Self> {
        let mut bounds: Option<Rect<f64>> = None;
        for chunk in chunks {
            let b = chunk.bounding_rect()?;
            bounds = Some(match bounds {
                None => b,
                Some(acc) => Rect::new(
                    geo::coord! { x: acc.min().x.min(b.min().x), y: acc.min().y.min(b.min().y) },
                    geo::coord! { x: acc.max().x.max(b.max().x), y: acc.max().y.max(b.max().y) },
                ),
            });
        }
        bounds.map(|bbox| Self { bbox })
    }

    /// Grid column/row for a sector; row 0 is south (minimum y)
    fn cell_index(sector: Sector) -> (usize, usize) {
        match sector {
            Sector::SouthWest => (0, 0),
            Sector::South => (1, 0),
            Sector::SouthEast => (2, 0),
            Sector::West => (0, 1),
            Sector::Center => (1, 1),
            Sector::East => (2, 1),
            Sector::NorthWest => (0, 2),
            Sector::North => (1, 2),
            Sector::NorthEast => (2, 2),
        }
    }

    /// Cell polygon for a sector
    pub fn cell(&self, sector: Sector) -> Polygon<f64> {
        let (col, row) = Self::cell_index(sector);
        let w = self.bbox.width() / 3.0;
        let h = self.bbox.height() / 3.0;
        let x0 = self.bbox.min().x + col as f64 * w;
        let y0 = self.bbox.min().y + row as f64 * h;
        polygon_from_vertices(&[[x0, y0], [x0 + w, y0], [x0 + w, y0 + h], [x0, y0 + h]])
            .unwrap_or_else(|| Polygon::new(geo::LineString::new(vec![]), vec![]))
    }

    /// Centroid of a sector cell
    pub fn centroid_of(&self, sector: Sector) -> Point<f64> {
        let (col, row) = Self::cell_index(sector);
        let w = self.bbox.width() / 3.0;
        let h = self.bbox.height() / 3.0;
        Point::new(
            self.bbox.min().x + (col as f64 + 0.5) * w,
            self.bbox.min().y + (row as f64 + 0.5) * h,
        )
    }

    /// Sector containing a point (clamped to the grid)
    pub fn sector_of(&self, point: Point<f64>) -> Sector {
        let w = self.bbox.width() / 3.0;
        let h = self.bbox.height() / 3.0;
        let col = (((point.x() - self.bbox.min().x) / w).floor() as i64).clamp(0, 2) as usize;
        let row = (((point.y() - self.bbox.min().y) / h).floor() as i64).clamp(0, 2) as usize;
        match (col, row) {
            (0, 0) => Sector::SouthWest,
            (1, 0) => Sector::South,
            (2, 0) => Sector::SouthEast,
            (0, 1) => Sector::West,
            (1, 1) => Sector::Center,
            (2, 1) => Sector::East,
            (0, 2) => Sector::NorthWest,
            (1, 2) => Sector::North,
            _ => Sector::NorthEast,
        }
    }
}

/// Assign per-typology bias targets and reserve the center cell when vastu
/// compliance is requested.
pub fn assign_bias(mut ws: PlotWorkspace) -> PlotWorkspace {
    let Some(grid) = SectorGrid::from_chunks(&ws.valid_chunks) else {
        return ws;
    };
    let ordered = ws.params.typologies_by_weight();

    if ws.params.vastu {
        for (i, typology) in ordered.iter().enumerate() {
            // wrap when typologies exceed sectors
            let sector = SECTOR_PRIORITY[i % SECTOR_PRIORITY.len()];
            ws.bias_targets.push((*typology, grid.centroid_of(sector)));
        }
        // The Brahmasthan is never buildable
        ws.obstacles.push(grid.cell(Sector::Center));
        tracing::debug!(targets = ws.bias_targets.len(), "vastu bias assigned");
    } else if ordered.len() > 1 && ordered.iter().any(|t| *t != Typology::Point) {
        for (i, typology) in ordered.iter().enumerate() {
            let sector = CORNER_SECTORS[i % CORNER_SECTORS.len()];
            ws.bias_targets.push((*typology, grid.centroid_of(sector)));
        }
    }
    ws
}

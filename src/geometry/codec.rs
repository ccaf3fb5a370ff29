//! JSON ring schema for plot geometry persistence
//!
//! Geometries round-trip through plain vertex lists so stored records stay
//! readable and diffable. Decoding is lenient: a malformed ring degrades to
//! `None` and the caller drops or nulls that field, it never fails the whole
//! record.

use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};

use super::repair::polygon_from_vertices;

/// One polygon as exterior + optional interior rings of [x, y] vertices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonRecord {
    pub exterior: Vec<[f64; 2]>,
    #[serde(default)]
    pub interiors: Vec<Vec<[f64; 2]>>,
}

/// Encode a polygon into its ring record.
///
/// The closing vertex is dropped; decoding re-closes the ring.
pub fn encode_polygon(polygon: &Polygon<f64>) -> PolygonRecord {
    PolygonRecord {
        exterior: open_ring(polygon.exterior()),
        interiors: polygon.interiors().iter().map(open_ring).collect(),
    }
}

/// Decode a ring record; `None` if the exterior is degenerate.
///
/// Degenerate interior rings are silently dropped.
pub fn decode_polygon(record: &PolygonRecord) -> Option<Polygon<f64>> {
    let shell = polygon_from_vertices(&record.exterior)?;
    let holes: Vec<LineString<f64>> = record
        .interiors
        .iter()
        .filter_map(|ring| polygon_from_vertices(ring))
        .map(|p| p.exterior().clone())
        .collect();
    Some(Polygon::new(shell.exterior().clone(), holes))
}

fn open_ring(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    let mut verts: Vec<[f64; 2]> = ring.0.iter().map(|c| [c.x, c.y]).collect();
    if verts.len() > 1 && verts.first() == verts.last() {
        verts.pop();
    }
    verts
}

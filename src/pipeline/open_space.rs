//! Open-space resolution
//!
//! Whatever remains of the buildable envelope after buildings, on-plot
//! utility zones, and surface lots are carved out becomes green area.
//! Subtraction goes through the dilate-and-difference path so a degenerate
//! clip never poisons the whole layout; slivers below the area threshold
//! are dropped.

use geo::{Area, MultiPolygon, Polygon};

use crate::core::config::EngineConfig;
use crate::core::types::Provenance;
use crate::geometry::buffer::inset_largest;
use crate::geometry::repair::flatten;
use crate::geometry::subtract::robust_subtract;
use crate::pipeline::workspace::PlotWorkspace;
use crate::plot::model::{GreenArea, Plot};

/// Turn the unbuilt remainder of the envelope into green areas
pub fn resolve_open_space(mut ws: PlotWorkspace) -> PlotWorkspace {
    if ws.valid_chunks.is_empty() {
        return ws;
    }
    let base = MultiPolygon(ws.valid_chunks.clone());
    let clips = carve_set(&ws.plot);
    let fragments = fragments_of(base, &clips, &ws.config);
    let count = fragments.len();
    for fragment in fragments {
        if let Some(green) = GreenArea::from_fragment(fragment, Provenance::Generated) {
            ws.plot.green_areas.push(green);
        }
    }
    tracing::debug!(fragments = count, "open space resolved");
    ws
}

/// Recompute generated green areas for a plot outside of a full pipeline
/// run. The base is the stored buildable envelope when one exists, else the
/// boundary inset by the plot setback.
pub fn regenerate_green_areas(plot: &mut Plot, config: &EngineConfig) {
    plot.green_areas
        .retain(|g| g.provenance == Provenance::Authored);
    let chunks: Vec<Polygon<f64>> = if plot.buildable_areas.is_empty() {
        inset_largest(&plot.boundary, plot.setback.max(0.0))
            .into_iter()
            .collect()
    } else {
        plot.buildable_areas
            .iter()
            .map(|a| a.geometry.clone())
            .collect()
    };
    if chunks.is_empty() {
        return;
    }
    let clips = carve_set(plot);
    for fragment in fragments_of(MultiPolygon(chunks), &clips, config) {
        if let Some(green) = GreenArea::from_fragment(fragment, Provenance::Generated) {
            plot.green_areas.push(green);
        }
    }
}

/// Everything that displaces open space: building footprints, on-plot
/// utility zones, on-plot surface lots. Peripheral rings already sit
/// outside the envelope chunks.
fn carve_set(plot: &Plot) -> Vec<Polygon<f64>> {
    let mut clips: Vec<Polygon<f64>> =
        plot.buildings.iter().map(|b| b.footprint.clone()).collect();
    clips.extend(
        plot.utility_areas
            .iter()
            .filter(|u| !u.peripheral)
            .map(|u| u.geometry.clone()),
    );
    clips.extend(
        plot.parking_areas
            .iter()
            .filter(|p| !p.peripheral)
            .map(|p| p.geometry.clone()),
    );
    clips
}

fn fragments_of(
    base: MultiPolygon<f64>,
    clips: &[Polygon<f64>],
    config: &EngineConfig,
) -> Vec<Polygon<f64>> {
    let remainder = robust_subtract(base, clips, config.subtract_epsilon);
    flatten(remainder)
        .into_iter()
        .filter(|p| p.unsigned_area() >= config.sliver_min_area)
        .collect()
}

//! Post-hoc regulatory enforcement over generated massing
//!
//! FAR overage is auto-corrected by uniformly truncating floor counts.
//! Coverage overage is reported only: footprints are already
//! collision-validated and shrinking them would invalidate that validation.

use crate::core::types::Provenance;
use crate::pipeline::workspace::{Notice, PlotWorkspace};
use crate::plot::model::floor_gradient;

/// Enforce FAR and report coverage against the effective ceilings
pub fn enforce_massing(mut ws: PlotWorkspace) -> PlotWorkspace {
    let plot_area = ws.plot.area();
    if plot_area <= 0.0 {
        return ws;
    }
    let tolerance = ws.config.overage_tolerance;
    let effective_far = ws.envelope.effective_far;

    let actual_far = total_gfa(&ws) / plot_area;
    if actual_far > effective_far * tolerance {
        let scale = effective_far / actual_far;
        tracing::info!(actual_far, effective_far, scale, "scaling floor counts to FAR ceiling");
        let land_use = ws.params.land_use;
        let mut cosmetic = rand::thread_rng();
        for building in ws
            .plot
            .buildings
            .iter_mut()
            .filter(|b| b.provenance == Provenance::Generated)
        {
            let current = building.floors.len();
            let target = ((current as f64 * scale).floor() as usize).max(1);
            if target < current {
                building.floors.truncate(target);
                let colors = floor_gradient(land_use, target, &mut cosmetic);
                for (floor, color) in building.floors.iter_mut().zip(colors) {
                    floor.color = color;
                }
            }
        }
        let corrected = total_gfa(&ws) / plot_area;
        ws.notice(Notice::FarCorrected {
            from: actual_far,
            to: corrected,
        });
    }

    // Active green certifications tighten (never relax) the coverage ceiling
    let mut coverage_limit = ws.envelope.effective_coverage;
    if ws
        .regulation
        .as_ref()
        .map(|r| r.has_green_certification())
        .unwrap_or(false)
    {
        coverage_limit = coverage_limit.min(1.0 - ws.config.cert_min_open_space);
    }
    let total_footprint: f64 = ws.plot.buildings.iter().map(|b| b.footprint_area()).sum();
    let actual_coverage = total_footprint / plot_area;
    if actual_coverage > coverage_limit * tolerance {
        tracing::warn!(actual_coverage, coverage_limit, "ground coverage exceeds ceiling");
        ws.notice(Notice::CoverageExceeded {
            actual: actual_coverage,
            limit: coverage_limit,
        });
    }
    ws
}

fn total_gfa(ws: &PlotWorkspace) -> f64 {
    ws.plot.buildings.iter().map(|b| b.gross_floor_area()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::{BuildingId, LandUse, Typology};
    use crate::geometry::repair::polygon_from_vertices;
    use crate::pipeline::params::GenerationParams;
    use crate::plot::model::{Building, Floor, Plot};
    use crate::plot::regulation::Regulation;

    fn building(area_side: f64, floors: usize) -> Building {
        let footprint = polygon_from_vertices(&[
            [0.0, 0.0],
            [area_side, 0.0],
            [area_side, area_side],
            [0.0, area_side],
        ])
        .unwrap();
        Building {
            id: BuildingId::new(),
            footprint,
            typology: Typology::Point,
            land_use: LandUse::Residential,
            floors: (0..floors)
                .map(|i| Floor::plain(i as i32, 3.0, [128, 128, 128]))
                .collect(),
            provenance: crate::core::types::Provenance::Generated,
        }
    }

    fn workspace_with(buildings: Vec<Building>, regulation: Option<Regulation>) -> PlotWorkspace {
        // 1000 m2 plot
        let plot = Plot::rectangular("m", 40.0, 25.0, 4.0);
        let mut ws = PlotWorkspace::new(
            &plot,
            regulation,
            GenerationParams::default(),
            EngineConfig::default(),
        );
        ws.envelope.effective_far = 2.0;
        ws.envelope.effective_coverage = 0.5;
        ws.plot.buildings = buildings;
        ws
    }

    #[test]
    fn far_overage_scales_floor_counts_uniformly() {
        // 20x20 = 400 m2, 10 floors -> GFA 4000 on 1000 m2 -> FAR 4.0
        let ws = workspace_with(vec![building(20.0, 10)], None);
        let ws = enforce_massing(ws);
        let b = &ws.plot.buildings[0];
        // scale 0.5 -> 5 floors -> FAR 2.0
        assert_eq!(b.floors.len(), 5);
        let far = b.gross_floor_area() / ws.plot.area();
        assert!(far <= 2.0 * 1.05 + 1e-9);
        assert!(ws
            .notices
            .iter()
            .any(|n| matches!(n, Notice::FarCorrected { .. })));
    }

    #[test]
    fn far_within_tolerance_is_left_alone() {
        // GFA 2000 + 32 -> FAR 2.032 < 2.0 * 1.05
        let ws = workspace_with(vec![building(20.0, 5), building(4.0, 2)], None);
        let ws = enforce_massing(ws);
        assert!(ws.notices.is_empty());
        assert_eq!(ws.plot.buildings[0].floors.len(), 5);
    }

    #[test]
    fn coverage_overage_is_reported_never_corrected() {
        // 24x24 = 576 m2 footprint on 1000 m2 -> coverage 0.576 > 0.5*1.05
        let ws = workspace_with(vec![building(24.0, 3)], None);
        let ws = enforce_massing(ws);
        assert!(ws
            .notices
            .iter()
            .any(|n| matches!(n, Notice::CoverageExceeded { .. })));
        // footprint untouched
        assert!((ws.plot.buildings[0].footprint_area() - 576.0).abs() < 1e-9);
    }

    #[test]
    fn certification_tightens_coverage_ceiling() {
        let reg = Regulation {
            rainwater_harvesting: true,
            ..Default::default()
        };
        // 27.2x27.2 ~ 740 m2 -> coverage 0.74: under a permissive 0.8 ceiling,
        // but over the certified min(0.8, 1 - 0.30) = 0.7 ceiling
        let mut ws = workspace_with(vec![building(27.2, 2)], Some(reg));
        ws.envelope.effective_coverage = 0.8;
        let ws = enforce_massing(ws);
        assert!(ws
            .notices
            .iter()
            .any(|n| matches!(n, Notice::CoverageExceeded { .. })));
    }
}

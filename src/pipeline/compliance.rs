//! Regulation + plot area -> footprint/floor/GFA ceilings

use crate::pipeline::workspace::{Notice, PlotWorkspace};

/// Effective regulatory ceilings for one run.
///
/// Every field resolves as user override, then regulation, then hardcoded
/// fallback, so a plot with no regulation still generates.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEnvelope {
    pub effective_far: f64,
    /// Fraction of plot area, 0..=1
    pub effective_coverage: f64,
    pub effective_height: f64,
    pub effective_setback: f64,
    /// Total footprint ceiling in square metres (coverage-derived)
    pub max_footprint: f64,
    pub max_gfa: f64,
    /// Assumed per-building footprint for the planning signal below
    pub avg_footprint: f64,
    pub target_floors: u32,
    /// Planning signal only; does not force that many placements
    pub target_building_count: u32,
}

/// Derive the envelope from plot area, regulation, and user overrides
pub fn derive_compliance(mut ws: PlotWorkspace) -> PlotWorkspace {
    let plot_area = ws.plot.area();
    let reg = ws.regulation.clone();
    if reg.is_none() {
        tracing::warn!(plot = %ws.plot.name, "no regulation record; using fallback constants");
        ws.notice(Notice::RegulationMissing);
    }
    let reg = reg.unwrap_or_default();
    let cfg = ws.config.clone();

    let plot_setback = (ws.plot.setback > 0.0).then_some(ws.plot.setback);
    let effective_setback = ws
        .params
        .setback_override
        .or(plot_setback)
        .or(reg.setback)
        .unwrap_or(cfg.fallback_setback);
    let effective_far = reg.floor_area_ratio.unwrap_or(cfg.fallback_far);
    let effective_coverage = reg.max_ground_coverage.unwrap_or(cfg.fallback_coverage);
    let effective_height = reg.max_height.unwrap_or(cfg.fallback_max_height);

    let max_footprint = plot_area * effective_coverage;
    let max_gfa = plot_area * effective_far;

    // Floor count ceiling from the height cap
    let ceiling = ((effective_height / cfg.floor_to_floor).floor() as u32).max(1);
    let mut target_floors = ceiling;
    if let Some(user_max) = ws.params.max_floors {
        if user_max > ceiling {
            tracing::warn!(
                requested = user_max,
                ceiling,
                "user floor override exceeds regulation ceiling; honoring it"
            );
            ws.notice(Notice::OverrideAboveRegulation {
                requested: user_max,
                ceiling,
            });
        }
        target_floors = user_max;
    }
    if let Some(user_min) = ws.params.min_floors {
        target_floors = target_floors.max(user_min);
    }

    let typology_count = ws.params.typologies_by_weight().len().max(1);
    let avg_footprint = (max_footprint / typology_count as f64)
        .min(plot_area * 0.25)
        .max(cfg.min_footprint_area);
    let target_building_count =
        (max_gfa / (avg_footprint * target_floors as f64)).ceil().max(1.0) as u32;

    tracing::debug!(
        effective_far,
        effective_coverage,
        target_floors,
        target_building_count,
        "compliance envelope derived"
    );

    ws.envelope = ComplianceEnvelope {
        effective_far,
        effective_coverage,
        effective_height,
        effective_setback,
        max_footprint,
        max_gfa,
        avg_footprint,
        target_floors,
        target_building_count,
    };
    ws
}

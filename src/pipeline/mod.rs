//! The generation pipeline
//!
//! Stages consume and return an owned [`PlotWorkspace`] so they compose and
//! test independently. Order: compliance ceilings, setback/peripheral
//! envelope, vastu bias, typology placement, massing enforcement,
//! utility/parking attachment, open-space resolution.

pub mod amenities;
pub mod compliance;
pub mod massing;
pub mod open_space;
pub mod params;
pub mod placement;
pub mod setback;
pub mod strategies;
pub mod vastu;
pub mod workspace;

pub use compliance::ComplianceEnvelope;
pub use params::GenerationParams;
pub use workspace::{Notice, PlotWorkspace};

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SiteplanError};
use crate::plot::model::Plot;
use crate::plot::regulation::Regulation;

/// Result of one full pipeline run over a cloned plot
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub plot: Plot,
    pub notices: Vec<Notice>,
}

/// Run every stage over a deep clone of `plot`.
///
/// The live plot is never touched; only the scenario orchestrator writes
/// back. A plot without boundary geometry is the single hard failure.
pub fn run_pipeline(
    plot: &Plot,
    regulation: Option<Regulation>,
    params: &GenerationParams,
    config: &EngineConfig,
) -> Result<PipelineOutput> {
    if !plot.has_boundary() {
        return Err(SiteplanError::MissingBoundary);
    }
    let ws = PlotWorkspace::new(plot, regulation, params.clone(), config.clone());
    let ws = compliance::derive_compliance(ws);
    let ws = setback::derive_envelope(ws);
    let ws = vastu::assign_bias(ws);
    let ws = placement::place_typologies(ws);
    let ws = massing::enforce_massing(ws);
    let ws = amenities::attach_amenities(ws);
    let ws = open_space::resolve_open_space(ws);
    Ok(ws.finish())
}

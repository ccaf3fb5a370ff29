//! The owned working state threaded through pipeline stages

use std::fmt;

use geo::{Point, Polygon};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::core::types::{Typology, UtilityKind};
use crate::pipeline::compliance::ComplianceEnvelope;
use crate::pipeline::params::GenerationParams;
use crate::pipeline::PipelineOutput;
use crate::plot::model::Plot;
use crate::plot::regulation::Regulation;

/// Advisory notice surfaced to the user alongside a scenario.
///
/// Routine collision rejections and sliver filtering stay silent; these are
/// the events worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Setback buffer collapsed; the plot yields no buildable envelope
    SetbackCollapsed,
    /// No regulation record found; fallback constants in effect
    RegulationMissing,
    /// Ground coverage exceeds the ceiling; reported, never auto-corrected
    CoverageExceeded { actual: f64, limit: f64 },
    /// FAR exceeded the ceiling and floor counts were scaled down
    FarCorrected { from: f64, to: f64 },
    /// User's floor-count override exceeds the regulation-derived ceiling
    OverrideAboveRegulation { requested: u32, ceiling: u32 },
    /// An external utility zone could not be placed without collision
    UtilityPlacementFailed(UtilityKind),
    /// A requested typology produced no footprint even via its fallbacks
    NothingPlaced(Typology),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SetbackCollapsed => {
                write!(f, "Setback leaves no buildable area on this plot")
            }
            Notice::RegulationMissing => {
                write!(f, "No regulation found; using fallback constants")
            }
            Notice::CoverageExceeded { actual, limit } => write!(
                f,
                "Ground coverage {:.1}% exceeds the {:.1}% ceiling",
                actual * 100.0,
                limit * 100.0
            ),
            Notice::FarCorrected { from, to } => {
                write!(f, "FAR {from:.2} exceeded the ceiling; scaled to {to:.2}")
            }
            Notice::OverrideAboveRegulation { requested, ceiling } => write!(
                f,
                "Requested {requested} floors exceeds the regulation ceiling of {ceiling}; honoring the request"
            ),
            Notice::UtilityPlacementFailed(kind) => {
                write!(f, "Could not place {kind:?} zone without collision")
            }
            Notice::NothingPlaced(t) => {
                write!(f, "No footprint could be placed for {t:?}")
            }
        }
    }
}

/// Owned working state for one pipeline run.
///
/// Built from a deep clone of the live plot; stages take it by value and
/// return it, so no stage ever observes another's partial mutation.
pub struct PlotWorkspace {
    pub plot: Plot,
    pub regulation: Option<Regulation>,
    pub params: GenerationParams,
    pub config: EngineConfig,
    pub envelope: ComplianceEnvelope,
    /// Buildable envelope chunks after setback and peripheral carving
    pub valid_chunks: Vec<Polygon<f64>>,
    pub parking_zone: Option<Polygon<f64>>,
    pub road_zone: Option<Polygon<f64>>,
    /// Everything placement must not collide with
    pub obstacles: Vec<Polygon<f64>>,
    /// Directional placement-bias targets per typology
    pub bias_targets: Vec<(Typology, Point<f64>)>,
    pub notices: Vec<Notice>,
    /// Structural randomness; seeded, never used for cosmetics
    pub rng: ChaCha8Rng,
}

impl PlotWorkspace {
    /// Clone the plot and strip its previously generated collections; the
    /// run writes a full replacement set.
    pub fn new(
        plot: &Plot,
        regulation: Option<Regulation>,
        params: GenerationParams,
        config: EngineConfig,
    ) -> Self {
        let mut cloned = plot.clone();
        cloned.clear_generated();
        let rng = ChaCha8Rng::seed_from_u64(params.seed);
        Self {
            plot: cloned,
            regulation,
            params,
            config,
            envelope: ComplianceEnvelope::default(),
            valid_chunks: Vec::new(),
            parking_zone: None,
            road_zone: None,
            obstacles: Vec::new(),
            bias_targets: Vec::new(),
            notices: Vec::new(),
            rng,
        }
    }

    pub fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Bias target assigned to `typology`, if any
    pub fn bias_for(&self, typology: Typology) -> Option<Point<f64>> {
        self.bias_targets
            .iter()
            .find(|(t, _)| *t == typology)
            .map(|(_, p)| *p)
    }

    pub fn finish(self) -> PipelineOutput {
        PipelineOutput {
            plot: self.plot,
            notices: self.notices,
        }
    }
}

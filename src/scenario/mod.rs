//! Scenario orchestration
//!
//! One request yields exactly three named variants, each produced by a full
//! pipeline run over an independent deep clone of the live plot. Variants are
//! held in a pending batch until one is applied or the batch is discarded;
//! applying writes only Generated entities back into the live plot, so
//! authored geometry always survives. A new request implicitly discards a
//! batch still awaiting selection.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SiteplanError};
use crate::pipeline::{run_pipeline, GenerationParams, Notice};
use crate::plot::model::Plot;
use crate::plot::regulation::{Regulation, RegulationRegistry};

pub use crate::pipeline::open_space::regenerate_green_areas;

/// One named layout proposal: a complete plot snapshot plus the advisory
/// notices its run produced
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub plot: Plot,
    pub params: GenerationParams,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Generating,
    AwaitingSelection,
}

/// Holds the engine configuration, the regulation registry, and at most one
/// pending variant batch
pub struct ScenarioEngine {
    config: EngineConfig,
    registry: RegulationRegistry,
    state: BatchState,
    batch: Vec<Scenario>,
}

impl ScenarioEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: RegulationRegistry::default(),
            state: BatchState::Idle,
            batch: Vec::new(),
        }
    }

    pub fn with_registry(config: EngineConfig, registry: RegulationRegistry) -> Self {
        Self {
            config,
            registry,
            state: BatchState::Idle,
            batch: Vec::new(),
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn batch(&self) -> &[Scenario] {
        &self.batch
    }

    /// Generate the three-variant batch for `plot`
    pub fn generate_scenarios(
        &mut self,
        plot: &Plot,
        params: &GenerationParams,
    ) -> Result<&[Scenario]> {
        self.generate_scenarios_with(plot, params, |_| {})
    }

    /// Like [`generate_scenarios`](Self::generate_scenarios), invoking
    /// `on_variant` as each variant completes so callers can publish results
    /// incrementally
    pub fn generate_scenarios_with(
        &mut self,
        plot: &Plot,
        params: &GenerationParams,
        mut on_variant: impl FnMut(&Scenario),
    ) -> Result<&[Scenario]> {
        if self.state == BatchState::AwaitingSelection {
            tracing::info!("new request supersedes the pending batch");
            self.discard_scenarios();
        }
        self.state = BatchState::Generating;
        self.batch.clear();
        let regulation = self.lookup_regulation(plot, params);
        for (name, variant) in variant_params(params) {
            let output = match run_pipeline(plot, regulation.clone(), &variant, &self.config) {
                Ok(output) => output,
                Err(err) => {
                    self.state = BatchState::Idle;
                    self.batch.clear();
                    return Err(err);
                }
            };
            let scenario = Scenario {
                name: name.to_string(),
                plot: output.plot,
                params: variant,
                notices: output.notices,
            };
            tracing::info!(
                name = %scenario.name,
                buildings = scenario.plot.buildings.len(),
                "variant ready"
            );
            on_variant(&scenario);
            self.batch.push(scenario);
        }
        self.state = BatchState::AwaitingSelection;
        Ok(&self.batch)
    }

    /// Write the chosen variant's generated entities into the live plot.
    ///
    /// Authored geometry on the live plot is untouched; previously generated
    /// entities are replaced wholesale.
    pub fn apply_scenario(&mut self, live: &mut Plot, index: usize) -> Result<()> {
        if self.state != BatchState::AwaitingSelection {
            return Err(SiteplanError::NoPendingBatch);
        }
        let scenario = self
            .batch
            .get(index)
            .ok_or(SiteplanError::ScenarioOutOfRange(index))?;
        live.clear_generated();
        let generated = &scenario.plot;
        use crate::core::types::Provenance::Generated;
        live.buildings.extend(
            generated
                .buildings
                .iter()
                .filter(|b| b.provenance == Generated)
                .cloned(),
        );
        live.green_areas.extend(
            generated
                .green_areas
                .iter()
                .filter(|g| g.provenance == Generated)
                .cloned(),
        );
        live.parking_areas.extend(
            generated
                .parking_areas
                .iter()
                .filter(|p| p.provenance == Generated)
                .cloned(),
        );
        live.utility_areas.extend(
            generated
                .utility_areas
                .iter()
                .filter(|u| u.provenance == Generated)
                .cloned(),
        );
        live.buildable_areas.extend(
            generated
                .buildable_areas
                .iter()
                .filter(|a| a.provenance == Generated)
                .cloned(),
        );
        live.entries.extend(
            generated
                .entries
                .iter()
                .filter(|e| e.provenance == Generated)
                .cloned(),
        );
        tracing::info!(scenario = %self.batch[index].name, "scenario applied");
        self.batch.clear();
        self.state = BatchState::Idle;
        Ok(())
    }

    /// Drop the pending batch without touching the live plot
    pub fn discard_scenarios(&mut self) {
        self.batch.clear();
        self.state = BatchState::Idle;
    }

    /// Recompute a plot's generated green areas in place
    pub fn regenerate_green_areas(&self, plot: &mut Plot) {
        regenerate_green_areas(plot, &self.config);
    }

    fn lookup_regulation(
        &self,
        plot: &Plot,
        params: &GenerationParams,
    ) -> Option<Regulation> {
        let key = plot.regulation_key.as_deref()?;
        self.registry.lookup(key, params.land_use).cloned()
    }
}

/// The three variant parameter sets derived from one base request.
///
/// Each variant gets an independent structural seed derived from the base
/// seed, so variants differ from each other yet the whole batch reproduces
/// for the same request.
pub fn variant_params(base: &GenerationParams) -> Vec<(&'static str, GenerationParams)> {
    let optimized = base.clone();

    let mut dense = base.clone();
    dense.spacing = (base.spacing * 0.75).max(1.0);
    dense.max_floors = Some(base.max_floors.unwrap_or(8).saturating_add(4));
    dense.seed = base.seed.wrapping_mul(0x9e3779b97f4a7c15).wrapping_add(1);

    let mut alt = base.clone();
    let mut shuffle = ChaCha8Rng::seed_from_u64(base.seed.wrapping_add(2));
    alt.typologies = alternative_subset(&base.typologies, &mut shuffle);
    alt.orientation_deg = base.orientation_deg + shuffle.gen_range(-30.0..30.0);
    alt.spacing = base.spacing * shuffle.gen_range(0.9..1.4);
    alt.seed = base.seed.wrapping_mul(0x9e3779b97f4a7c15).wrapping_add(2);

    vec![
        ("Optimized", optimized),
        ("Max Density", dense),
        ("Alternative", alt),
    ]
}

/// Non-empty shuffled subset of the requested typologies
fn alternative_subset(
    typologies: &[crate::core::types::Typology],
    rng: &mut ChaCha8Rng,
) -> Vec<crate::core::types::Typology> {
    if typologies.len() <= 1 {
        return typologies.to_vec();
    }
    let mut pool = typologies.to_vec();
    pool.shuffle(rng);
    let keep = rng.gen_range(1..=pool.len());
    pool.truncate(keep);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Typology;

    #[test]
    fn variants_are_three_and_named() {
        let base = GenerationParams::default();
        let variants = variant_params(&base);
        let names: Vec<_> = variants.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Optimized", "Max Density", "Alternative"]);
    }

    #[test]
    fn variant_seeds_are_distinct_and_reproducible() {
        let base = GenerationParams {
            seed: 42,
            ..Default::default()
        };
        let a = variant_params(&base);
        let b = variant_params(&base);
        for ((_, pa), (_, pb)) in a.iter().zip(b.iter()) {
            assert_eq!(pa.seed, pb.seed);
        }
        let seeds: Vec<u64> = a.iter().map(|(_, p)| p.seed).collect();
        assert_ne!(seeds[0], seeds[1]);
        assert_ne!(seeds[1], seeds[2]);
        assert_ne!(seeds[0], seeds[2]);
    }

    #[test]
    fn alternative_subset_is_never_empty() {
        let typologies = vec![
            Typology::Point,
            Typology::Slab,
            Typology::LShaped,
            Typology::HShaped,
        ];
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let subset = alternative_subset(&typologies, &mut rng);
            assert!(!subset.is_empty());
            assert!(subset.iter().all(|t| typologies.contains(t)));
        }
    }

    #[test]
    fn dense_variant_tightens_spacing_and_raises_floors() {
        let base = GenerationParams {
            spacing: 8.0,
            max_floors: Some(10),
            ..Default::default()
        };
        let (_, dense) = variant_params(&base)
            .into_iter()
            .find(|(n, _)| *n == "Max Density")
            .unwrap();
        assert!((dense.spacing - 6.0).abs() < 1e-9);
        assert_eq!(dense.max_floors, Some(14));
    }
}

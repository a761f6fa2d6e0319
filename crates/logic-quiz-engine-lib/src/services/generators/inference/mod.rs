//! Inference questions: premises from a template pair, with conclusions that
//! do or do not follow from them.

pub mod expansion;
pub mod template;

use rand::Rng;

use super::{budget_exceeded, Generated, Hints, PoolDemand};
use crate::config::{InferenceConfig, TemplatePair};
use crate::error::{GenerationError, Result};
use crate::models::{CandidatePools, Category, Formula, Profile};
use crate::services::formula_gen::MAX_ATTEMPTS;
use crate::services::validator::{derivable, joint_vars};

use expansion::expand_and_transform;
use template::{prepare_bindings, ParsedTemplate};

pub struct InferenceGenerator<'a> {
    cfg: &'a InferenceConfig,
}

impl<'a> InferenceGenerator<'a> {
    pub fn new(cfg: &'a InferenceConfig) -> Self {
        Self { cfg }
    }

    /// Uniform pick among the template pairs with exactly `chain_steps` steps.
    pub fn select_template<R: Rng + ?Sized>(&self, rng: &mut R, chain_steps: usize) -> Result<&'a TemplatePair> {
        let candidates: Vec<&'a TemplatePair> =
            self.cfg.template_pairs.iter().filter(|t| t.chain_steps == chain_steps).collect();
        if candidates.is_empty() {
            return Err(GenerationError::missing(format!("inference template for {} chain steps", chain_steps)));
        }
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, profile: &Profile, demand: &PoolDemand) -> Result<Generated> {
        let chain_steps = profile.inference.chain_steps;

        for attempt in 0..MAX_ATTEMPTS {
            let pair = self.select_template(rng, chain_steps)?;
            let template = ParsedTemplate::parse(pair)?;
            let bindings = prepare_bindings(rng, &pair.slots, &self.cfg.slot_fillers)?;
            let (premises, valid, invalid) = template.instantiate(&bindings)?;
            let (premises, mut valid, mut invalid) = expand_and_transform(&premises, &valid, &invalid, rng);

            let vars = joint_vars(premises.iter().chain(&valid).chain(&invalid));
            valid.retain(|c| derivable(&premises, c, &vars));
            invalid.retain(|c| !derivable(&premises, c, &vars));

            let mut hints = Hints::new();
            hints.insert("chain_steps", chain_steps);
            hints.insert("valid_conclusions", valid.len());
            hints.insert("invalid_conclusions", invalid.len());

            let pools = CandidatePools::Inference {
                premises: render_premises(&premises),
                vars,
                valid_conclusions: valid.iter().map(|c| c.to_string()).collect(),
                invalid_conclusions: invalid.iter().map(|c| c.to_string()).collect(),
            };
            if !demand.is_satisfied_by(&pools) {
                tracing::trace!(attempt, template = %pair.name, ?hints, "inference pools too small");
                continue;
            }
            return Ok(Generated { pools, hints });
        }

        Err(budget_exceeded(Category::Inference))
    }
}

pub fn render_premises(premises: &[Formula]) -> String {
    premises.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
}

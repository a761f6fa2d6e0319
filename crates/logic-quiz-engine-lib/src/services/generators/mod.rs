//! Category generators: each turns a profile into semantically checked
//! candidate pools, retrying internally up to [`MAX_ATTEMPTS`] times.

pub mod equivalence;
pub mod inference;
pub mod truth_table;

use rand::Rng;
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::error::{GenerationError, Result};
use crate::models::{AnswerType, CandidatePools, Category, Plan, PoolName, Profile, OPTION_COUNT};
use crate::services::formula_gen::MAX_ATTEMPTS;

pub use equivalence::EquivalenceGenerator;
pub use inference::InferenceGenerator;
pub use truth_table::TruthTableGenerator;

/// Diagnostic counters reported alongside the pools.
pub type Hints = BTreeMap<&'static str, usize>;

#[derive(Debug, Clone)]
pub struct Generated {
    pub pools: CandidatePools,
    pub hints: Hints,
}

/// What the answer format needs from the pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolDemand {
    Options {
        correct: PoolName,
        distractor: PoolName,
        correct_count: usize,
        distractor_count: usize,
    },
    TrueFalse {
        positive: PoolName,
        negative: PoolName,
    },
}

impl PoolDemand {
    /// Demand implied by the plan's intent and answer type.
    pub fn resolve(cfg: &AppConfig, plan: &Plan) -> Result<PoolDemand> {
        let mapping = cfg.pool_mapping(&plan.intent, plan.answer_type)?;
        for pool in [mapping.correct, mapping.distractor] {
            if pool.category() != plan.category {
                return Err(GenerationError::missing(format!(
                    "intent {} maps to pool {} outside category {}",
                    plan.intent,
                    pool.name(),
                    plan.category
                )));
            }
        }

        Ok(match plan.answer_type {
            AnswerType::TrueFalse => PoolDemand::TrueFalse {
                positive: mapping.correct,
                negative: mapping.distractor,
            },
            AnswerType::SingleChoice | AnswerType::MultipleChoice => {
                let k = plan.correct_count();
                PoolDemand::Options {
                    correct: mapping.correct,
                    distractor: mapping.distractor,
                    correct_count: k,
                    distractor_count: OPTION_COUNT - k,
                }
            }
        })
    }

    pub fn is_satisfied_by(&self, pools: &CandidatePools) -> bool {
        let len = |name: PoolName| pools.pool(name).map_or(0, |p| p.len());
        match *self {
            PoolDemand::Options { correct, distractor, correct_count, distractor_count } => {
                len(correct) >= correct_count && len(distractor) >= distractor_count
            }
            PoolDemand::TrueFalse { positive, negative } => len(positive) > 0 && len(negative) > 0,
        }
    }
}

/// Run the generator for the plan's category.
pub fn generate_pools<R: Rng + ?Sized>(
    cfg: &AppConfig,
    rng: &mut R,
    profile: &Profile,
    plan: &Plan,
    demand: &PoolDemand,
) -> Result<Generated> {
    match plan.category {
        Category::TruthTable => TruthTableGenerator.generate(rng, profile, demand),
        Category::Equivalence => EquivalenceGenerator::from_config(&cfg.equivalence).generate(rng, profile, demand),
        Category::Inference => InferenceGenerator::new(&cfg.inference).generate(rng, profile, demand),
    }
}

pub(crate) fn budget_exceeded(category: Category) -> GenerationError {
    tracing::debug!(%category, attempts = MAX_ATTEMPTS, "generator budget exhausted");
    GenerationError::BudgetExceeded { category, attempts: MAX_ATTEMPTS }
}

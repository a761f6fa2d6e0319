use rand::Rng;

use super::{budget_exceeded, Generated, Hints, PoolDemand};
use crate::error::{GenerationError, Result};
use crate::models::{CandidatePools, Category, Connective, Profile};
use crate::services::formula_gen::{canonical_vars, filter_vars, random_formula, MAX_ATTEMPTS};
use crate::services::validator::{enumerate_assignments, evaluate, render_assignment};

/// Pools of assignments that make a random formula true or false.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruthTableGenerator;

impl TruthTableGenerator {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, profile: &Profile, demand: &PoolDemand) -> Result<Generated> {
        if !can_split(profile, demand) {
            return Err(GenerationError::PlanInfeasible(format!(
                "depth {} formulas cannot split their rows {:?}",
                profile.max_depth, demand
            )));
        }
        let all_vars = canonical_vars(profile.vars);

        for attempt in 0..MAX_ATTEMPTS {
            let formula = random_formula(rng, profile);
            let vars = filter_vars(&all_vars, &formula);

            let mut true_set = Vec::new();
            let mut false_set = Vec::new();
            for row in enumerate_assignments(&vars) {
                let rendered = render_assignment(&vars, &row);
                if evaluate(&formula, &row) {
                    true_set.push(rendered);
                } else {
                    false_set.push(rendered);
                }
            }

            if true_set.is_empty() || false_set.is_empty() {
                tracing::trace!(attempt, %formula, "constant formula rejected");
                continue;
            }

            let mut hints = Hints::new();
            hints.insert("true_count", true_set.len());
            hints.insert("false_count", false_set.len());

            let pools = CandidatePools::TruthTable { formula, vars, true_set, false_set };
            if !demand.is_satisfied_by(&pools) {
                tracing::trace!(attempt, ?hints, "truth table pools too small");
                continue;
            }
            return Ok(Generated { pools, hints });
        }

        Err(budget_exceeded(Category::TruthTable))
    }
}

/// Up to depth 2 a formula is one connective over two variables. Without
/// `↔` its four rows always split 1/3 or 3/1.
fn can_split(profile: &Profile, demand: &PoolDemand) -> bool {
    if profile.max_depth > 2 || profile.allowed_ops.contains(&Connective::Iff) {
        return true;
    }
    match *demand {
        PoolDemand::Options { correct_count, distractor_count, .. } => correct_count.min(distractor_count) <= 1,
        PoolDemand::TrueFalse { .. } => true,
    }
}

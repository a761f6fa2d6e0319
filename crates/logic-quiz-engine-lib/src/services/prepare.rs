use rand::Rng;

use super::prompt::PromptData;
use crate::error::{GenerationError, Result};
use crate::models::{AnswerType, CandidatePools, Plan};

/// Prompt placeholders plus, for true/false, whether the statement holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub data: PromptData,
    pub tf_answer: bool,
}

/// Draw one element across both pools; `true` when it came from the first.
pub fn sample_polar<R: Rng + ?Sized>(positive: &[String], negative: &[String], rng: &mut R) -> Result<(String, bool)> {
    let total = positive.len() + negative.len();
    if total == 0 {
        return Err(GenerationError::PlanInfeasible("both pools are empty".into()));
    }
    let idx = rng.gen_range(0..total);
    Ok(match idx.checked_sub(positive.len()) {
        None => (positive[idx].clone(), true),
        Some(i) => (negative[i].clone(), false),
    })
}

pub fn prepare_prompt_data<R: Rng + ?Sized>(plan: &Plan, pools: &CandidatePools, rng: &mut R) -> Result<Prepared> {
    if pools.category() != plan.category {
        return Err(GenerationError::Precondition(format!(
            "{} pools handed to a {} plan",
            pools.category(),
            plan.category
        )));
    }

    let mut data = PromptData::new();
    let statement_key = match pools {
        CandidatePools::TruthTable { formula, .. } => {
            data.insert("F", formula.to_string());
            "alpha"
        }
        CandidatePools::Equivalence { target, .. } => {
            data.insert("T", target.to_string());
            "G"
        }
        CandidatePools::Inference { premises, .. } => {
            data.insert("Premises", premises.clone());
            "Conclusion"
        }
    };

    let mut tf_answer = false;
    if plan.answer_type == AnswerType::TrueFalse {
        let (positive, negative) = pools.polar_pools();
        let (statement, holds) = sample_polar(positive, negative, rng)?;
        data.insert(statement_key, statement);
        tf_answer = holds;
    }

    Ok(Prepared { data, tf_answer })
}

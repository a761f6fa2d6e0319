use serde::{Deserialize, Serialize};

use super::formula::Formula;
use super::question::Category;

/// Names under which intents refer to candidate pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolName {
    TrueSet,
    FalseSet,
    EquivPool,
    NonEquivPool,
    ValidConclusions,
    InvalidConclusions,
}

impl PoolName {
    pub fn name(&self) -> &'static str {
        match self {
            PoolName::TrueSet => "true_set",
            PoolName::FalseSet => "false_set",
            PoolName::EquivPool => "equiv_pool",
            PoolName::NonEquivPool => "non_equiv_pool",
            PoolName::ValidConclusions => "valid_conclusions",
            PoolName::InvalidConclusions => "invalid_conclusions",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            PoolName::TrueSet | PoolName::FalseSet => Category::TruthTable,
            PoolName::EquivPool | PoolName::NonEquivPool => Category::Equivalence,
            PoolName::ValidConclusions | PoolName::InvalidConclusions => Category::Inference,
        }
    }

    /// Positive and negative pool of a category, in that order
    pub fn pair_for(category: Category) -> (PoolName, PoolName) {
        match category {
            Category::TruthTable => (PoolName::TrueSet, PoolName::FalseSet),
            Category::Equivalence => (PoolName::EquivPool, PoolName::NonEquivPool),
            Category::Inference => (PoolName::ValidConclusions, PoolName::InvalidConclusions),
        }
    }
}

/// Semantically checked answer material for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidatePools {
    TruthTable {
        formula: Formula,
        vars: Vec<String>,
        true_set: Vec<String>,
        false_set: Vec<String>,
    },
    Equivalence {
        target: Formula,
        vars: Vec<String>,
        equiv_pool: Vec<String>,
        non_equiv_pool: Vec<String>,
    },
    Inference {
        premises: String,
        vars: Vec<String>,
        valid_conclusions: Vec<String>,
        invalid_conclusions: Vec<String>,
    },
}

impl CandidatePools {
    pub fn category(&self) -> Category {
        match self {
            CandidatePools::TruthTable { .. } => Category::TruthTable,
            CandidatePools::Equivalence { .. } => Category::Equivalence,
            CandidatePools::Inference { .. } => Category::Inference,
        }
    }

    /// Look up a pool by name; `None` when it belongs to another category.
    pub fn pool(&self, name: PoolName) -> Option<&[String]> {
        match (self, name) {
            (CandidatePools::TruthTable { true_set, .. }, PoolName::TrueSet) => Some(true_set.as_slice()),
            (CandidatePools::TruthTable { false_set, .. }, PoolName::FalseSet) => Some(false_set.as_slice()),
            (CandidatePools::Equivalence { equiv_pool, .. }, PoolName::EquivPool) => Some(equiv_pool.as_slice()),
            (CandidatePools::Equivalence { non_equiv_pool, .. }, PoolName::NonEquivPool) => {
                Some(non_equiv_pool.as_slice())
            }
            (CandidatePools::Inference { valid_conclusions, .. }, PoolName::ValidConclusions) => {
                Some(valid_conclusions.as_slice())
            }
            (CandidatePools::Inference { invalid_conclusions, .. }, PoolName::InvalidConclusions) => {
                Some(invalid_conclusions.as_slice())
            }
            _ => None,
        }
    }

    /// Positive and negative pools, used by true/false questions
    pub fn polar_pools(&self) -> (&[String], &[String]) {
        match self {
            CandidatePools::TruthTable { true_set, false_set, .. } => (true_set.as_slice(), false_set.as_slice()),
            CandidatePools::Equivalence { equiv_pool, non_equiv_pool, .. } => {
                (equiv_pool.as_slice(), non_equiv_pool.as_slice())
            }
            CandidatePools::Inference { valid_conclusions, invalid_conclusions, .. } => {
                (valid_conclusions.as_slice(), invalid_conclusions.as_slice())
            }
        }
    }

    pub fn vars(&self) -> &[String] {
        match self {
            CandidatePools::TruthTable { vars, .. }
            | CandidatePools::Equivalence { vars, .. }
            | CandidatePools::Inference { vars, .. } => vars,
        }
    }
}

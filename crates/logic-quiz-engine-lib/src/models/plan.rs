use serde::{Deserialize, Serialize};

use super::formula::BinaryOp;
use super::question::{AnswerType, Category, Difficulty};

/// Connectives a random formula may use, spelled as in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Connective {
    #[serde(rename = "NOT")]
    Not,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "IMP")]
    Implies,
    #[serde(rename = "IFF")]
    Iff,
}

impl Connective {
    pub fn name(&self) -> &'static str {
        match self {
            Connective::Not => "NOT",
            Connective::And => "AND",
            Connective::Or => "OR",
            Connective::Implies => "IMP",
            Connective::Iff => "IFF",
        }
    }

    pub fn from_name(s: &str) -> Option<Connective> {
        Self::all().iter().copied().find(|c| c.name() == s)
    }

    pub fn all() -> &'static [Connective] {
        &[Connective::Not, Connective::And, Connective::Or, Connective::Implies, Connective::Iff]
    }

    /// `None` for negation
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            Connective::Not => None,
            Connective::And => Some(BinaryOp::And),
            Connective::Or => Some(BinaryOp::Or),
            Connective::Implies => Some(BinaryOp::Implies),
            Connective::Iff => Some(BinaryOp::Iff),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceProfile {
    pub chain_steps: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceProfile {
    pub chain_steps: usize,
}

/// Structural budget for one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub vars: usize,
    pub max_depth: usize,
    pub allowed_ops: Vec<Connective>,
    #[serde(default)]
    pub equivalence: EquivalenceProfile,
    #[serde(default)]
    pub inference: InferenceProfile,
}

/// Which question to build: level, category, format and intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub difficulty: Difficulty,
    pub category: Category,
    pub answer_type: AnswerType,
    pub intent: String,
    /// Requested correct options for multiple choice; 0 means unset
    #[serde(default)]
    pub mc_correct_count: usize,
}

pub const DEFAULT_MC_CORRECT: usize = 2;
pub const OPTION_COUNT: usize = 4;

impl Plan {
    /// Effective number of correct options.
    pub fn correct_count(&self) -> usize {
        match self.answer_type {
            AnswerType::SingleChoice | AnswerType::TrueFalse => 1,
            AnswerType::MultipleChoice => match self.mc_correct_count {
                0 => DEFAULT_MC_CORRECT,
                k => k.min(OPTION_COUNT),
            },
        }
    }
}

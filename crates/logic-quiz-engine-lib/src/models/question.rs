use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn from_name(s: &str) -> Option<Difficulty> {
        Self::all().iter().copied().find(|d| d.name().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    TruthTable,
    Equivalence,
    Inference,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::TruthTable => "truthTable",
            Category::Equivalence => "equivalence",
            Category::Inference => "inference",
        }
    }

    pub fn all() -> &'static [Category] {
        &[Category::TruthTable, Category::Equivalence, Category::Inference]
    }

    /// Accepts the wire name as well as `truth-table` / `truth_table`.
    pub fn from_name(s: &str) -> Option<Category> {
        let folded: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::all().iter().copied().find(|c| c.name().eq_ignore_ascii_case(&folded))
    }
}

/// Answer format of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
}

impl AnswerType {
    pub fn name(&self) -> &'static str {
        match self {
            AnswerType::SingleChoice => "singleChoice",
            AnswerType::MultipleChoice => "multipleChoice",
            AnswerType::TrueFalse => "trueFalse",
        }
    }

    /// Short key used by intent pool mappings and templates
    pub fn abbreviation(&self) -> &'static str {
        match self {
            AnswerType::SingleChoice => "sc",
            AnswerType::MultipleChoice => "mc",
            AnswerType::TrueFalse => "tf",
        }
    }

    pub fn all() -> &'static [AnswerType] {
        &[AnswerType::SingleChoice, AnswerType::MultipleChoice, AnswerType::TrueFalse]
    }

    /// Accepts the wire name, the abbreviation, or a dashed spelling
    pub fn from_name(s: &str) -> Option<AnswerType> {
        let folded: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::all().iter().copied().find(|t| {
            t.name().eq_ignore_ascii_case(&folded) || t.abbreviation().eq_ignore_ascii_case(&folded)
        })
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(Difficulty, Category, AnswerType);

/// A finished quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: Vec<usize>,
    #[serde(rename = "type")]
    pub answer_type: AnswerType,
    pub category: Category,
    pub difficulty: Difficulty,
    pub is_active: bool,
}

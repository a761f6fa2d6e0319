//! Generation catalog: planner weights, difficulty profiles, intents, rewrite
//! rules and inference templates.
//!
//! The engine reads an [`AppConfig`] and never mutates it. [`AppConfig::default`]
//! is the built-in catalog; a JSON file with the same shape replaces it.

mod defaults;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, GenerationError, Result};
use crate::models::{AnswerType, Category, Difficulty, Formula, PoolName};

pub type Weights<K> = BTreeMap<K, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub difficulty_profiles: BTreeMap<Difficulty, DifficultyProfile>,
    pub planner: PlannerWeights,
    pub intents: BTreeMap<String, IntentSpec>,
    #[serde(default)]
    pub equivalence: EquivalenceConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Distributions a profile is drawn from at one difficulty level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub vars_dist: Weights<usize>,
    pub depth_dist: Weights<usize>,
    pub allowed_ops: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerWeights {
    pub difficulty_weights: Weights<Difficulty>,
    pub type_weights: BTreeMap<Difficulty, Weights<AnswerType>>,
    pub category_weights: BTreeMap<Difficulty, Weights<Category>>,
    pub intent_weights: BTreeMap<Category, BTreeMap<Difficulty, Weights<String>>>,
    #[serde(default)]
    pub mc_correct_count_dist: BTreeMap<Difficulty, Weights<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMapping {
    pub correct: PoolName,
    pub distractor: PoolName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPoolMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc: Option<PoolMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mc: Option<PoolMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tf: Option<PoolMapping>,
}

impl IntentPoolMapping {
    pub fn for_type(&self, answer_type: AnswerType) -> Option<PoolMapping> {
        match answer_type {
            AnswerType::SingleChoice => self.sc,
            AnswerType::MultipleChoice => self.mc,
            AnswerType::TrueFalse => self.tf,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplateSet {
    #[serde(default)]
    pub sc: Vec<String>,
    #[serde(default)]
    pub mc: Vec<String>,
    #[serde(default)]
    pub tf: Vec<String>,
}

impl PromptTemplateSet {
    pub fn for_type(&self, answer_type: AnswerType) -> &[String] {
        match answer_type {
            AnswerType::SingleChoice => &self.sc,
            AnswerType::MultipleChoice => &self.mc,
            AnswerType::TrueFalse => &self.tf,
        }
    }
}

/// A kind of question within a category, e.g. "pick the true assignment".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSpec {
    pub pool_mapping: IntentPoolMapping,
    pub templates: PromptTemplateSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub equivalent: Vec<RuleSpec>,
    #[serde(default)]
    pub nonequivalent: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainStepsConfig {
    pub chain_steps_dist: Weights<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceConfig {
    #[serde(default)]
    pub rules: RuleCatalog,
    #[serde(default)]
    pub difficulty: BTreeMap<Difficulty, ChainStepsConfig>,
}

/// How a template slot is filled with fresh variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotFiller {
    UseVar,
    UseNegVar,
    UseAnd,
    UseOr,
    UseConstTrue,
    UseConstFalse,
}

/// An expression pattern over slot names: either formula text such as
/// `"A → B"`, or an explicit `{kind, name, left, right}` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExprPattern {
    Text(String),
    Node(PatternNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<ExprPattern>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<ExprPattern>>,
}

impl ExprPattern {
    /// Build the pattern tree; slot names become variables.
    pub fn to_formula(&self) -> std::result::Result<Formula, String> {
        match self {
            ExprPattern::Text(text) => Formula::parse(text).map_err(|e| format!("'{}': {}", text, e)),
            ExprPattern::Node(node) => node.to_formula(),
        }
    }
}

impl PatternNode {
    fn child(&self, side: &Option<Box<ExprPattern>>, which: &str) -> std::result::Result<Formula, String> {
        side.as_deref()
            .ok_or_else(|| format!("{} pattern is missing its {} operand", self.kind, which))?
            .to_formula()
    }

    fn to_formula(&self) -> std::result::Result<Formula, String> {
        let kind = self.kind.to_uppercase();
        if kind == "VAR" {
            return match self.name.as_deref() {
                Some(name) if !name.is_empty() => Ok(Formula::var(name)),
                _ => Err("VAR pattern without a name".to_string()),
            };
        }
        let connective = crate::models::Connective::from_name(&kind)
            .ok_or_else(|| format!("unknown operator: {}", self.kind))?;
        let left = self.child(&self.left, "left")?;
        match connective.binary_op() {
            None => Ok(Formula::Not(Box::new(left))),
            Some(op) => Ok(Formula::binary(op, left, self.child(&self.right, "right")?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePair {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub chain_steps: usize,
    /// Slot name to slot type; the type selects a filler distribution
    pub slots: BTreeMap<String, String>,
    pub premises: Vec<ExprPattern>,
    pub valid: Vec<ExprPattern>,
    #[serde(default)]
    pub invalid: Vec<ExprPattern>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub template_pairs: Vec<TemplatePair>,
    #[serde(default)]
    pub slot_fillers: BTreeMap<String, Weights<SlotFiller>>,
    #[serde(default)]
    pub difficulty: BTreeMap<Difficulty, ChainStepsConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        defaults::builtin()
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn difficulty_profile(&self, difficulty: Difficulty) -> Result<&DifficultyProfile> {
        self.difficulty_profiles
            .get(&difficulty)
            .ok_or_else(|| GenerationError::missing(format!("difficulty profile for {}", difficulty)))
    }

    pub fn intent(&self, name: &str) -> Result<&IntentSpec> {
        self.intents
            .get(name)
            .ok_or_else(|| GenerationError::missing(format!("intent {}", name)))
    }

    /// Pool mapping of `intent` for `answer_type`
    pub fn pool_mapping(&self, intent: &str, answer_type: AnswerType) -> Result<PoolMapping> {
        self.intent(intent)?
            .pool_mapping
            .for_type(answer_type)
            .ok_or_else(|| {
                GenerationError::missing(format!("pool mapping for intent {} ({})", intent, answer_type.abbreviation()))
            })
    }
}

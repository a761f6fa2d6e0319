use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Represents a propositional logic formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Formula {
    Var(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
}

/// The four binary connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::And => "∧",
            BinaryOp::Or => "∨",
            BinaryOp::Implies => "→",
            BinaryOp::Iff => "↔",
        }
    }

    pub fn all() -> &'static [BinaryOp] {
        &[BinaryOp::And, BinaryOp::Or, BinaryOp::Implies, BinaryOp::Iff]
    }
}

impl Formula {
    pub fn var(name: impl Into<String>) -> Formula {
        Formula::Var(name.into())
    }

    /// Build a binary node of the given kind
    pub fn binary(op: BinaryOp, left: Formula, right: Formula) -> Formula {
        let (l, r) = (Box::new(left), Box::new(right));
        match op {
            BinaryOp::And => Formula::And(l, r),
            BinaryOp::Or => Formula::Or(l, r),
            BinaryOp::Implies => Formula::Implies(l, r),
            BinaryOp::Iff => Formula::Iff(l, r),
        }
    }

    /// Split a binary node into its connective and operands
    pub fn as_binary(&self) -> Option<(BinaryOp, &Formula, &Formula)> {
        match self {
            Formula::And(l, r) => Some((BinaryOp::And, l, r)),
            Formula::Or(l, r) => Some((BinaryOp::Or, l, r)),
            Formula::Implies(l, r) => Some((BinaryOp::Implies, l, r)),
            Formula::Iff(l, r) => Some((BinaryOp::Iff, l, r)),
            Formula::Var(_) | Formula::Not(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.as_binary().is_some()
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Formula::Var(_))
    }

    /// Create the negation of this formula
    pub fn negate(&self) -> Formula {
        Formula::Not(Box::new(self.clone()))
    }

    /// Get the inner formula if this is a negation
    pub fn negated_inner(&self) -> Option<&Formula> {
        match self {
            Formula::Not(inner) => Some(inner),
            _ => None,
        }
    }

    /// Canonical rendering; the engine's only identity key for formulas.
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// All variable names that occur in the formula, sorted
    pub fn variables(&self) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        self.collect_variables(&mut result);
        result
    }

    fn collect_variables(&self, set: &mut BTreeSet<String>) {
        match self {
            Formula::Var(name) => {
                set.insert(name.clone());
            }
            Formula::Not(inner) => inner.collect_variables(set),
            Formula::And(left, right)
            | Formula::Or(left, right)
            | Formula::Implies(left, right)
            | Formula::Iff(left, right) => {
                left.collect_variables(set);
                right.collect_variables(set);
            }
        }
    }

    pub fn contains_var(&self, name: &str) -> bool {
        match self {
            Formula::Var(v) => v == name,
            Formula::Not(inner) => inner.contains_var(name),
            Formula::And(left, right)
            | Formula::Or(left, right)
            | Formula::Implies(left, right)
            | Formula::Iff(left, right) => left.contains_var(name) || right.contains_var(name),
        }
    }

    /// Get the depth (nesting level) of the formula
    pub fn depth(&self) -> usize {
        match self {
            Formula::Var(_) => 0,
            Formula::Not(inner) => 1 + inner.depth(),
            Formula::And(left, right)
            | Formula::Or(left, right)
            | Formula::Implies(left, right)
            | Formula::Iff(left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Formula::Var(_) => 1,
            Formula::Not(inner) => 1 + inner.node_count(),
            Formula::And(left, right)
            | Formula::Or(left, right)
            | Formula::Implies(left, right)
            | Formula::Iff(left, right) => 1 + left.node_count() + right.node_count(),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_binary() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_binary(f: &mut fmt::Formatter<'_>, op: BinaryOp, left: &Formula, right: &Formula) -> fmt::Result {
        left.fmt_operand(f)?;
        write!(f, " {} ", op.symbol())?;
        right.fmt_operand(f)
    }
}

/// Binary operands are always parenthesised, the root never is.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Var(name) => f.write_str(name),
            Formula::Not(inner) => {
                f.write_str("¬")?;
                inner.fmt_operand(f)
            }
            Formula::And(left, right) => Self::fmt_binary(f, BinaryOp::And, left, right),
            Formula::Or(left, right) => Self::fmt_binary(f, BinaryOp::Or, left, right),
            Formula::Implies(left, right) => Self::fmt_binary(f, BinaryOp::Implies, left, right),
            Formula::Iff(left, right) => Self::fmt_binary(f, BinaryOp::Iff, left, right),
        }
    }
}

/// Maximum nesting depth allowed for formulas
const MAX_PARSE_DEPTH: usize = 100;

/// Maximum input length in characters
const MAX_INPUT_CHARS: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

/// Recursive-descent parser for propositional formulas.
///
/// Precedence from loosest to tightest: `↔`, `→` (right associative), `∨`,
/// `∧`, `¬`. ASCII spellings are accepted alongside the canonical symbols.
pub struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, depth: 0 }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError { message: message.into(), position: self.pos }
    }

    fn enter_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(self.error(format!("formula nested deeper than {} levels", MAX_PARSE_DEPTH)));
        }
        Ok(())
    }

    fn exit_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn parse(&mut self) -> Result<Formula, ParseError> {
        let result = self.parse_iff()?;
        self.skip_whitespace();
        match self.current_char() {
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Ok(result),
        }
    }

    fn parse_iff(&mut self) -> Result<Formula, ParseError> {
        let mut left = self.parse_implication()?;
        while self.matches_any(&["↔", "<->", "<=>", "≡"]) {
            self.enter_depth()?;
            let right = self.parse_implication()?;
            left = Formula::Iff(Box::new(left), Box::new(right));
            self.exit_depth();
        }
        Ok(left)
    }

    fn parse_implication(&mut self) -> Result<Formula, ParseError> {
        let left = self.parse_disjunction()?;
        if self.matches_any(&["→", "->", "=>", "⊃"]) {
            self.enter_depth()?;
            let right = self.parse_implication()?;
            self.exit_depth();
            return Ok(Formula::Implies(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_disjunction(&mut self) -> Result<Formula, ParseError> {
        let mut left = self.parse_conjunction()?;
        while self.matches_any(&["∨", "||", "|"]) {
            self.enter_depth()?;
            let right = self.parse_conjunction()?;
            left = Formula::Or(Box::new(left), Box::new(right));
            self.exit_depth();
        }
        Ok(left)
    }

    fn parse_conjunction(&mut self) -> Result<Formula, ParseError> {
        let mut left = self.parse_negation()?;
        while self.matches_any(&["∧", "&&", "&", "·"]) {
            self.enter_depth()?;
            let right = self.parse_negation()?;
            left = Formula::And(Box::new(left), Box::new(right));
            self.exit_depth();
        }
        Ok(left)
    }

    fn parse_negation(&mut self) -> Result<Formula, ParseError> {
        if self.matches_any(&["¬", "~", "!"]) {
            self.enter_depth()?;
            let inner = self.parse_negation()?;
            self.exit_depth();
            Ok(Formula::Not(Box::new(inner)))
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> Result<Formula, ParseError> {
        if self.matches("(") {
            self.enter_depth()?;
            let inner = self.parse_iff()?;
            if !self.matches(")") {
                return Err(self.error("expected closing parenthesis ')'"));
            }
            self.exit_depth();
            return Ok(inner);
        }

        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(self.error("expected variable, negation, or parenthesized expression"));
        }

        Ok(Formula::Var(self.input[start..self.pos].to_string()))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn matches(&mut self, s: &str) -> bool {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn matches_any(&mut self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.matches(t))
    }
}

impl Formula {
    /// Parse a formula from a string
    pub fn parse(input: &str) -> Result<Formula, ParseError> {
        if input.chars().count() > MAX_INPUT_CHARS {
            return Err(ParseError {
                message: format!("formula too long (max {} chars)", MAX_INPUT_CHARS),
                position: 0,
            });
        }
        FormulaParser::new(input).parse()
    }
}

impl std::str::FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

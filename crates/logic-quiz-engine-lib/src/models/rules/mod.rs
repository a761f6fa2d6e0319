pub mod breaking;
pub mod equivalence;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::formula::Formula;

/// Whether a rule keeps the meaning of the formula it rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleGroup {
    Preserving,
    Breaking,
}

/// Local rewrites applied by the rewrite engine, addressed by their
/// configuration names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteRule {
    // ¬¬p :: p
    DoubleNegation,
    // p → q :: ¬p ∨ q
    ImplicationElimination,
    // p ∧ q :: q ∧ p, also ∨ and ↔
    Commutativity,
    // ¬(p ∧ q) :: ¬p ∨ ¬q, ¬(p ∨ q) :: ¬p ∧ ¬q
    DeMorgan,
    // p ↔ q :: (p → q) ∧ (q → p)
    BiconditionalExpansion,
    // p ∧ (q ∧ r) :: (p ∧ q) ∧ r, also ∨
    Associativity,
    // p ∧ (q ∨ r) :: (p ∧ q) ∨ (p ∧ r), also the dual
    Distributivity,
    NegateRoot,
    ReverseImplication,
    FlipOperator,
    MutateLiteral,
}

impl RewriteRule {
    pub fn name(&self) -> &'static str {
        match self {
            RewriteRule::DoubleNegation => "double_negation",
            RewriteRule::ImplicationElimination => "implication_elimination",
            RewriteRule::Commutativity => "commutativity",
            RewriteRule::DeMorgan => "de_morgan",
            RewriteRule::BiconditionalExpansion => "biconditional_expansion",
            RewriteRule::Associativity => "associativity",
            RewriteRule::Distributivity => "distributivity",
            RewriteRule::NegateRoot => "negate_root",
            RewriteRule::ReverseImplication => "reverse_implication",
            RewriteRule::FlipOperator => "flip_operator",
            RewriteRule::MutateLiteral => "mutate_literal",
        }
    }

    pub fn from_name(s: &str) -> Option<RewriteRule> {
        Self::all().iter().copied().find(|r| r.name() == s)
    }

    pub fn all() -> &'static [RewriteRule] {
        &[
            RewriteRule::DoubleNegation,
            RewriteRule::ImplicationElimination,
            RewriteRule::Commutativity,
            RewriteRule::DeMorgan,
            RewriteRule::BiconditionalExpansion,
            RewriteRule::Associativity,
            RewriteRule::Distributivity,
            RewriteRule::NegateRoot,
            RewriteRule::ReverseImplication,
            RewriteRule::FlipOperator,
            RewriteRule::MutateLiteral,
        ]
    }

    pub fn group(&self) -> RuleGroup {
        match self {
            RewriteRule::NegateRoot
            | RewriteRule::ReverseImplication
            | RewriteRule::FlipOperator
            | RewriteRule::MutateLiteral => RuleGroup::Breaking,
            _ => RuleGroup::Preserving,
        }
    }

    /// Bit position used by the rewrite engine's per-path bookkeeping
    pub(crate) fn bit(&self) -> u16 {
        1 << (*self as u16)
    }

    /// Rewrite `node` at its root only. An empty result means the rule does
    /// not apply here.
    pub fn apply<R: Rng + ?Sized>(&self, node: &Formula, rng: &mut R) -> Vec<Formula> {
        match self {
            RewriteRule::DoubleNegation => equivalence::double_negation(node),
            RewriteRule::ImplicationElimination => equivalence::implication_elimination(node),
            RewriteRule::Commutativity => equivalence::commutativity(node),
            RewriteRule::DeMorgan => equivalence::de_morgan(node),
            RewriteRule::BiconditionalExpansion => equivalence::biconditional_expansion(node),
            RewriteRule::Associativity => equivalence::associativity(node),
            RewriteRule::Distributivity => equivalence::distributivity(node),
            RewriteRule::NegateRoot => breaking::negate_root(node),
            RewriteRule::ReverseImplication => breaking::reverse_implication(node),
            RewriteRule::FlipOperator => breaking::flip_operator(node),
            RewriteRule::MutateLiteral => breaking::mutate_literal(node, rng),
        }
    }
}

/// Resolve configured rule names, skipping the ones nobody implements.
pub fn resolve_rules<S: AsRef<str>>(names: &[S]) -> Vec<RewriteRule> {
    names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let rule = RewriteRule::from_name(name);
            if rule.is_none() {
                tracing::warn!(rule = name, "skipping unknown rewrite rule");
            }
            rule
        })
        .collect()
}

/// Keep the first formula for every canonical rendering.
pub(crate) fn dedup_by_signature(forms: Vec<Formula>) -> Vec<Formula> {
    let mut seen = HashSet::new();
    forms.into_iter().filter(|f| seen.insert(f.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for rule in RewriteRule::all() {
            assert_eq!(RewriteRule::from_name(rule.name()), Some(*rule));
            assert_eq!(serde_json::to_string(rule).unwrap(), format!("\"{}\"", rule.name()));
        }
    }

    #[test]
    fn test_groups() {
        assert_eq!(RewriteRule::DeMorgan.group(), RuleGroup::Preserving);
        assert_eq!(RewriteRule::Distributivity.group(), RuleGroup::Preserving);
        assert_eq!(RewriteRule::MutateLiteral.group(), RuleGroup::Breaking);
        assert_eq!(RewriteRule::NegateRoot.group(), RuleGroup::Breaking);
    }

    #[test]
    fn test_bits_are_distinct() {
        let mut mask = 0u16;
        for rule in RewriteRule::all() {
            assert_eq!(mask & rule.bit(), 0);
            mask |= rule.bit();
        }
    }

    #[test]
    fn test_resolve_skips_unknown_names() {
        let rules = resolve_rules(&["de_morgan", "modus_ponens", "commutativity"]);
        assert_eq!(rules, vec![RewriteRule::DeMorgan, RewriteRule::Commutativity]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let forms = vec![
            Formula::parse("p & q").unwrap(),
            Formula::parse("q").unwrap(),
            Formula::parse("(p & q)").unwrap(),
        ];
        let deduped = dedup_by_signature(forms);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].to_string(), "p ∧ q");
    }
}

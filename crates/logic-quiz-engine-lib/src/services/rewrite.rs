//! Bounded breadth-first rewriting.
//!
//! Each frontier state remembers which rules produced it; a rule is not
//! applied twice along one path. Candidates are collected globally by
//! canonical signature, first occurrence wins.

use indexmap::IndexMap;
use rand::Rng;
use std::collections::HashSet;

use crate::models::rules::RewriteRule;
use crate::models::Formula;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct UsedRules(u16);

impl UsedRules {
    fn contains(self, rule: RewriteRule) -> bool {
        self.0 & rule.bit() != 0
    }

    fn with(self, rule: RewriteRule) -> Self {
        UsedRules(self.0 | rule.bit())
    }
}

struct State {
    node: Formula,
    used: UsedRules,
}

#[derive(Debug, Clone)]
pub struct RewriteEngine {
    rules: Vec<RewriteRule>,
    limit: usize,
}

impl RewriteEngine {
    pub fn new(rules: Vec<RewriteRule>, limit: usize) -> Self {
        Self { rules, limit }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Every distinct variant reachable from `root` in at most `limit` rule
    /// applications, in discovery order. `root` itself is only included if a
    /// rewrite reproduces it.
    pub fn execute<R: Rng + ?Sized>(&self, root: &Formula, rng: &mut R) -> Vec<Formula> {
        if self.limit == 0 || self.rules.is_empty() {
            return Vec::new();
        }

        let mut results: IndexMap<String, Formula> = IndexMap::new();
        let mut frontier = vec![State { node: root.clone(), used: UsedRules::default() }];

        for step in 0..self.limit {
            let last_step = step + 1 >= self.limit;
            let mut next = Vec::new();
            let mut seen = HashSet::new();

            for state in &frontier {
                for &rule in &self.rules {
                    if state.used.contains(rule) {
                        continue;
                    }
                    for variant in apply_everywhere(&state.node, rule, rng) {
                        let sig = variant.to_string();
                        results.entry(sig.clone()).or_insert_with(|| variant.clone());
                        if last_step || !seen.insert(sig) {
                            continue;
                        }
                        next.push(State { node: variant, used: state.used.with(rule) });
                    }
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        tracing::trace!(root = %root, variants = results.len(), "rewrite finished");
        results.into_values().collect()
    }
}

/// Apply `rule` at `node` and at every subtree, rebuilding the enclosing
/// tree around each local rewrite.
pub fn apply_everywhere<R: Rng + ?Sized>(node: &Formula, rule: RewriteRule, rng: &mut R) -> Vec<Formula> {
    let mut out = rule.apply(node, rng);
    match node {
        Formula::Var(_) => {}
        Formula::Not(inner) => {
            out.extend(apply_everywhere(inner, rule, rng).into_iter().map(|v| Formula::Not(Box::new(v))));
        }
        _ => {
            if let Some((op, left, right)) = node.as_binary() {
                for v in apply_everywhere(left, rule, rng) {
                    out.push(Formula::binary(op, v, right.clone()));
                }
                for v in apply_everywhere(right, rule, rng) {
                    out.push(Formula::binary(op, left.clone(), v));
                }
            }
        }
    }
    out
}

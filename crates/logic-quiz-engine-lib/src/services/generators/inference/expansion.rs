//! Surface variation for instantiated templates.

use rand::Rng;
use std::collections::HashSet;

use crate::models::rules::{dedup_by_signature, RewriteRule};
use crate::models::Formula;
use crate::services::rewrite::RewriteEngine;

const TRANSFORM_PROBABILITY: f64 = 0.75;
const TRANSFORM_LIMIT: usize = 3;
const TRANSFORM_RULES: [RewriteRule; 4] = [
    RewriteRule::DeMorgan,
    RewriteRule::Distributivity,
    RewriteRule::ImplicationElimination,
    RewriteRule::BiconditionalExpansion,
];

/// With probability 0.75 replace each formula by a uniform pick among itself
/// and its rewrites.
pub fn transform_nodes<R: Rng + ?Sized>(nodes: &[Formula], rng: &mut R) -> Vec<Formula> {
    let engine = RewriteEngine::new(TRANSFORM_RULES.to_vec(), TRANSFORM_LIMIT);
    nodes
        .iter()
        .map(|node| {
            if rng.gen::<f64>() < TRANSFORM_PROBABILITY {
                let mut variants = engine.execute(node, rng);
                variants.push(node.clone());
                let pick = rng.gen_range(0..variants.len());
                variants.swap_remove(pick)
            } else {
                node.clone()
            }
        })
        .collect()
}

/// Conjunctive valid conclusions also yield their conjuncts; disjunctive
/// invalid conclusions also yield their disjuncts.
pub fn expand_conclusions(valid: Vec<Formula>, invalid: Vec<Formula>) -> (Vec<Formula>, Vec<Formula>) {
    let mut expanded_valid = Vec::with_capacity(valid.len());
    for node in valid {
        let parts = match &node {
            Formula::And(left, right) => Some((left.as_ref().clone(), right.as_ref().clone())),
            _ => None,
        };
        expanded_valid.push(node);
        if let Some((left, right)) = parts {
            expanded_valid.push(left);
            expanded_valid.push(right);
        }
    }

    let mut expanded_invalid = Vec::with_capacity(invalid.len());
    for node in invalid {
        let parts = match &node {
            Formula::Or(left, right) => Some((left.as_ref().clone(), right.as_ref().clone())),
            _ => None,
        };
        expanded_invalid.push(node);
        if let Some((left, right)) = parts {
            expanded_invalid.push(left);
            expanded_invalid.push(right);
        }
    }
    (expanded_valid, expanded_invalid)
}

/// Drop conclusions that restate a premise verbatim.
pub fn drop_restated_premises(premises: &[Formula], conclusions: Vec<Formula>) -> Vec<Formula> {
    let stated: HashSet<String> = premises.iter().map(|p| p.to_string()).collect();
    conclusions.into_iter().filter(|c| !stated.contains(&c.to_string())).collect()
}

/// Transform premises and conclusions, expand, then drop restated premises
/// and duplicates. Returns `(premises, valid, invalid)`.
pub fn expand_and_transform<R: Rng + ?Sized>(
    premises: &[Formula],
    valid: &[Formula],
    invalid: &[Formula],
    rng: &mut R,
) -> (Vec<Formula>, Vec<Formula>, Vec<Formula>) {
    let premises = transform_nodes(premises, rng);
    let valid = transform_nodes(valid, rng);
    let invalid = transform_nodes(invalid, rng);
    let (valid, invalid) = expand_conclusions(valid, invalid);
    let valid = dedup_by_signature(drop_restated_premises(&premises, valid));
    let invalid = dedup_by_signature(drop_restated_premises(&premises, invalid));
    (premises, valid, invalid)
}

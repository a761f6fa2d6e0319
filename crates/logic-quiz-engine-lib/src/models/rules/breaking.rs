//! Rewrites meant to change a formula's meaning.

use rand::Rng;

use crate::models::formula::Formula;

pub fn negate_root(node: &Formula) -> Vec<Formula> {
    vec![node.negate()]
}

pub fn reverse_implication(node: &Formula) -> Vec<Formula> {
    match node {
        Formula::Implies(a, b) => vec![Formula::Implies(b.clone(), a.clone())],
        _ => Vec::new(),
    }
}

pub fn flip_operator(node: &Formula) -> Vec<Formula> {
    match node {
        Formula::And(a, b) => vec![Formula::Or(a.clone(), b.clone())],
        Formula::Or(a, b) => vec![Formula::And(a.clone(), b.clone())],
        Formula::Implies(a, b) => vec![Formula::And(a.clone(), b.clone())],
        Formula::Iff(a, b) => vec![Formula::Implies(a.clone(), b.clone())],
        _ => Vec::new(),
    }
}

/// Toggle a negation on a literal, or on one operand of a binary node.
pub fn mutate_literal<R: Rng + ?Sized>(node: &Formula, rng: &mut R) -> Vec<Formula> {
    match node {
        Formula::Var(_) => vec![node.negate()],
        Formula::Not(inner) => match inner.as_ref() {
            Formula::Var(_) => vec![inner.as_ref().clone()],
            other => vec![other.negate().negate()],
        },
        _ => {
            let Some((op, left, right)) = node.as_binary() else {
                return Vec::new();
            };
            let mutated = if rng.gen_range(0..2) == 1 {
                Formula::binary(op, left.clone(), right.negate())
            } else {
                Formula::binary(op, left.negate(), right.clone())
            };
            vec![mutated]
        }
    }
}

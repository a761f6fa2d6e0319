//! Rewrites that keep a formula's truth table intact.

use super::dedup_by_signature;
use crate::models::formula::{BinaryOp, Formula};

fn same(a: &Formula, b: &Formula) -> bool {
    a.to_string() == b.to_string()
}

pub fn double_negation(node: &Formula) -> Vec<Formula> {
    let mut results = Vec::new();
    if let Formula::Not(inner) = node {
        if let Formula::Not(x) = inner.as_ref() {
            results.push(x.as_ref().clone());
        }
    }
    // Introduction is always available.
    results.push(node.negate().negate());
    dedup_by_signature(results)
}

pub fn implication_elimination(node: &Formula) -> Vec<Formula> {
    match node {
        Formula::Implies(a, b) => vec![Formula::Or(Box::new(a.negate()), b.clone())],
        Formula::Or(left, b) => match left.as_ref() {
            Formula::Not(a) => vec![Formula::Implies(a.clone(), b.clone())],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

pub fn commutativity(node: &Formula) -> Vec<Formula> {
    match node {
        Formula::And(p, q) => vec![Formula::And(q.clone(), p.clone())],
        Formula::Or(p, q) => vec![Formula::Or(q.clone(), p.clone())],
        Formula::Iff(p, q) => vec![Formula::Iff(q.clone(), p.clone())],
        _ => Vec::new(),
    }
}

pub fn de_morgan(node: &Formula) -> Vec<Formula> {
    let Some(inner) = node.negated_inner() else {
        return Vec::new();
    };
    match inner {
        Formula::And(p, q) => vec![Formula::Or(Box::new(p.negate()), Box::new(q.negate()))],
        Formula::Or(p, q) => vec![Formula::And(Box::new(p.negate()), Box::new(q.negate()))],
        _ => Vec::new(),
    }
}

pub fn biconditional_expansion(node: &Formula) -> Vec<Formula> {
    match node {
        Formula::Iff(a, b) => vec![Formula::And(
            Box::new(Formula::Implies(a.clone(), b.clone())),
            Box::new(Formula::Implies(b.clone(), a.clone())),
        )],
        Formula::And(left, right) => match (left.as_ref(), right.as_ref()) {
            (Formula::Implies(a, b), Formula::Implies(c, d)) if same(a, d) && same(b, c) => {
                vec![Formula::Iff(a.clone(), b.clone())]
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

pub fn associativity(node: &Formula) -> Vec<Formula> {
    let Some((op, left, right)) = node.as_binary() else {
        return Vec::new();
    };
    if !matches!(op, BinaryOp::And | BinaryOp::Or) {
        return Vec::new();
    }

    let mut results = Vec::new();
    // x ∘ (y ∘ z) => (x ∘ y) ∘ z
    if let Some((inner_op, y, z)) = right.as_binary() {
        if inner_op == op {
            results.push(Formula::binary(
                op,
                Formula::binary(op, left.clone(), y.clone()),
                z.clone(),
            ));
        }
    }
    // (x ∘ y) ∘ z => x ∘ (y ∘ z)
    if let Some((inner_op, x, y)) = left.as_binary() {
        if inner_op == op {
            results.push(Formula::binary(
                op,
                x.clone(),
                Formula::binary(op, y.clone(), right.clone()),
            ));
        }
    }
    dedup_by_signature(results)
}

pub fn distributivity(node: &Formula) -> Vec<Formula> {
    let Some((outer, left, right)) = node.as_binary() else {
        return Vec::new();
    };
    let inner = match outer {
        BinaryOp::And => BinaryOp::Or,
        BinaryOp::Or => BinaryOp::And,
        _ => return Vec::new(),
    };

    let mut results = Vec::new();
    let spread = |a: &Formula, b: &Formula, c: &Formula| {
        Formula::binary(
            inner,
            Formula::binary(outer, a.clone(), b.clone()),
            Formula::binary(outer, a.clone(), c.clone()),
        )
    };

    // A ∘ (B • C) => (A ∘ B) • (A ∘ C)
    if let Some((op, b, c)) = right.as_binary() {
        if op == inner {
            results.push(spread(left, b, c));
        }
    }
    // (B • C) ∘ A => (A ∘ B) • (A ∘ C)
    if let Some((op, b, c)) = left.as_binary() {
        if op == inner {
            results.push(spread(right, b, c));
        }
    }

    // (X • A) ∘ (X • B) => X • (A ∘ B)
    if let (Some((lop, _, _)), Some((rop, _, _))) = (left.as_binary(), right.as_binary()) {
        if lop == inner && rop == inner {
            if let Some((common, rest_left, rest_right)) = common_factor(left, right) {
                results.push(Formula::binary(
                    inner,
                    common.clone(),
                    Formula::binary(outer, rest_left.clone(), rest_right.clone()),
                ));
            }
        }
    }
    dedup_by_signature(results)
}

/// First child of `a` that also appears among the children of `b`, with the
/// remaining child of each side.
fn common_factor<'a>(a: &'a Formula, b: &'a Formula) -> Option<(&'a Formula, &'a Formula, &'a Formula)> {
    let (_, a1, a2) = a.as_binary()?;
    let (_, b1, b2) = b.as_binary()?;
    for ca in [a1, a2] {
        for cb in [b1, b2] {
            if same(ca, cb) {
                return Some((ca, other_child(a1, a2, ca), other_child(b1, b2, cb)));
            }
        }
    }
    None
}

fn other_child<'a>(left: &'a Formula, right: &'a Formula, child: &Formula) -> &'a Formula {
    if same(left, child) {
        right
    } else {
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(s: &str) -> Formula {
        Formula::parse(s).unwrap()
    }

    fn rendered(forms: Vec<Formula>) -> Vec<String> {
        forms.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(rendered(double_negation(&f("~~p"))), vec!["p", "¬¬¬¬p"]);
        assert_eq!(rendered(double_negation(&f("p & q"))), vec!["¬¬(p ∧ q)"]);
    }

    #[test]
    fn test_implication_elimination_both_ways() {
        assert_eq!(rendered(implication_elimination(&f("p -> q"))), vec!["¬p ∨ q"]);
        assert_eq!(rendered(implication_elimination(&f("~p | q"))), vec!["p → q"]);
        assert!(implication_elimination(&f("p | q")).is_empty());
    }

    #[test]
    fn test_commutativity() {
        assert_eq!(rendered(commutativity(&f("p <-> ~q"))), vec!["¬q ↔ p"]);
        assert!(commutativity(&f("p -> q")).is_empty());
    }

    #[test]
    fn test_de_morgan() {
        assert_eq!(rendered(de_morgan(&f("~(p & q)"))), vec!["¬p ∨ ¬q"]);
        assert_eq!(rendered(de_morgan(&f("~(p | ~q)"))), vec!["¬p ∧ ¬¬q"]);
        assert!(de_morgan(&f("~p")).is_empty());
    }

    #[test]
    fn test_biconditional_expansion_and_contraction() {
        assert_eq!(rendered(biconditional_expansion(&f("p <-> q"))), vec!["(p → q) ∧ (q → p)"]);
        assert_eq!(rendered(biconditional_expansion(&f("(p -> q) & (q -> p)"))), vec!["p ↔ q"]);
        assert!(biconditional_expansion(&f("(p -> q) & (r -> p)")).is_empty());
    }

    #[test]
    fn test_associativity() {
        assert_eq!(rendered(associativity(&f("p & (q & r)"))), vec!["(p ∧ q) ∧ r"]);
        assert_eq!(rendered(associativity(&f("(p | q) | r"))), vec!["p ∨ (q ∨ r)"]);
        assert_eq!(
            rendered(associativity(&f("(p & q) & (r & s)"))),
            vec!["((p ∧ q) ∧ r) ∧ s", "p ∧ (q ∧ (r ∧ s))"]
        );
        assert!(associativity(&f("p & (q | r)")).is_empty());
    }

    #[test]
    fn test_distributivity_spreads() {
        assert_eq!(rendered(distributivity(&f("p & (q | r)"))), vec!["(p ∧ q) ∨ (p ∧ r)"]);
        assert_eq!(rendered(distributivity(&f("(q | r) & p"))), vec!["(p ∧ q) ∨ (p ∧ r)"]);
        assert_eq!(rendered(distributivity(&f("p | (q & r)"))), vec!["(p ∨ q) ∧ (p ∨ r)"]);
    }

    #[test]
    fn test_distributivity_factors() {
        let out = rendered(distributivity(&f("(p & q) | (p & r)")));
        assert!(out.contains(&"p ∧ (q ∨ r)".to_string()), "{:?}", out);

        let out = rendered(distributivity(&f("(q | p) & (r | p)")));
        assert!(out.contains(&"p ∨ (q ∧ r)".to_string()), "{:?}", out);
    }
}

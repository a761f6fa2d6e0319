use rand::Rng;

use crate::models::{Connective, Formula, Profile};

/// Variable names random formulas draw from, in order.
pub const CANONICAL_VARS: [&str; 5] = ["p", "q", "r", "s", "t"];

/// Attempt budget shared by the generators.
pub const MAX_ATTEMPTS: usize = 64;

const LEAF_PROBABILITY: f64 = 0.1;

const DEFAULT_OPS: [Connective; 3] = [Connective::And, Connective::Or, Connective::Not];

/// The first `count` canonical variables, `count` clamped to 1..=5
pub fn canonical_vars(count: usize) -> Vec<String> {
    let n = count.clamp(1, CANONICAL_VARS.len());
    CANONICAL_VARS[..n].iter().map(|v| v.to_string()).collect()
}

/// Random formula within the profile's variable and depth budget.
///
/// Retries until at least two distinct variables occur (one if the budget
/// only allows one); after [`MAX_ATTEMPTS`] the next tree is returned as is.
pub fn random_formula<R: Rng + ?Sized>(rng: &mut R, profile: &Profile) -> Formula {
    let vars = canonical_vars(profile.vars);
    let ops: &[Connective] = if profile.allowed_ops.is_empty() {
        &DEFAULT_OPS
    } else {
        &profile.allowed_ops
    };
    let required = vars.len().min(2);

    for _ in 0..MAX_ATTEMPTS {
        let formula = build_node(rng, &vars, ops, profile.max_depth);
        if formula.variables().len() >= required {
            return formula;
        }
    }
    build_node(rng, &vars, ops, profile.max_depth)
}

fn build_node<R: Rng + ?Sized>(rng: &mut R, vars: &[String], ops: &[Connective], depth: usize) -> Formula {
    if depth <= 1 || rng.gen::<f64>() < LEAF_PROBABILITY {
        return Formula::Var(vars[rng.gen_range(0..vars.len())].clone());
    }
    let op = ops[rng.gen_range(0..ops.len())];
    match op.binary_op() {
        None => Formula::Not(Box::new(build_node(rng, vars, ops, depth - 1))),
        Some(binary) => {
            let left = build_node(rng, vars, ops, depth - 1);
            let right = build_node(rng, vars, ops, depth - 1);
            Formula::binary(binary, left, right)
        }
    }
}

/// The members of `all` that occur in `formula`, in the order of `all`.
/// Falls back to `all` when none occurs.
pub fn filter_vars(all: &[String], formula: &Formula) -> Vec<String> {
    let used: Vec<String> = all.iter().filter(|v| formula.contains_var(v)).cloned().collect();
    if used.is_empty() {
        all.to_vec()
    } else {
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquivalenceProfile, InferenceProfile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn profile(vars: usize, max_depth: usize, ops: &[Connective]) -> Profile {
        Profile {
            vars,
            max_depth,
            allowed_ops: ops.to_vec(),
            equivalence: EquivalenceProfile::default(),
            inference: InferenceProfile::default(),
        }
    }

    #[test]
    fn test_canonical_vars_clamped() {
        assert_eq!(canonical_vars(0), vec!["p"]);
        assert_eq!(canonical_vars(3), vec!["p", "q", "r"]);
        assert_eq!(canonical_vars(9).len(), 5);
    }

    #[test]
    fn test_respects_budget() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p = profile(3, 4, &[Connective::And, Connective::Implies, Connective::Not]);
        for _ in 0..200 {
            let f = random_formula(&mut rng, &p);
            assert!(f.depth() < 4, "{}", f);
            assert!(f.variables().len() >= 2, "{}", f);
            for v in f.variables() {
                assert!(["p", "q", "r"].contains(&v.as_str()));
            }
            let rendered = f.to_string();
            assert!(!rendered.contains('∨') && !rendered.contains('↔'), "{}", rendered);
        }
    }

    #[test]
    fn test_empty_ops_default_to_and_or_not() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let p = profile(2, 3, &[]);
        for _ in 0..100 {
            let s = random_formula(&mut rng, &p).to_string();
            assert!(!s.contains('→') && !s.contains('↔'), "{}", s);
        }
    }

    #[test]
    fn test_single_variable_budget() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let f = random_formula(&mut rng, &profile(1, 3, &[Connective::Not]));
        assert_eq!(f.variables().into_iter().collect::<Vec<_>>(), vec!["p"]);
    }

    #[test]
    fn test_depth_one_is_a_leaf() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let f = random_formula(&mut rng, &profile(2, 1, &[Connective::And]));
        assert!(f.is_var());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let p = profile(4, 4, Connective::all());
        let a: Vec<String> = {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            (0..10).map(|_| random_formula(&mut rng, &p).to_string()).collect()
        };
        let b: Vec<String> = {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            (0..10).map(|_| random_formula(&mut rng, &p).to_string()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_vars() {
        let all = canonical_vars(4);
        let f = Formula::parse("s -> q").unwrap();
        assert_eq!(filter_vars(&all, &f), vec!["q", "s"]);
        assert_eq!(filter_vars(&all, &Formula::var("z")), all);
    }
}

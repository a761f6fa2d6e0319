//! Brute-force semantics over explicit variable lists.

use std::collections::{BTreeSet, HashMap};

use crate::models::Formula;

pub type Assignment = HashMap<String, bool>;

/// Evaluate under `assignment`; variables it does not mention are false.
pub fn evaluate(formula: &Formula, assignment: &Assignment) -> bool {
    match formula {
        Formula::Var(name) => assignment.get(name).copied().unwrap_or(false),
        Formula::Not(inner) => !evaluate(inner, assignment),
        Formula::And(left, right) => evaluate(left, assignment) && evaluate(right, assignment),
        Formula::Or(left, right) => evaluate(left, assignment) || evaluate(right, assignment),
        Formula::Implies(left, right) => !evaluate(left, assignment) || evaluate(right, assignment),
        Formula::Iff(left, right) => evaluate(left, assignment) == evaluate(right, assignment),
    }
}

/// Every assignment over `vars`. Row `m` gives `vars[i]` the value of bit `i` of `m`.
pub fn enumerate_assignments(vars: &[String]) -> Vec<Assignment> {
    let rows = 1usize << vars.len();
    (0..rows)
        .map(|mask| {
            vars.iter()
                .enumerate()
                .map(|(i, v)| (v.clone(), (mask >> i) & 1 == 1))
                .collect()
        })
        .collect()
}

/// `p=T, q=F` in the order of `vars`
pub fn render_assignment(vars: &[String], assignment: &Assignment) -> String {
    vars.iter()
        .map(|v| {
            let value = if assignment.get(v).copied().unwrap_or(false) { "T" } else { "F" };
            format!("{}={}", v, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn equivalent(a: &Formula, b: &Formula, vars: &[String]) -> bool {
    enumerate_assignments(vars)
        .iter()
        .all(|row| evaluate(a, row) == evaluate(b, row))
}

/// Semantic entailment that additionally requires the premises to be
/// satisfiable, so contradictory premises derive nothing.
pub fn derivable(premises: &[Formula], conclusion: &Formula, vars: &[String]) -> bool {
    let mut satisfiable = false;
    for row in enumerate_assignments(vars) {
        if premises.iter().all(|p| evaluate(p, &row)) {
            satisfiable = true;
            if !evaluate(conclusion, &row) {
                return false;
            }
        }
    }
    satisfiable
}

pub fn is_tautology(formula: &Formula, vars: &[String]) -> bool {
    enumerate_assignments(vars).iter().all(|row| evaluate(formula, row))
}

pub fn is_contradiction(formula: &Formula, vars: &[String]) -> bool {
    !enumerate_assignments(vars).iter().any(|row| evaluate(formula, row))
}

/// One `(assignment, value)` pair per row, in enumeration order
pub fn truth_table(formula: &Formula, vars: &[String]) -> Vec<(Assignment, bool)> {
    enumerate_assignments(vars)
        .into_iter()
        .map(|row| {
            let value = evaluate(formula, &row);
            (row, value)
        })
        .collect()
}

/// Sorted union of the variables of `formulas`
pub fn joint_vars<'a>(formulas: impl IntoIterator<Item = &'a Formula>) -> Vec<String> {
    let mut vars = BTreeSet::new();
    for f in formulas {
        vars.extend(f.variables());
    }
    vars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(s: &str) -> Formula {
        Formula::parse(s).unwrap()
    }

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unassigned_variable_is_false() {
        let assignment = Assignment::new();
        assert!(!evaluate(&f("p"), &assignment));
        assert!(evaluate(&f("p -> q"), &assignment));
    }

    #[test]
    fn test_enumeration_order() {
        let rows = enumerate_assignments(&vars(&["p", "q"]));
        let rendered: Vec<String> = rows.iter().map(|r| render_assignment(&vars(&["p", "q"]), r)).collect();
        assert_eq!(rendered, vec!["p=F, q=F", "p=T, q=F", "p=F, q=T", "p=T, q=T"]);
        assert_eq!(enumerate_assignments(&[]).len(), 1);
    }

    #[test]
    fn test_implication_elimination_is_equivalent() {
        assert!(equivalent(&f("p -> q"), &f("~p | q"), &vars(&["p", "q"])));
    }

    #[test]
    fn test_and_or_not_equivalent() {
        assert!(!equivalent(&f("p & q"), &f("p | q"), &vars(&["p", "q"])));
    }

    #[test]
    fn test_de_morgan_equivalence() {
        assert!(equivalent(&f("~(p & q)"), &f("~p | ~q"), &vars(&["p", "q"])));
    }

    #[test]
    fn test_modus_ponens_derivable() {
        let premises = vec![f("p -> q"), f("p")];
        assert!(derivable(&premises, &f("q"), &vars(&["p", "q"])));
        assert!(!derivable(&premises, &f("~q"), &vars(&["p", "q"])));
    }

    #[test]
    fn test_contradictory_premises_derive_nothing() {
        let premises = vec![f("p"), f("~p")];
        assert!(!derivable(&premises, &f("q"), &vars(&["p", "q"])));
        assert!(!derivable(&premises, &f("p | ~p"), &vars(&["p", "q"])));
    }

    #[test]
    fn test_tautology_and_contradiction() {
        let pq = vars(&["p", "q"]);
        assert!(is_tautology(&f("p | ~p"), &pq));
        assert!(is_contradiction(&f("p & ~p"), &pq));
        assert!(!is_tautology(&f("p -> q"), &pq));
        assert!(!is_contradiction(&f("p -> q"), &pq));
    }

    #[test]
    fn test_truth_table_rows() {
        let pq = vars(&["p", "q"]);
        let table = truth_table(&f("p & q"), &pq);
        assert_eq!(table.len(), 4);
        assert_eq!(table.iter().filter(|(_, v)| *v).count(), 1);
        assert_eq!(render_assignment(&pq, &table[3].0), "p=T, q=T");
        assert!(table[3].1);
    }

    #[test]
    fn test_joint_vars() {
        let a = f("r -> p");
        let b = f("q & p");
        assert_eq!(joint_vars([&a, &b]), vec!["p", "q", "r"]);
    }
}

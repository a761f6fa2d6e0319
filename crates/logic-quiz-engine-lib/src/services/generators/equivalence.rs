use rand::Rng;

use super::{budget_exceeded, Generated, Hints, PoolDemand};
use crate::config::EquivalenceConfig;
use crate::error::Result;
use crate::models::rules::{resolve_rules, RewriteRule};
use crate::models::{CandidatePools, Category, Profile};
use crate::services::formula_gen::{canonical_vars, filter_vars, random_formula, MAX_ATTEMPTS};
use crate::services::rewrite::RewriteEngine;
use crate::services::validator::{equivalent, is_contradiction, is_tautology};

/// Longest rendered candidate, in characters, offered as an option.
///
/// Tighter than a 60-character cap: chain-3 rewrites of depth-5 targets
/// otherwise fill the pools with options several times the target's length.
pub const MAX_CANDIDATE_CHARS: usize = 48;

/// Pools of formulas equivalent and not equivalent to a random target.
#[derive(Debug, Clone)]
pub struct EquivalenceGenerator {
    preserving: Vec<RewriteRule>,
    breaking: Vec<RewriteRule>,
}

impl EquivalenceGenerator {
    pub fn new(preserving: Vec<RewriteRule>, breaking: Vec<RewriteRule>) -> Self {
        Self { preserving, breaking }
    }

    pub fn from_config(cfg: &EquivalenceConfig) -> Self {
        let equivalent: Vec<&str> = cfg.rules.equivalent.iter().map(|s| s.name.as_str()).collect();
        let nonequivalent: Vec<&str> = cfg.rules.nonequivalent.iter().map(|s| s.name.as_str()).collect();
        Self::new(resolve_rules(&equivalent), resolve_rules(&nonequivalent))
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, profile: &Profile, demand: &PoolDemand) -> Result<Generated> {
        let all_vars = canonical_vars(profile.vars);
        let steps = profile.equivalence.chain_steps;
        let preserving = RewriteEngine::new(self.preserving.clone(), steps);
        let breaking = RewriteEngine::new(self.breaking.clone(), steps);

        for attempt in 0..MAX_ATTEMPTS {
            let target = random_formula(rng, profile);
            let vars = filter_vars(&all_vars, &target);
            if is_tautology(&target, &vars) || is_contradiction(&target, &vars) {
                tracing::trace!(attempt, %target, "constant target rejected");
                continue;
            }
            let target_sig = target.to_string();
            let fits = |s: &str| s.chars().count() <= MAX_CANDIDATE_CHARS;

            let equiv_pool: Vec<String> = preserving
                .execute(&target, rng)
                .into_iter()
                .filter(|c| equivalent(&target, c, &vars))
                .map(|c| c.to_string())
                .filter(|s| *s != target_sig && fits(s.as_str()))
                .collect();

            let non_equiv_pool: Vec<String> = breaking
                .execute(&target, rng)
                .into_iter()
                .filter(|c| !equivalent(&target, c, &vars))
                .map(|c| c.to_string())
                .filter(|s| fits(s.as_str()))
                .collect();

            if equiv_pool.is_empty() || non_equiv_pool.is_empty() {
                tracing::trace!(attempt, %target, "rewriting produced an empty pool");
                continue;
            }

            let mut hints = Hints::new();
            hints.insert("equiv_candidates", equiv_pool.len());
            hints.insert("non_equiv_candidates", non_equiv_pool.len());

            let pools = CandidatePools::Equivalence { target, vars, equiv_pool, non_equiv_pool };
            if !demand.is_satisfied_by(&pools) {
                tracing::trace!(attempt, ?hints, "equivalence pools too small");
                continue;
            }
            return Ok(Generated { pools, hints });
        }

        Err(budget_exceeded(Category::Equivalence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::GenerationError;
    use crate::models::{Connective, EquivalenceProfile, Formula, InferenceProfile, PoolName};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn profile(vars: usize, depth: usize, steps: usize) -> Profile {
        Profile {
            vars,
            max_depth: depth,
            allowed_ops: Connective::all().to_vec(),
            equivalence: EquivalenceProfile { chain_steps: steps },
            inference: InferenceProfile::default(),
        }
    }

    fn mc_demand(k: usize) -> PoolDemand {
        PoolDemand::Options {
            correct: PoolName::EquivPool,
            distractor: PoolName::NonEquivPool,
            correct_count: k,
            distractor_count: 4 - k,
        }
    }

    #[test]
    fn test_pools_are_semantically_correct() {
        let generator = EquivalenceGenerator::from_config(&AppConfig::default().equivalence);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10 {
            let generated = generator.generate(&mut rng, &profile(3, 3, 2), &mc_demand(2)).unwrap();
            let CandidatePools::Equivalence { target, vars, equiv_pool, non_equiv_pool } = generated.pools else {
                panic!("wrong pools");
            };
            assert!(equiv_pool.len() >= 2 && non_equiv_pool.len() >= 2);
            for s in &equiv_pool {
                assert_ne!(*s, target.to_string());
                assert!(s.chars().count() <= MAX_CANDIDATE_CHARS);
                assert!(equivalent(&target, &Formula::parse(s).unwrap(), &vars), "{} vs {}", target, s);
            }
            for s in &non_equiv_pool {
                assert!(!equivalent(&target, &Formula::parse(s).unwrap(), &vars), "{} vs {}", target, s);
            }
        }
    }

    #[test]
    fn test_without_breaking_rules_budget_is_exhausted() {
        let generator = EquivalenceGenerator::new(vec![RewriteRule::Commutativity], Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let err = generator.generate(&mut rng, &profile(2, 3, 1), &mc_demand(1)).unwrap_err();
        assert!(matches!(err, GenerationError::BudgetExceeded { category: Category::Equivalence, .. }));
    }

    #[test]
    fn test_unknown_rule_names_are_skipped() {
        let mut cfg = AppConfig::default().equivalence;
        cfg.rules.equivalent.push(crate::config::RuleSpec { name: "contraposition".into(), description: String::new() });
        let generator = EquivalenceGenerator::from_config(&cfg);
        assert_eq!(generator.preserving.len(), 7);
        assert_eq!(generator.breaking.len(), 4);
    }
}

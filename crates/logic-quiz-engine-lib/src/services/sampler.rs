use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::error::{GenerationError, Result};
use crate::models::{
    AnswerType, Category, Connective, Difficulty, EquivalenceProfile, InferenceProfile, Plan, Profile,
};

/// Draw a key with probability proportional to its weight.
///
/// Non-positive weights never win. `None` for an empty distribution or one
/// without any positive weight.
pub fn sample_weighted<K: Ord + Clone, R: Rng + ?Sized>(dist: &BTreeMap<K, f64>, rng: &mut R) -> Option<K> {
    let total: f64 = dist.values().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }

    let roll = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (key, weight) in dist.iter().filter(|(_, w)| **w > 0.0) {
        cumulative += weight;
        if roll < cumulative {
            return Some(key.clone());
        }
    }
    // Rounding can leave `roll` just past the last bucket.
    dist.iter().find(|(_, w)| **w > 0.0).map(|(k, _)| k.clone())
}

/// Caller-pinned plan dimensions; `None` means "sample it".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    pub answer_type: Option<AnswerType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub plan: Plan,
    pub profile: Profile,
}

/// Draws plans and profiles from the planner tables.
pub struct PlanSampler<'a> {
    cfg: &'a AppConfig,
}

impl<'a> PlanSampler<'a> {
    pub fn new(cfg: &'a AppConfig) -> Self {
        Self { cfg }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, filter: &QuestionFilter) -> Result<Sample> {
        let plan = self.sample_plan(rng, filter)?;
        let profile = self.sample_profile(rng, &plan)?;
        Ok(Sample { plan, profile })
    }

    pub fn sample_plan<R: Rng + ?Sized>(&self, rng: &mut R, filter: &QuestionFilter) -> Result<Plan> {
        let planner = &self.cfg.planner;

        let difficulty = match filter.difficulty {
            Some(d) => d,
            None => draw(&planner.difficulty_weights, rng, "planner.difficulty_weights")?,
        };
        let category = match filter.category {
            Some(c) => c,
            None => {
                let dist = planner
                    .category_weights
                    .get(&difficulty)
                    .ok_or_else(|| GenerationError::missing(format!("category weights for {}", difficulty)))?;
                draw(dist, rng, "category weights")?
            }
        };
        let answer_type = match filter.answer_type {
            Some(t) => t,
            None => {
                let dist = planner
                    .type_weights
                    .get(&difficulty)
                    .ok_or_else(|| GenerationError::missing(format!("type weights for {}", difficulty)))?;
                draw(dist, rng, "type weights")?
            }
        };

        let intent = self.sample_intent(rng, category, difficulty, answer_type)?;

        let mc_correct_count = match answer_type {
            AnswerType::MultipleChoice => planner
                .mc_correct_count_dist
                .get(&difficulty)
                .and_then(|dist| sample_weighted(dist, rng))
                .unwrap_or(0),
            _ => 0,
        };

        Ok(Plan { difficulty, category, answer_type, intent, mc_correct_count })
    }

    /// Weighted intent among those that are configured and have prompt
    /// templates for `answer_type`.
    fn sample_intent<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        category: Category,
        difficulty: Difficulty,
        answer_type: AnswerType,
    ) -> Result<String> {
        let dist = self
            .cfg
            .planner
            .intent_weights
            .get(&category)
            .and_then(|by_difficulty| by_difficulty.get(&difficulty))
            .ok_or_else(|| GenerationError::missing(format!("intent weights for {} / {}", category, difficulty)))?;

        let usable: BTreeMap<String, f64> = dist
            .iter()
            .filter(|(name, _)| {
                self.cfg
                    .intents
                    .get(name.as_str())
                    .is_some_and(|spec| !spec.templates.for_type(answer_type).is_empty())
            })
            .map(|(name, w)| (name.clone(), *w))
            .collect();

        sample_weighted(&usable, rng).ok_or_else(|| {
            GenerationError::PlanInfeasible(format!(
                "no usable intents for {} / {} / {}",
                category, difficulty, answer_type
            ))
        })
    }

    pub fn sample_profile<R: Rng + ?Sized>(&self, rng: &mut R, plan: &Plan) -> Result<Profile> {
        let difficulty = plan.difficulty;
        let dp = self.cfg.difficulty_profile(difficulty)?;

        let vars = draw(&dp.vars_dist, rng, "vars_dist")?;
        let max_depth = draw(&dp.depth_dist, rng, "depth_dist")?;
        let allowed_ops = dp
            .allowed_ops
            .iter()
            .map(|name| {
                Connective::from_name(name).ok_or_else(|| {
                    GenerationError::missing(format!("operator '{}' in {} profile is not supported", name, difficulty))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut equivalence = EquivalenceProfile::default();
        let mut inference = InferenceProfile::default();
        match plan.category {
            Category::Equivalence => {
                let dist = self
                    .cfg
                    .equivalence
                    .difficulty
                    .get(&difficulty)
                    .ok_or_else(|| GenerationError::missing(format!("equivalence chain steps for {}", difficulty)))?;
                equivalence.chain_steps = draw(&dist.chain_steps_dist, rng, "equivalence chain_steps_dist")?;
            }
            Category::Inference => {
                let dist = self
                    .cfg
                    .inference
                    .difficulty
                    .get(&difficulty)
                    .ok_or_else(|| GenerationError::missing(format!("inference chain steps for {}", difficulty)))?;
                inference.chain_steps = draw(&dist.chain_steps_dist, rng, "inference chain_steps_dist")?;
            }
            Category::TruthTable => {}
        }

        Ok(Profile { vars, max_depth, allowed_ops, equivalence, inference })
    }
}

fn draw<K: Ord + Clone, R: Rng + ?Sized>(dist: &BTreeMap<K, f64>, rng: &mut R, what: &str) -> Result<K> {
    sample_weighted(dist, rng).ok_or_else(|| GenerationError::missing(format!("{} has no positive weight", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sample_weighted_empty_and_non_positive() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let empty: BTreeMap<u32, f64> = BTreeMap::new();
        assert_eq!(sample_weighted(&empty, &mut rng), None);
        let zero: BTreeMap<u32, f64> = [(1, 0.0), (2, -1.0)].into_iter().collect();
        assert_eq!(sample_weighted(&zero, &mut rng), None);
    }

    #[test]
    fn test_sample_weighted_skips_non_positive() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let dist: BTreeMap<&str, f64> = [("a", 0.0), ("b", 2.0), ("c", -3.0)].into_iter().collect();
        for _ in 0..50 {
            assert_eq!(sample_weighted(&dist, &mut rng), Some("b"));
        }
    }

    #[test]
    fn test_sample_weighted_roughly_proportional() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let dist: BTreeMap<&str, f64> = [("x", 3.0), ("y", 1.0)].into_iter().collect();
        let hits = (0..4000).filter(|_| sample_weighted(&dist, &mut rng) == Some("x")).count();
        assert!((2700..3300).contains(&hits), "{}", hits);
    }

    #[test]
    fn test_filter_pins_plan() {
        let cfg = AppConfig::default();
        let sampler = PlanSampler::new(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let filter = QuestionFilter {
            difficulty: Some(Difficulty::Hard),
            category: Some(Category::Inference),
            answer_type: Some(AnswerType::TrueFalse),
        };
        for _ in 0..20 {
            let s = sampler.sample(&mut rng, &filter).unwrap();
            assert_eq!(s.plan.difficulty, Difficulty::Hard);
            assert_eq!(s.plan.category, Category::Inference);
            assert_eq!(s.plan.answer_type, AnswerType::TrueFalse);
            assert_eq!(s.plan.intent, "INF_VALIDITY_TF");
            assert!(s.profile.inference.chain_steps >= 2);
            assert_eq!(s.profile.equivalence.chain_steps, 0);
        }
    }

    #[test]
    fn test_intent_matches_answer_type() {
        let cfg = AppConfig::default();
        let sampler = PlanSampler::new(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let s = sampler.sample(&mut rng, &QuestionFilter::default()).unwrap();
            let spec = &cfg.intents[&s.plan.intent];
            assert!(!spec.templates.for_type(s.plan.answer_type).is_empty());
            assert!(cfg.planner.intent_weights[&s.plan.category][&s.plan.difficulty].contains_key(&s.plan.intent));
            let dp = &cfg.difficulty_profiles[&s.plan.difficulty];
            assert!(dp.vars_dist.contains_key(&s.profile.vars));
            assert!(dp.depth_dist.contains_key(&s.profile.max_depth));
            if s.plan.answer_type == AnswerType::MultipleChoice {
                assert!(s.plan.mc_correct_count >= 2);
            } else {
                assert_eq!(s.plan.mc_correct_count, 0);
            }
        }
    }

    #[test]
    fn test_no_usable_intents_is_infeasible() {
        let mut cfg = AppConfig::default();
        for spec in cfg.intents.values_mut() {
            spec.templates.tf.clear();
        }
        let sampler = PlanSampler::new(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let filter = QuestionFilter { answer_type: Some(AnswerType::TrueFalse), ..Default::default() };
        let err = sampler.sample(&mut rng, &filter).unwrap_err();
        assert!(matches!(err, GenerationError::PlanInfeasible(_)));
    }

    #[test]
    fn test_unknown_operator_is_config_error() {
        let mut cfg = AppConfig::default();
        cfg.difficulty_profiles.get_mut(&Difficulty::Easy).unwrap().allowed_ops.push("XOR".into());
        let sampler = PlanSampler::new(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let filter = QuestionFilter { difficulty: Some(Difficulty::Easy), ..Default::default() };
        let err = sampler.sample(&mut rng, &filter).unwrap_err();
        assert!(matches!(err, GenerationError::ConfigMissing(_)));
    }

    #[test]
    fn test_missing_difficulty_weights() {
        let mut cfg = AppConfig::default();
        cfg.planner.difficulty_weights.clear();
        let sampler = PlanSampler::new(&cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let err = sampler.sample(&mut rng, &QuestionFilter::default()).unwrap_err();
        assert!(!err.is_retryable());
    }
}

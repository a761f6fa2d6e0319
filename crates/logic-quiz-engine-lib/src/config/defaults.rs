use std::collections::BTreeMap;

use super::*;
use crate::models::{AnswerType as T, Category as C, Difficulty as D, PoolName as P};

fn weights<K: Ord + Clone>(entries: &[(K, f64)]) -> Weights<K> {
    entries.iter().cloned().collect()
}

fn named(entries: &[(&str, f64)]) -> Weights<String> {
    entries.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn patterns(items: &[&str]) -> Vec<ExprPattern> {
    items.iter().map(|s| ExprPattern::Text(s.to_string())).collect()
}

fn mapping(correct: P, distractor: P) -> Option<PoolMapping> {
    Some(PoolMapping { correct, distractor })
}

pub(super) fn builtin() -> AppConfig {
    AppConfig {
        difficulty_profiles: difficulty_profiles(),
        planner: planner(),
        intents: intents(),
        equivalence: equivalence(),
        inference: inference(),
    }
}

fn difficulty_profiles() -> BTreeMap<D, DifficultyProfile> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        D::Easy,
        DifficultyProfile {
            vars_dist: weights(&[(2, 0.7), (3, 0.3)]),
            depth_dist: weights(&[(3, 1.0)]),
            allowed_ops: texts(&["NOT", "AND", "OR", "IMP"]),
        },
    );
    profiles.insert(
        D::Medium,
        DifficultyProfile {
            vars_dist: weights(&[(3, 0.6), (4, 0.4)]),
            depth_dist: weights(&[(3, 0.6), (4, 0.4)]),
            allowed_ops: texts(&["NOT", "AND", "OR", "IMP", "IFF"]),
        },
    );
    profiles.insert(
        D::Hard,
        DifficultyProfile {
            vars_dist: weights(&[(3, 0.4), (4, 0.6)]),
            depth_dist: weights(&[(4, 0.6), (5, 0.4)]),
            allowed_ops: texts(&["NOT", "AND", "OR", "IMP", "IFF"]),
        },
    );
    profiles
}

fn planner() -> PlannerWeights {
    let mut type_weights = BTreeMap::new();
    type_weights.insert(D::Easy, weights(&[(T::SingleChoice, 0.5), (T::MultipleChoice, 0.2), (T::TrueFalse, 0.3)]));
    type_weights.insert(D::Medium, weights(&[(T::SingleChoice, 0.4), (T::MultipleChoice, 0.35), (T::TrueFalse, 0.25)]));
    type_weights.insert(D::Hard, weights(&[(T::SingleChoice, 0.35), (T::MultipleChoice, 0.45), (T::TrueFalse, 0.2)]));

    let mut category_weights = BTreeMap::new();
    category_weights.insert(D::Easy, weights(&[(C::TruthTable, 0.4), (C::Equivalence, 0.3), (C::Inference, 0.3)]));
    category_weights.insert(D::Medium, weights(&[(C::TruthTable, 0.3), (C::Equivalence, 0.35), (C::Inference, 0.35)]));
    category_weights.insert(D::Hard, weights(&[(C::TruthTable, 0.2), (C::Equivalence, 0.4), (C::Inference, 0.4)]));

    let per_difficulty = |entries: &[(&str, f64)]| -> BTreeMap<D, Weights<String>> {
        D::all().iter().map(|d| (*d, named(entries))).collect()
    };
    let mut intent_weights = BTreeMap::new();
    intent_weights.insert(
        C::TruthTable,
        per_difficulty(&[("TT_TRUE_ASSIGNMENTS", 0.4), ("TT_FALSE_ASSIGNMENTS", 0.3), ("TT_EVAL_AT_ASSIGNMENT", 0.3)]),
    );
    intent_weights.insert(
        C::Equivalence,
        per_difficulty(&[("EQ_EQUIVALENT", 0.45), ("EQ_NONEQUIVALENT", 0.35), ("EQ_PAIR_TF", 0.2)]),
    );
    intent_weights.insert(
        C::Inference,
        per_difficulty(&[("INF_DERIVABLE", 0.45), ("INF_UNDERIVABLE", 0.35), ("INF_VALIDITY_TF", 0.2)]),
    );

    let mut mc_correct_count_dist = BTreeMap::new();
    mc_correct_count_dist.insert(D::Easy, weights(&[(2, 1.0)]));
    mc_correct_count_dist.insert(D::Medium, weights(&[(2, 0.7), (3, 0.3)]));
    mc_correct_count_dist.insert(D::Hard, weights(&[(2, 0.5), (3, 0.5)]));

    PlannerWeights {
        difficulty_weights: weights(&[(D::Easy, 0.4), (D::Medium, 0.4), (D::Hard, 0.2)]),
        type_weights,
        category_weights,
        intent_weights,
        mc_correct_count_dist,
    }
}

fn choice_intent(correct: P, distractor: P, sc: &[&str], mc: &[&str]) -> IntentSpec {
    IntentSpec {
        pool_mapping: IntentPoolMapping {
            sc: mapping(correct, distractor),
            mc: mapping(correct, distractor),
            tf: None,
        },
        templates: PromptTemplateSet { sc: texts(sc), mc: texts(mc), tf: Vec::new() },
    }
}

fn true_false_intent(positive: P, negative: P, tf: &[&str]) -> IntentSpec {
    IntentSpec {
        pool_mapping: IntentPoolMapping { sc: None, mc: None, tf: mapping(positive, negative) },
        templates: PromptTemplateSet { sc: Vec::new(), mc: Vec::new(), tf: texts(tf) },
    }
}

fn intents() -> BTreeMap<String, IntentSpec> {
    let mut intents = BTreeMap::new();
    intents.insert(
        "TT_TRUE_ASSIGNMENTS".to_string(),
        choice_intent(
            P::TrueSet,
            P::FalseSet,
            &["Which assignment makes {F} true?", "Under which assignment does {F} evaluate to true?"],
            &["Select every assignment that makes {F} true."],
        ),
    );
    intents.insert(
        "TT_FALSE_ASSIGNMENTS".to_string(),
        choice_intent(
            P::FalseSet,
            P::TrueSet,
            &["Which assignment makes {F} false?"],
            &["Select every assignment that makes {F} false."],
        ),
    );
    intents.insert(
        "TT_EVAL_AT_ASSIGNMENT".to_string(),
        true_false_intent(P::TrueSet, P::FalseSet, &["Under the assignment {alpha}, {F} is true."]),
    );
    intents.insert(
        "EQ_EQUIVALENT".to_string(),
        choice_intent(
            P::EquivPool,
            P::NonEquivPool,
            &["Which formula is logically equivalent to {T}?"],
            &["Select every formula that is logically equivalent to {T}."],
        ),
    );
    intents.insert(
        "EQ_NONEQUIVALENT".to_string(),
        choice_intent(
            P::NonEquivPool,
            P::EquivPool,
            &["Which formula is NOT logically equivalent to {T}?"],
            &["Select every formula that is NOT logically equivalent to {T}."],
        ),
    );
    intents.insert(
        "EQ_PAIR_TF".to_string(),
        true_false_intent(
            P::EquivPool,
            P::NonEquivPool,
            &["{T} and {G} are logically equivalent.", "{G} is logically equivalent to {T}."],
        ),
    );
    intents.insert(
        "INF_DERIVABLE".to_string(),
        choice_intent(
            P::ValidConclusions,
            P::InvalidConclusions,
            &["From the premises {Premises}, which conclusion can be validly derived?"],
            &["From the premises {Premises}, select every conclusion that can be validly derived."],
        ),
    );
    intents.insert(
        "INF_UNDERIVABLE".to_string(),
        choice_intent(
            P::InvalidConclusions,
            P::ValidConclusions,
            &["From the premises {Premises}, which conclusion can NOT be validly derived?"],
            &["From the premises {Premises}, select every conclusion that can NOT be validly derived."],
        ),
    );
    intents.insert(
        "INF_VALIDITY_TF".to_string(),
        true_false_intent(
            P::ValidConclusions,
            P::InvalidConclusions,
            &["From the premises {Premises}, the conclusion {Conclusion} can be validly derived."],
        ),
    );
    intents
}

fn rule(name: &str, description: &str) -> RuleSpec {
    RuleSpec { name: name.to_string(), description: description.to_string() }
}

fn chain_steps(entries: &[(usize, f64)]) -> ChainStepsConfig {
    ChainStepsConfig { chain_steps_dist: weights(entries) }
}

fn equivalence() -> EquivalenceConfig {
    let mut difficulty = BTreeMap::new();
    difficulty.insert(D::Easy, chain_steps(&[(1, 0.5), (2, 0.5)]));
    difficulty.insert(D::Medium, chain_steps(&[(2, 0.5), (3, 0.5)]));
    difficulty.insert(D::Hard, chain_steps(&[(3, 1.0)]));

    EquivalenceConfig {
        rules: RuleCatalog {
            equivalent: vec![
                rule("double_negation", "¬¬A ≡ A"),
                rule("implication_elimination", "A → B ≡ ¬A ∨ B"),
                rule("commutativity", "A ∧ B ≡ B ∧ A"),
                rule("de_morgan", "¬(A ∧ B) ≡ ¬A ∨ ¬B"),
                rule("biconditional_expansion", "A ↔ B ≡ (A → B) ∧ (B → A)"),
                rule("associativity", "A ∧ (B ∧ C) ≡ (A ∧ B) ∧ C"),
                rule("distributivity", "A ∧ (B ∨ C) ≡ (A ∧ B) ∨ (A ∧ C)"),
            ],
            nonequivalent: vec![
                rule("negate_root", "A becomes ¬A"),
                rule("reverse_implication", "A → B becomes B → A"),
                rule("flip_operator", "swap ∧ and ∨, weaken → and ↔"),
                rule("mutate_literal", "toggle a negation on one operand"),
            ],
        },
        difficulty,
    }
}

fn template(
    name: &str,
    description: &str,
    chain: usize,
    slots: &[(&str, &str)],
    premises: &[&str],
    valid: &[&str],
    invalid: &[&str],
) -> TemplatePair {
    TemplatePair {
        name: name.to_string(),
        description: description.to_string(),
        chain_steps: chain,
        slots: slots.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        premises: patterns(premises),
        valid: patterns(valid),
        invalid: patterns(invalid),
    }
}

fn inference() -> InferenceConfig {
    let mut slot_fillers = BTreeMap::new();
    slot_fillers.insert("atom".to_string(), weights(&[(SlotFiller::UseVar, 1.0)]));
    slot_fillers.insert(
        "prop".to_string(),
        weights(&[
            (SlotFiller::UseVar, 0.55),
            (SlotFiller::UseNegVar, 0.2),
            (SlotFiller::UseAnd, 0.1),
            (SlotFiller::UseOr, 0.1),
            (SlotFiller::UseConstTrue, 0.025),
            (SlotFiller::UseConstFalse, 0.025),
        ]),
    );

    let mut difficulty = BTreeMap::new();
    difficulty.insert(D::Easy, chain_steps(&[(1, 1.0)]));
    difficulty.insert(D::Medium, chain_steps(&[(1, 0.4), (2, 0.6)]));
    difficulty.insert(D::Hard, chain_steps(&[(2, 0.4), (3, 0.6)]));

    let ab = [("A", "prop"), ("B", "prop")];
    let abc = [("A", "prop"), ("B", "atom"), ("C", "prop")];
    let abcd = [("A", "atom"), ("B", "prop"), ("C", "atom"), ("D", "prop")];

    let template_pairs = vec![
        template(
            "modus_ponens",
            "A → B, A ⊢ B",
            1,
            &ab,
            &["A → B", "A"],
            &["B", "A ∧ B", "B ∨ ¬A", "A ↔ B"],
            &["¬B", "¬A", "¬A ∨ ¬B", "A ∧ ¬B"],
        ),
        template(
            "modus_tollens",
            "A → B, ¬B ⊢ ¬A",
            1,
            &ab,
            &["A → B", "¬B"],
            &["¬A", "¬A ∧ ¬B", "¬(A ∨ B)", "B → A"],
            &["A", "B", "A ∨ B", "A ∧ ¬B"],
        ),
        template(
            "disjunctive_syllogism",
            "A ∨ B, ¬A ⊢ B",
            1,
            &ab,
            &["A ∨ B", "¬A"],
            &["B", "B ∧ ¬A", "A → B", "B ∨ A"],
            &["A", "¬B", "A ∧ B", "A ∨ ¬B"],
        ),
        template(
            "simplification",
            "A ∧ B ⊢ A",
            1,
            &ab,
            &["A ∧ B"],
            &["A", "B", "A ∨ B", "B ∧ A", "A ↔ B"],
            &["¬A", "¬B", "¬A ∨ ¬B", "A → ¬B"],
        ),
        template(
            "hypothetical_syllogism",
            "A → B, B → C ⊢ A → C",
            2,
            &abc,
            &["A → B", "B → C"],
            &["A → C", "¬C → ¬A", "¬A ∨ C", "A → (B ∧ C)"],
            &["C → A", "A", "C", "¬C", "B → A"],
        ),
        template(
            "chained_modus_ponens",
            "A → B, B → C, A ⊢ C",
            2,
            &abc,
            &["A → B", "B → C", "A"],
            &["C", "B", "B ∧ C", "A ∧ C"],
            &["¬C", "¬B", "¬A ∨ ¬C", "¬B ∨ ¬C"],
        ),
        template(
            "constructive_dilemma_simple",
            "A ∨ B, A → C, B → C ⊢ C",
            2,
            &abc,
            &["A ∨ B", "A → C", "B → C"],
            &["C", "C ∨ A", "¬C → A"],
            &["A", "B", "A ∧ B", "¬C"],
        ),
        template(
            "chained_modus_tollens",
            "A → B, B → C, ¬C ⊢ ¬A",
            3,
            &abc,
            &["A → B", "B → C", "¬C"],
            &["¬A", "¬B", "¬A ∧ ¬B", "¬(A ∨ B)"],
            &["A", "B", "C", "A ∨ B"],
        ),
        template(
            "syllogism_then_ponens",
            "A ∨ B, ¬A, B → C ⊢ C",
            3,
            &abc,
            &["A ∨ B", "¬A", "B → C"],
            &["C", "B", "B ∧ C", "C ∨ A"],
            &["A", "¬C", "¬B", "A ∨ ¬C"],
        ),
        template(
            "constructive_dilemma",
            "A → B, C → D, A ∨ C ⊢ B ∨ D",
            3,
            &abcd,
            &["A → B", "C → D", "A ∨ C"],
            &["B ∨ D", "D ∨ B", "¬B → D"],
            &["B", "D", "A", "B ∧ D", "C"],
        ),
    ];

    InferenceConfig { template_pairs, slot_fillers, difficulty }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_intent_has_templates_and_pools() {
        let cfg = builtin();
        assert_eq!(cfg.intents.len(), 9);
        for (name, spec) in &cfg.intents {
            let mut served = 0;
            for t in T::all() {
                let has_templates = !spec.templates.for_type(*t).is_empty();
                assert_eq!(has_templates, spec.pool_mapping.for_type(*t).is_some(), "{}", name);
                if has_templates {
                    served += 1;
                }
            }
            assert!(served > 0, "{}", name);
        }
    }

    #[test]
    fn test_intent_weights_reference_known_intents() {
        let cfg = builtin();
        for by_difficulty in cfg.planner.intent_weights.values() {
            for dist in by_difficulty.values() {
                for intent in dist.keys() {
                    assert!(cfg.intents.contains_key(intent), "{}", intent);
                }
            }
        }
    }

    #[test]
    fn test_templates_parse_and_cover_chain_steps() {
        let cfg = builtin();
        for steps in 1..=3 {
            assert!(cfg.inference.template_pairs.iter().any(|t| t.chain_steps == steps));
        }
        for t in &cfg.inference.template_pairs {
            for p in t.premises.iter().chain(&t.valid).chain(&t.invalid) {
                let f = p.to_formula().unwrap();
                for v in f.variables() {
                    assert!(t.slots.contains_key(&v), "{} uses undeclared slot {}", t.name, v);
                }
            }
            for slot_type in t.slots.values() {
                assert!(cfg.inference.slot_fillers.contains_key(slot_type));
            }
        }
    }

    #[test]
    fn test_rule_names_resolve() {
        let cfg = builtin();
        let names: Vec<&str> = cfg
            .equivalence
            .rules
            .equivalent
            .iter()
            .chain(&cfg.equivalence.rules.nonequivalent)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(crate::models::rules::resolve_rules(&names).len(), names.len());
    }
}

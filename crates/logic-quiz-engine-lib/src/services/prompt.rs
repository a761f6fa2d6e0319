use rand::Rng;
use std::collections::BTreeMap;

use crate::config::IntentSpec;
use crate::error::{GenerationError, Result};
use crate::models::AnswerType;

/// Placeholder values keyed by name, without braces.
pub type PromptData = BTreeMap<&'static str, String>;

/// Render one of the intent's templates for `answer_type`.
///
/// The template is drawn uniformly, with no draw when there is only one.
/// Placeholders are replaced in ascending key order.
pub fn build_prompt<R: Rng + ?Sized>(
    intent: &IntentSpec,
    answer_type: AnswerType,
    data: &PromptData,
    rng: &mut R,
) -> Result<String> {
    let templates = intent.templates.for_type(answer_type);
    let template = match templates.len() {
        0 => return Err(GenerationError::missing(format!("prompt templates for {}", answer_type))),
        1 => &templates[0],
        n => &templates[rng.gen_range(0..n)],
    };
    Ok(render(template, data))
}

pub fn render(template: &str, data: &PromptData) -> String {
    data.iter()
        .fold(template.to_string(), |text, (key, value)| text.replace(&format!("{{{}}}", key), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_single_template_is_rendered() {
        let cfg = AppConfig::default();
        let intent = cfg.intent("INF_VALIDITY_TF").unwrap();
        let mut data = PromptData::new();
        data.insert("Premises", "p → q, p".into());
        data.insert("Conclusion", "q".into());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let text = build_prompt(intent, AnswerType::TrueFalse, &data, &mut rng).unwrap();
        assert_eq!(text, "From the premises p → q, p, the conclusion q can be validly derived.");
    }

    #[test]
    fn test_substitution_order_is_by_key() {
        let mut data = PromptData::new();
        data.insert("T", "{G}".into());
        data.insert("G", "q".into());
        // G is replaced before T, so the {G} introduced by T survives.
        assert_eq!(render("{T} vs {G}", &data), "{G} vs q");
    }

    #[test]
    fn test_draw_stays_within_templates() {
        let cfg = AppConfig::default();
        let intent = cfg.intent("EQ_PAIR_TF").unwrap();
        let mut data = PromptData::new();
        data.insert("T", "p".into());
        data.insert("G", "¬¬p".into());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..10 {
            let text = build_prompt(intent, AnswerType::TrueFalse, &data, &mut rng).unwrap();
            assert!(text == "p and ¬¬p are logically equivalent." || text == "¬¬p is logically equivalent to p.");
        }
    }

    #[test]
    fn test_missing_templates_is_config_error() {
        let cfg = AppConfig::default();
        let intent = cfg.intent("EQ_PAIR_TF").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = build_prompt(intent, AnswerType::SingleChoice, &PromptData::new(), &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::ConfigMissing(_)));
    }
}

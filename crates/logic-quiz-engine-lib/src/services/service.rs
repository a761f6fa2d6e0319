use rand::Rng;
use serde::{Deserialize, Serialize};

use super::choice::{build_choice, Choice};
use super::generators::{generate_pools, PoolDemand};
use super::prepare::prepare_prompt_data;
use super::prompt::build_prompt;
use super::sampler::{PlanSampler, QuestionFilter};
use crate::config::AppConfig;
use crate::error::{GenerationError, Result};
use crate::models::{Plan, Question};

/// Full pipeline attempts allowed per question before the batch fails.
pub const MAX_QUESTION_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub count: usize,
    #[serde(default)]
    pub filter: QuestionFilter,
}

impl QuestionRequest {
    pub fn new(count: usize) -> Self {
        Self { count, filter: QuestionFilter::default() }
    }

    pub fn with_filter(mut self, filter: QuestionFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Question {
    pub fn assemble(plan: &Plan, prompt: String, choice: Choice) -> Question {
        Question {
            question_text: prompt,
            options: choice.options,
            correct_answer_index: choice.correct_indexes,
            answer_type: plan.answer_type,
            category: plan.category,
            difficulty: plan.difficulty,
            is_active: true,
        }
    }
}

/// Drives plan sampling, pool generation and rendering for whole batches.
pub struct QuestionService {
    cfg: AppConfig,
}

impl QuestionService {
    pub fn new(cfg: AppConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &AppConfig {
        &self.cfg
    }

    /// Produce `request.count` questions or fail the whole batch.
    pub fn generate_questions<R: Rng + ?Sized>(&self, rng: &mut R, request: &QuestionRequest) -> Result<Vec<Question>> {
        let mut questions = Vec::with_capacity(request.count);
        let mut total_attempts = 0;

        while questions.len() < request.count {
            let mut last_error = None;
            for attempt in 1..=MAX_QUESTION_ATTEMPTS {
                total_attempts += 1;
                match self.generate_one(rng, &request.filter) {
                    Ok(question) => {
                        questions.push(question);
                        last_error = None;
                        break;
                    }
                    Err(e) if e.is_retryable() => {
                        tracing::debug!(attempt, error = %e, "attempt rejected, resampling");
                        last_error = Some(e);
                    }
                    Err(e) => {
                        return Err(GenerationError::BatchFailed {
                            requested: request.count,
                            produced: questions.len(),
                            attempts: total_attempts,
                            source: Box::new(e),
                        });
                    }
                }
            }

            if let Some(e) = last_error {
                tracing::warn!(
                    produced = questions.len(),
                    requested = request.count,
                    "question attempts exhausted"
                );
                return Err(GenerationError::BatchFailed {
                    requested: request.count,
                    produced: questions.len(),
                    attempts: total_attempts,
                    source: Box::new(e),
                });
            }
        }

        Ok(questions)
    }

    /// One pass through the pipeline with fresh samples at every layer.
    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R, filter: &QuestionFilter) -> Result<Question> {
        let sample = PlanSampler::new(&self.cfg).sample(rng, filter)?;
        let plan = &sample.plan;
        let intent = self.cfg.intent(&plan.intent)?;
        let demand = PoolDemand::resolve(&self.cfg, plan)?;

        let generated = generate_pools(&self.cfg, rng, &sample.profile, plan, &demand)?;
        let prepared = prepare_prompt_data(plan, &generated.pools, rng)?;
        let prompt = build_prompt(intent, plan.answer_type, &prepared.data, rng)?;
        let choice = build_choice(&demand, &generated.pools, prepared.tf_answer, rng)?;

        tracing::debug!(
            intent = %plan.intent,
            difficulty = %plan.difficulty,
            answer_type = %plan.answer_type,
            hints = ?generated.hints,
            "question generated"
        );
        Ok(Question::assemble(plan, prompt, choice))
    }
}

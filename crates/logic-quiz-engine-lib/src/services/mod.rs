pub mod choice;
pub mod formula_gen;
pub mod generators;
pub mod prepare;
pub mod prompt;
pub mod rewrite;
pub mod sampler;
pub mod service;
pub mod validator;


pub use choice::{build_choice, Choice};
pub use generators::{generate_pools, EquivalenceGenerator, Generated, InferenceGenerator, PoolDemand, TruthTableGenerator};
pub use prepare::{prepare_prompt_data, Prepared};
pub use prompt::{build_prompt, PromptData};
pub use rewrite::RewriteEngine;
pub use sampler::{PlanSampler, QuestionFilter, Sample};
pub use service::{QuestionRequest, QuestionService, MAX_QUESTION_ATTEMPTS};

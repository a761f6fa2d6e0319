use thiserror::Error;

use crate::models::Category;

/// Failures raised while producing questions.
///
/// Only [`GenerationError::BudgetExceeded`] and
/// [`GenerationError::PlanInfeasible`] are worth another attempt with fresh
/// randomness; everything else points at the configuration or at the caller.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("configuration missing: {0}")]
    ConfigMissing(String),

    #[error("invalid inference template: {0}")]
    InvalidTemplate(String),

    #[error("{category} generator gave up after {attempts} attempts")]
    BudgetExceeded { category: Category, attempts: usize },

    #[error("plan cannot be satisfied: {0}")]
    PlanInfeasible(String),

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("produced {produced} of {requested} questions; gave up after {attempts} attempts: {source}")]
    BatchFailed {
        requested: usize,
        produced: usize,
        attempts: usize,
        #[source]
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::BudgetExceeded { .. } | GenerationError::PlanInfeasible(_)
        )
    }

    pub(crate) fn missing(what: impl Into<String>) -> Self {
        GenerationError::ConfigMissing(what.into())
    }
}

/// Failures while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        let budget = GenerationError::BudgetExceeded {
            category: Category::Equivalence,
            attempts: 64,
        };
        assert!(budget.is_retryable());
        assert!(GenerationError::PlanInfeasible("no intents".into()).is_retryable());
        assert!(!GenerationError::missing("planner.difficulty_weights").is_retryable());
        assert!(!GenerationError::InvalidTemplate("MP".into()).is_retryable());
        assert!(!GenerationError::Precondition("pools".into()).is_retryable());
    }

    #[test]
    fn test_batch_failure_message_carries_cause() {
        let err = GenerationError::BatchFailed {
            requested: 3,
            produced: 1,
            attempts: 5,
            source: Box::new(GenerationError::PlanInfeasible("no usable intents".into())),
        };
        let msg = err.to_string();
        assert!(msg.contains("1 of 3"));
        assert!(msg.contains("no usable intents"));
    }
}

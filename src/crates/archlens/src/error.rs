//! Evaluation pipeline errors

use thiserror::Error;

use crate::models::{SchemaError, ValidationError};

/// Failure of a single evaluation, distinguishable by kind
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Inbound request rejected before any prompt work
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The model adapter failed (transport, auth, provider-side)
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] llm::LlmError),

    /// The model answered, but not in the required shape
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl EvaluationError {
    /// Short, stable identifier for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluationError::Validation(_) => "validation",
            EvaluationError::ModelInvocation(_) => "model_invocation",
            EvaluationError::Schema(_) => "schema",
        }
    }

    /// Whether retrying the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            EvaluationError::ModelInvocation(err) => err.is_retryable(),
            // A fresh sample may conform where the last one did not.
            EvaluationError::Schema(_) => true,
            EvaluationError::Validation(_) => false,
        }
    }
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvaluationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let invocation = EvaluationError::from(llm::LlmError::Timeout(std::time::Duration::from_secs(60)));
        let schema = EvaluationError::from(SchemaError::EmptyField("reliability_analysis.what_breaks_first"));

        assert_eq!(invocation.kind(), "model_invocation");
        assert_eq!(schema.kind(), "schema");
        assert!(invocation.is_retryable());
    }

    #[test]
    fn test_auth_failure_not_retryable() {
        let err = EvaluationError::from(llm::LlmError::Unauthorized {
            status: 401,
            message: "bad key".into(),
        });
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("model invocation failed"));
    }
}

// Multi-arm resume evaluation.
// Flow: progression picks the next arm → prompts builds the request → the model
// service answers → validator checks it, falling back to canned data on any failure →
// progression records the completion on the resume.
// All model calls go through llm_client; nothing here talks to the network.

pub mod arms;
pub mod evaluator;
pub mod fallback;
pub mod models;
pub mod progression;
pub mod prompts;
pub mod report;
pub mod rubric;
pub mod validator;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Everything that can go wrong between sending a prompt and holding a validated result.
/// Every variant is recoverable: the evaluator converts it into a fallback result.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Model service error: {0}")]
    Service(#[from] LlmError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Schema violation at `{field}`: {problem}")]
    SchemaViolation { field: String, problem: String },

    #[error("Score mismatch: {0}")]
    ScoreMismatch(String),
}

impl EvaluationError {
    /// Stable short name for logs and warnings.
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluationError::Service(_) => "service_error",
            EvaluationError::MalformedResponse(_) => "malformed_response",
            EvaluationError::SchemaViolation { .. } => "schema_violation",
            EvaluationError::ScoreMismatch(_) => "score_mismatch",
        }
    }
}

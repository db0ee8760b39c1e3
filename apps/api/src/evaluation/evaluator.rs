//! Evaluation boundary: runs one arm end to end and never fails.
//!
//! Input validation happens first and is the only hard error. After that, any model,
//! parse, or schema failure is converted into the arm's fallback result plus a warning,
//! so progression always advances.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::evaluation::arms::Arm;
use crate::evaluation::fallback::{fallback_for, FALLBACK_WARNING};
use crate::evaluation::models::EvaluationResult;
use crate::evaluation::prompts::build_prompt;
use crate::evaluation::validator::{parse_and_validate_with, ValidationMode};
use crate::evaluation::EvaluationError;
use crate::llm_client::ModelService;

/// Minimum trimmed length for both the resume and the job description.
pub const MIN_INPUT_CHARS: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Resume text must be at least 50 characters long")]
    ResumeTooShort,

    #[error("Job description must be at least 50 characters long")]
    JobDescriptionTooShort,
}

/// Rejects inputs too short to evaluate. Runs before any model call.
pub fn validate_inputs(resume_text: &str, job_description: &str) -> Result<(), InputError> {
    if resume_text.trim().chars().count() < MIN_INPUT_CHARS {
        return Err(InputError::ResumeTooShort);
    }
    if job_description.trim().chars().count() < MIN_INPUT_CHARS {
        return Err(InputError::JobDescriptionTooShort);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Model,
    Fallback,
}

/// Outcome of one arm run.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub arm: Arm,
    pub result: EvaluationResult,
    pub source: ResultSource,
    /// Present whenever `source` is `Fallback`.
    pub warning: Option<String>,
}

impl Evaluation {
    pub fn is_fallback(&self) -> bool {
        self.source == ResultSource::Fallback
    }
}

/// Runs `arm` against the model. Only input validation can fail.
pub async fn evaluate(
    model: &dyn ModelService,
    mode: ValidationMode,
    arm: Arm,
    resume_text: &str,
    job_description: &str,
) -> Result<Evaluation, InputError> {
    validate_inputs(resume_text, job_description)?;

    let prompt = build_prompt(arm, resume_text, job_description);
    match request(model, mode, arm, &prompt).await {
        Ok(result) => Ok(Evaluation {
            arm,
            result,
            source: ResultSource::Model,
            warning: None,
        }),
        Err(e) => {
            warn!(arm = %arm, kind = e.kind(), "Evaluation fell back to placeholder data: {e}");
            Ok(Evaluation {
                arm,
                result: fallback_for(arm),
                source: ResultSource::Fallback,
                warning: Some(format!("{FALLBACK_WARNING} ({e})")),
            })
        }
    }
}

async fn request(
    model: &dyn ModelService,
    mode: ValidationMode,
    arm: Arm,
    prompt: &str,
) -> Result<EvaluationResult, EvaluationError> {
    let raw = model.generate(prompt).await?;
    parse_and_validate_with(&raw, arm, mode)
}

//! Response validation. Turns raw model text into a typed `EvaluationResult`.
//!
//! Checks are structural: required keys present, values of the expected JSON type,
//! `fitScore` within 1–5. By default the model's arithmetic is trusted; `Strict`
//! mode additionally recomputes the weighted average from the returned rubric.

use serde_json::Value;

use crate::evaluation::arms::Arm;
use crate::evaluation::models::{
    ComplianceAssessment, ComplianceEvaluation, ComplianceReview, CriterionScore,
    DebiasAssessment, DebiasEvaluation, DebiasReview, EvaluationResult, QuickAssessment,
    RubricAssessment, RubricEvaluation,
};
use crate::evaluation::rubric::RubricCriterion;
use crate::evaluation::EvaluationError;
use crate::llm_client::strip_json_fences;

/// Largest accepted gap between the reported and recomputed fit score in strict mode.
pub const STRICT_TOLERANCE: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Trust the model's self-reported weighted average.
    #[default]
    Lenient,
    /// Recompute the weighted average and reject disagreements.
    Strict,
}

/// Parses `raw_text` (optionally code-fenced) and validates it against `arm`'s schema.
pub fn parse_and_validate(raw_text: &str, arm: Arm) -> Result<EvaluationResult, EvaluationError> {
    parse_and_validate_with(raw_text, arm, ValidationMode::Lenient)
}

pub fn parse_and_validate_with(
    raw_text: &str,
    arm: Arm,
    mode: ValidationMode,
) -> Result<EvaluationResult, EvaluationError> {
    let root: Value = serde_json::from_str(strip_json_fences(raw_text))
        .map_err(|e| EvaluationError::MalformedResponse(e.to_string()))?;

    let result = match arm {
        Arm::QuickIntuitive => EvaluationResult::QuickIntuitive(QuickAssessment {
            fit_score: fit_score(&root, "")?,
            shortlist_recommend: boolean(&root, "shortlistRecommend", "")?,
            justification: string(&root, "justification", "")?,
        }),
        Arm::RubricDeliberative => {
            let (rubric, evaluation) = rubric_and_evaluation(&root)?;
            EvaluationResult::RubricDeliberative(RubricAssessment {
                rubric,
                evaluation: verdict(evaluation)?,
            })
        }
        Arm::ComplianceOfficer => {
            let (rubric, evaluation) = rubric_and_evaluation(&root)?;
            EvaluationResult::ComplianceOfficer(ComplianceAssessment {
                rubric,
                evaluation: compliance_evaluation(evaluation)?,
            })
        }
        Arm::ComplianceDebias => {
            let (rubric, evaluation) = rubric_and_evaluation(&root)?;
            let compliance = compliance_evaluation(evaluation)?;
            let review = object(evaluation, "debiasReview", "evaluation")?;
            let path = "evaluation.debiasReview";
            EvaluationResult::ComplianceDebias(DebiasAssessment {
                rubric,
                evaluation: DebiasEvaluation {
                    compliance,
                    debias_review: DebiasReview {
                        mitigations_applied: string_list(review, "mitigationsApplied", path)?,
                        residual_risks: string_list(review, "residualRisks", path)?,
                    },
                },
            })
        }
    };

    if mode == ValidationMode::Strict {
        check_weighted_average(&result)?;
    }

    Ok(result)
}

// ────────────────────────────────────────────────────────────────────────────
// Rubric-arm structure
// ────────────────────────────────────────────────────────────────────────────

fn rubric_and_evaluation(root: &Value) -> Result<(Vec<RubricCriterion>, &Value), EvaluationError> {
    let entries = array(root, "rubric", "")?;
    let evaluation = object(root, "evaluation", "")?;

    let rubric = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let path = format!("rubric[{i}]");
            Ok(RubricCriterion {
                name: string(entry, "criterion", &path)?,
                weight: integer(entry, "weight", &path)?,
                description: string(entry, "description", &path)?,
            })
        })
        .collect::<Result<Vec<_>, EvaluationError>>()?;

    Ok((rubric, evaluation))
}

fn verdict(evaluation: &Value) -> Result<RubricEvaluation, EvaluationError> {
    // A missing `scores` list is tolerated; present entries must be complete.
    let scores = match evaluation.get("scores") {
        None | Some(Value::Null) => Vec::new(),
        Some(_) => array(evaluation, "scores", "evaluation")?
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path = format!("evaluation.scores[{i}]");
                Ok(CriterionScore {
                    criterion: string(entry, "criterion", &path)?,
                    score: criterion_score(entry, &path)?,
                    evidence: string(entry, "evidence", &path)?,
                })
            })
            .collect::<Result<Vec<_>, EvaluationError>>()?,
    };

    Ok(RubricEvaluation {
        scores,
        fit_score: fit_score(evaluation, "evaluation")?,
        shortlist_recommend: boolean(evaluation, "shortlistRecommend", "evaluation")?,
        justification: string(evaluation, "justification", "evaluation")?,
    })
}

fn compliance_evaluation(evaluation: &Value) -> Result<ComplianceEvaluation, EvaluationError> {
    let verdict = verdict(evaluation)?;
    let review = object(evaluation, "complianceReview", "evaluation")?;
    let path = "evaluation.complianceReview";
    Ok(ComplianceEvaluation {
        verdict,
        compliance_review: ComplianceReview {
            is_compliant: boolean(review, "isCompliant", path)?,
            compliance_notes: string(review, "complianceNotes", path)?,
            risk_factors: string_list(review, "riskFactors", path)?,
        },
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Strict mode
// ────────────────────────────────────────────────────────────────────────────

fn check_weighted_average(result: &EvaluationResult) -> Result<(), EvaluationError> {
    let Some(rubric) = result.rubric() else {
        return Ok(());
    };
    let scores = result.scores();
    if scores.is_empty() {
        return Err(EvaluationError::ScoreMismatch(
            "no criterion scores to recompute the fit score from".to_string(),
        ));
    }

    let mut weighted = 0.0_f64;
    let mut total_weight = 0.0_f64;
    for score in scores {
        let criterion = rubric
            .iter()
            .find(|c| c.name == score.criterion)
            .ok_or_else(|| {
                EvaluationError::ScoreMismatch(format!(
                    "scored criterion '{}' is not in the rubric",
                    score.criterion
                ))
            })?;
        weighted += f64::from(score.score) * f64::from(criterion.weight);
        total_weight += f64::from(criterion.weight);
    }

    if total_weight <= 0.0 {
        return Err(EvaluationError::ScoreMismatch(
            "rubric weights of the scored criteria sum to zero".to_string(),
        ));
    }

    let recomputed = weighted / total_weight;
    let reported = result.fit_score();
    if (recomputed - reported).abs() > STRICT_TOLERANCE {
        return Err(EvaluationError::ScoreMismatch(format!(
            "reported fitScore {reported:.2} but criterion scores average {recomputed:.2}"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Field accessors. Each names the full path of the first offending field
// ────────────────────────────────────────────────────────────────────────────

fn join(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

fn violation(parent: &str, field: &str, problem: &str) -> EvaluationError {
    EvaluationError::SchemaViolation {
        field: join(parent, field),
        problem: problem.to_string(),
    }
}

fn required<'a>(value: &'a Value, field: &str, parent: &str) -> Result<&'a Value, EvaluationError> {
    match value.get(field) {
        None | Some(Value::Null) => Err(violation(parent, field, "missing required field")),
        Some(v) => Ok(v),
    }
}

fn object<'a>(value: &'a Value, field: &str, parent: &str) -> Result<&'a Value, EvaluationError> {
    let v = required(value, field, parent)?;
    if v.is_object() {
        Ok(v)
    } else {
        Err(violation(parent, field, "expected an object"))
    }
}

fn array<'a>(value: &'a Value, field: &str, parent: &str) -> Result<&'a Vec<Value>, EvaluationError> {
    required(value, field, parent)?
        .as_array()
        .ok_or_else(|| violation(parent, field, "expected an array"))
}

fn string(value: &Value, field: &str, parent: &str) -> Result<String, EvaluationError> {
    required(value, field, parent)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| violation(parent, field, "expected a string"))
}

fn boolean(value: &Value, field: &str, parent: &str) -> Result<bool, EvaluationError> {
    match required(value, field, parent)? {
        Value::Bool(b) => Ok(*b),
        // Models occasionally quote booleans.
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(violation(parent, field, "expected a boolean")),
    }
}

fn number(value: &Value, field: &str, parent: &str) -> Result<f64, EvaluationError> {
    required(value, field, parent)?
        .as_f64()
        .ok_or_else(|| violation(parent, field, "expected a number"))
}

/// Accepts `4` and `4.0`; rejects fractional values.
fn integer<T: TryFrom<u64>>(value: &Value, field: &str, parent: &str) -> Result<T, EvaluationError> {
    let n = number(value, field, parent)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(violation(parent, field, "expected a non-negative integer"));
    }
    T::try_from(n as u64).map_err(|_| violation(parent, field, "integer out of range"))
}

fn fit_score(value: &Value, parent: &str) -> Result<f64, EvaluationError> {
    let score = number(value, "fitScore", parent)?;
    if !(1.0..=5.0).contains(&score) {
        return Err(violation(parent, "fitScore", "must be between 1 and 5"));
    }
    Ok(score)
}

fn criterion_score(value: &Value, parent: &str) -> Result<u8, EvaluationError> {
    let score: u8 = integer(value, "score", parent)?;
    if !(1..=5).contains(&score) {
        return Err(violation(parent, "score", "must be between 1 and 5"));
    }
    Ok(score)
}

/// Absent lists are read as empty; present ones must hold strings.
fn string_list(value: &Value, field: &str, parent: &str) -> Result<Vec<String>, EvaluationError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| violation(parent, field, "expected an array of strings"))
            })
            .collect(),
        Some(_) => Err(violation(parent, field, "expected an array of strings")),
    }
}

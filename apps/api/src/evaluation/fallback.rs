//! Canned, schema-valid results used when a real evaluation cannot be obtained.
//!
//! Every fallback is mid-range (3/5) and not recommended. Callers must surface
//! `FALLBACK_WARNING` alongside the result.

use crate::evaluation::arms::Arm;
use crate::evaluation::models::{
    ComplianceAssessment, ComplianceEvaluation, ComplianceReview, CriterionScore,
    DebiasAssessment, DebiasEvaluation, DebiasReview, EvaluationResult, QuickAssessment,
    RubricAssessment, RubricEvaluation,
};
use crate::evaluation::rubric::fixed_rubric;

pub const FALLBACK_FIT_SCORE: f64 = 3.0;

pub const FALLBACK_WARNING: &str = "The AI evaluation could not be completed. \
    The result shown is placeholder data, not a genuine evaluation of this resume.";

const FALLBACK_JUSTIFICATION: &str = "This is a fallback score since the AI analysis couldn't \
    be completed. The candidate appears to have moderate alignment with the position \
    requirements; a full evaluation is needed.";

const FALLBACK_EVIDENCE: &str =
    "Fallback placeholder: no evidence was extracted because the AI analysis failed.";

/// Returns the fixed fallback result for `arm`. Total and deterministic.
pub fn fallback_for(arm: Arm) -> EvaluationResult {
    match arm {
        Arm::QuickIntuitive => EvaluationResult::QuickIntuitive(QuickAssessment {
            fit_score: FALLBACK_FIT_SCORE,
            shortlist_recommend: false,
            justification: FALLBACK_JUSTIFICATION.to_string(),
        }),
        Arm::RubricDeliberative => EvaluationResult::RubricDeliberative(RubricAssessment {
            rubric: fixed_rubric(),
            evaluation: fallback_verdict(),
        }),
        Arm::ComplianceOfficer => EvaluationResult::ComplianceOfficer(ComplianceAssessment {
            rubric: fixed_rubric(),
            evaluation: fallback_compliance(
                "Fallback evaluation restricted to job-relevant qualifications.",
            ),
        }),
        Arm::ComplianceDebias => EvaluationResult::ComplianceDebias(DebiasAssessment {
            rubric: fixed_rubric(),
            evaluation: DebiasEvaluation {
                compliance: fallback_compliance(
                    "Fallback evaluation restricted to job-relevant qualifications with \
                     debiasing applied.",
                ),
                debias_review: DebiasReview {
                    mitigations_applied: vec![
                        "Educational institution prestige".to_string(),
                        "Name-based assumptions".to_string(),
                        "Resume formatting biases".to_string(),
                    ],
                    residual_risks: Vec::new(),
                },
            },
        }),
    }
}

fn fallback_verdict() -> RubricEvaluation {
    RubricEvaluation {
        scores: fixed_rubric()
            .into_iter()
            .map(|criterion| CriterionScore {
                criterion: criterion.name,
                score: 3,
                evidence: FALLBACK_EVIDENCE.to_string(),
            })
            .collect(),
        fit_score: FALLBACK_FIT_SCORE,
        shortlist_recommend: false,
        justification: FALLBACK_JUSTIFICATION.to_string(),
    }
}

fn fallback_compliance(notes: &str) -> ComplianceEvaluation {
    ComplianceEvaluation {
        verdict: fallback_verdict(),
        compliance_review: ComplianceReview {
            is_compliant: true,
            compliance_notes: notes.to_string(),
            risk_factors: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::validator::{parse_and_validate_with, ValidationMode};

    #[test]
    fn test_fallback_matches_arm() {
        for arm in Arm::ALL {
            assert_eq!(fallback_for(arm).arm(), arm);
        }
    }

    #[test]
    fn test_fallback_is_mid_range_and_not_recommended() {
        for arm in Arm::ALL {
            let result = fallback_for(arm);
            assert_eq!(result.fit_score(), 3.0);
            assert!(!result.shortlist_recommend());
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        for arm in Arm::ALL {
            assert_eq!(fallback_for(arm), fallback_for(arm));
        }
    }

    #[test]
    fn test_fallback_passes_its_own_schema_even_in_strict_mode() {
        for arm in Arm::ALL {
            let raw = serde_json::to_string(&fallback_for(arm)).unwrap();
            let parsed = parse_and_validate_with(&raw, arm, ValidationMode::Strict)
                .unwrap_or_else(|e| panic!("{arm}: {e}"));
            assert_eq!(parsed, fallback_for(arm));
        }
    }
}

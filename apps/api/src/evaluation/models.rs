//! Evaluation result shapes, one per arm.
//!
//! Field names are camelCase on the wire: they are the keys the model is told to emit
//! and the keys the API returns.

use serde::{Deserialize, Serialize};

use crate::evaluation::arms::Arm;
use crate::evaluation::rubric::RubricCriterion;

/// Arm 1 result: a single-pass judgment with no rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAssessment {
    pub fit_score: f64,
    pub shortlist_recommend: bool,
    pub justification: String,
}

/// Score for one rubric criterion, with evidence cited from the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion: String,
    pub score: u8, // 1 – 5
    pub evidence: String,
}

/// The `evaluation` block shared by every rubric arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricEvaluation {
    pub scores: Vec<CriterionScore>,
    pub fit_score: f64,
    pub shortlist_recommend: bool,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReview {
    pub is_compliant: bool,
    pub compliance_notes: String,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebiasReview {
    pub mitigations_applied: Vec<String>,
    pub residual_risks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEvaluation {
    #[serde(flatten)]
    pub verdict: RubricEvaluation,
    pub compliance_review: ComplianceReview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebiasEvaluation {
    #[serde(flatten)]
    pub compliance: ComplianceEvaluation,
    pub debias_review: DebiasReview,
}

/// Arm 2 result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricAssessment {
    pub rubric: Vec<RubricCriterion>,
    pub evaluation: RubricEvaluation,
}

/// Arm 3 result: arm 2 plus a compliance review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub rubric: Vec<RubricCriterion>,
    pub evaluation: ComplianceEvaluation,
}

/// Arm 4 result: arm 3 plus a debiasing review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebiasAssessment {
    pub rubric: Vec<RubricCriterion>,
    pub evaluation: DebiasEvaluation,
}

/// A validated evaluation, tagged by the arm that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "arm", rename_all = "snake_case")]
pub enum EvaluationResult {
    QuickIntuitive(QuickAssessment),
    RubricDeliberative(RubricAssessment),
    ComplianceOfficer(ComplianceAssessment),
    ComplianceDebias(DebiasAssessment),
}

impl EvaluationResult {
    pub fn arm(&self) -> Arm {
        match self {
            EvaluationResult::QuickIntuitive(_) => Arm::QuickIntuitive,
            EvaluationResult::RubricDeliberative(_) => Arm::RubricDeliberative,
            EvaluationResult::ComplianceOfficer(_) => Arm::ComplianceOfficer,
            EvaluationResult::ComplianceDebias(_) => Arm::ComplianceDebias,
        }
    }

    /// The rubric-arm `evaluation` block; `None` for arm 1.
    pub fn verdict(&self) -> Option<&RubricEvaluation> {
        match self {
            EvaluationResult::QuickIntuitive(_) => None,
            EvaluationResult::RubricDeliberative(r) => Some(&r.evaluation),
            EvaluationResult::ComplianceOfficer(r) => Some(&r.evaluation.verdict),
            EvaluationResult::ComplianceDebias(r) => Some(&r.evaluation.compliance.verdict),
        }
    }

    /// Root-level for arm 1, nested under `evaluation` for the rubric arms.
    pub fn fit_score(&self) -> f64 {
        match self {
            EvaluationResult::QuickIntuitive(q) => q.fit_score,
            EvaluationResult::RubricDeliberative(r) => r.evaluation.fit_score,
            EvaluationResult::ComplianceOfficer(r) => r.evaluation.verdict.fit_score,
            EvaluationResult::ComplianceDebias(r) => r.evaluation.compliance.verdict.fit_score,
        }
    }

    pub fn shortlist_recommend(&self) -> bool {
        match self {
            EvaluationResult::QuickIntuitive(q) => q.shortlist_recommend,
            _ => self.verdict().is_some_and(|v| v.shortlist_recommend),
        }
    }

    pub fn justification(&self) -> &str {
        match self {
            EvaluationResult::QuickIntuitive(q) => &q.justification,
            _ => self.verdict().map(|v| v.justification.as_str()).unwrap_or_default(),
        }
    }

    pub fn rubric(&self) -> Option<&[RubricCriterion]> {
        match self {
            EvaluationResult::QuickIntuitive(_) => None,
            EvaluationResult::RubricDeliberative(r) => Some(&r.rubric),
            EvaluationResult::ComplianceOfficer(r) => Some(&r.rubric),
            EvaluationResult::ComplianceDebias(r) => Some(&r.rubric),
        }
    }

    pub fn scores(&self) -> &[CriterionScore] {
        self.verdict().map(|v| v.scores.as_slice()).unwrap_or_default()
    }

    pub fn compliance_review(&self) -> Option<&ComplianceReview> {
        match self {
            EvaluationResult::ComplianceOfficer(r) => Some(&r.evaluation.compliance_review),
            EvaluationResult::ComplianceDebias(r) => Some(&r.evaluation.compliance.compliance_review),
            _ => None,
        }
    }

    pub fn debias_review(&self) -> Option<&DebiasReview> {
        match self {
            EvaluationResult::ComplianceDebias(r) => Some(&r.evaluation.debias_review),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::rubric::fixed_rubric;

    fn verdict(fit_score: f64) -> RubricEvaluation {
        RubricEvaluation {
            scores: vec![CriterionScore {
                criterion: "Required technical skill match".to_string(),
                score: 4,
                evidence: "Five years of Rust".to_string(),
            }],
            fit_score,
            shortlist_recommend: true,
            justification: "Strong systems background".to_string(),
        }
    }

    #[test]
    fn test_fit_score_read_from_root_for_quick_arm() {
        let result = EvaluationResult::QuickIntuitive(QuickAssessment {
            fit_score: 4.5,
            shortlist_recommend: true,
            justification: "Good match".to_string(),
        });
        assert_eq!(result.fit_score(), 4.5);
        assert!(result.rubric().is_none());
        assert!(result.scores().is_empty());
    }

    #[test]
    fn test_fit_score_read_from_nested_evaluation_for_debias_arm() {
        let result = EvaluationResult::ComplianceDebias(DebiasAssessment {
            rubric: fixed_rubric(),
            evaluation: DebiasEvaluation {
                compliance: ComplianceEvaluation {
                    verdict: verdict(3.7),
                    compliance_review: ComplianceReview {
                        is_compliant: true,
                        compliance_notes: "ok".to_string(),
                        risk_factors: vec![],
                    },
                },
                debias_review: DebiasReview {
                    mitigations_applied: vec!["Ignored school names".to_string()],
                    residual_risks: vec![],
                },
            },
        });
        assert_eq!(result.arm(), Arm::ComplianceDebias);
        assert_eq!(result.fit_score(), 3.7);
        assert!(result.compliance_review().is_some());
        assert_eq!(result.debias_review().unwrap().mitigations_applied.len(), 1);
    }

    #[test]
    fn test_compliance_fields_serialize_inside_evaluation() {
        let result = EvaluationResult::ComplianceOfficer(ComplianceAssessment {
            rubric: fixed_rubric(),
            evaluation: ComplianceEvaluation {
                verdict: verdict(4.0),
                compliance_review: ComplianceReview {
                    is_compliant: false,
                    compliance_notes: "Referenced age".to_string(),
                    risk_factors: vec!["age".to_string()],
                },
            },
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["arm"], "compliance_officer");
        assert_eq!(value["evaluation"]["fitScore"], 4.0);
        assert_eq!(value["evaluation"]["complianceReview"]["isCompliant"], false);
        assert_eq!(value["rubric"].as_array().unwrap().len(), 5);
    }
}

//! Arm progression: the per-resume state machine.
//!
//! State is the set of completed arms. `next_arm` always answers with the lowest arm
//! not yet run; once all four are done it keeps answering with the last arm, which
//! re-runs and overwrites it.

use serde::Serialize;

use crate::evaluation::arms::{Arm, ArmSet};
use crate::evaluation::models::EvaluationResult;
use crate::session::ResumeRecord;

pub const SUMMARY_LABEL: &str = "Show Complete Summary";

/// Aggregates are rounded to this many decimal places before banding, so sums of
/// one-decimal scores land exactly on their thresholds.
const AGGREGATE_DECIMALS: i32 = 3;

/// Returns the lowest-ordered arm not in `completed`, or `Arm::LAST` when all are done.
pub fn next_arm(completed: &ArmSet) -> Arm {
    Arm::ALL
        .into_iter()
        .find(|arm| !completed.contains(arm))
        .unwrap_or(Arm::LAST)
}

/// Call to action for the resume's next step.
pub fn action_label(completed: &ArmSet) -> &'static str {
    if is_complete(completed) {
        SUMMARY_LABEL
    } else {
        next_arm(completed).action_label()
    }
}

/// Marks `arm` complete and stores its score and full result, overwriting any earlier run.
pub fn record_completion(resume: &mut ResumeRecord, arm: Arm, result: EvaluationResult) {
    resume.completed_arms.insert(arm);
    resume.arm_scores.insert(arm, result.fit_score());
    resume.arm_results.insert(arm, result);
}

pub fn is_fully_evaluated(resume: &ResumeRecord) -> bool {
    is_complete(&resume.completed_arms)
}

fn is_complete(completed: &ArmSet) -> bool {
    Arm::ALL.iter().all(|arm| completed.contains(arm))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Consistency {
    High,
    Moderate,
    Variable,
}

impl Consistency {
    pub fn from_spread(spread: f64) -> Self {
        if spread < 0.5 {
            Consistency::High
        } else if spread < 1.0 {
            Consistency::Moderate
        } else {
            Consistency::Variable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Consistency::High => "High",
            Consistency::Moderate => "Moderate",
            Consistency::Variable => "Variable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    #[serde(rename = "Strongly Recommended")]
    StronglyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider with Reservations")]
    ConsiderWithReservations,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// Boundary values belong to the higher band.
    pub fn from_average(average: f64) -> Self {
        if average >= 4.5 {
            Recommendation::StronglyRecommended
        } else if average >= 4.0 {
            Recommendation::Recommended
        } else if average >= 3.0 {
            Recommendation::ConsiderWithReservations
        } else {
            Recommendation::NotRecommended
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::StronglyRecommended => "Strongly Recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::ConsiderWithReservations => "Consider with Reservations",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArmScore {
    pub arm: Arm,
    pub label: &'static str,
    pub score: f64,
}

/// Aggregate over all four arms of one resume.
#[derive(Debug, Clone, Serialize)]
pub struct ArmSummary {
    pub scores: Vec<ArmScore>,
    pub average: f64,
    pub spread: f64,
    pub consistency: Consistency,
    pub recommendation: Recommendation,
}

/// `None` until every arm has completed.
pub fn summarize(resume: &ResumeRecord) -> Option<ArmSummary> {
    if !is_fully_evaluated(resume) {
        return None;
    }

    let scores = Arm::ALL
        .into_iter()
        .map(|arm| {
            resume.arm_scores.get(&arm).map(|&score| ArmScore {
                arm,
                label: arm.short_label(),
                score,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
    let average = round_aggregate(values.iter().sum::<f64>() / values.len() as f64);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let spread = round_aggregate(max - min);

    Some(ArmSummary {
        scores,
        average,
        spread,
        consistency: Consistency::from_spread(spread),
        recommendation: Recommendation::from_average(average),
    })
}

fn round_aggregate(value: f64) -> f64 {
    let scale = 10f64.powi(AGGREGATE_DECIMALS);
    (value * scale).round() / scale
}

/// Progress view for one resume.
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub completed: Vec<Arm>,
    pub completed_count: usize,
    pub total: usize,
    pub next_arm: Arm,
    pub action_label: &'static str,
    pub fully_evaluated: bool,
}

pub fn progress(resume: &ResumeRecord) -> Progress {
    Progress {
        completed: resume.completed_arms.iter().copied().collect(),
        completed_count: resume.completed_arms.len(),
        total: Arm::ALL.len(),
        next_arm: next_arm(&resume.completed_arms),
        action_label: action_label(&resume.completed_arms),
        fully_evaluated: is_fully_evaluated(resume),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::fallback::fallback_for;
    use crate::evaluation::models::QuickAssessment;

    fn set(arms: &[Arm]) -> ArmSet {
        arms.iter().copied().collect()
    }

    fn quick(score: f64) -> EvaluationResult {
        EvaluationResult::QuickIntuitive(QuickAssessment {
            fit_score: score,
            shortlist_recommend: score >= 4.0,
            justification: "test".to_string(),
        })
    }

    fn resume_with_scores(scores: [f64; 4]) -> ResumeRecord {
        let mut resume = ResumeRecord::new(1, "Resume 1".to_string());
        for (arm, score) in Arm::ALL.into_iter().zip(scores) {
            resume.completed_arms.insert(arm);
            resume.arm_scores.insert(arm, score);
            resume.arm_results.insert(arm, fallback_for(arm));
        }
        resume
    }

    #[test]
    fn test_next_arm_for_every_subset() {
        // All 16 subsets, via bitmask over Arm::ALL.
        for mask in 0u8..16 {
            let completed: ArmSet = Arm::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, arm)| arm)
                .collect();
            let expected = Arm::ALL
                .into_iter()
                .find(|arm| !completed.contains(arm))
                .unwrap_or(Arm::ComplianceDebias);
            assert_eq!(next_arm(&completed), expected, "mask {mask:04b}");
        }
    }

    #[test]
    fn test_next_arm_sequence() {
        assert_eq!(next_arm(&set(&[])), Arm::QuickIntuitive);
        assert_eq!(next_arm(&set(&[Arm::QuickIntuitive])), Arm::RubricDeliberative);
        assert_eq!(
            next_arm(&set(&[Arm::QuickIntuitive, Arm::RubricDeliberative])),
            Arm::ComplianceOfficer
        );
        assert_eq!(next_arm(&set(&Arm::ALL[..3])), Arm::ComplianceDebias);
        assert_eq!(next_arm(&set(&Arm::ALL)), Arm::ComplianceDebias);
    }

    #[test]
    fn test_next_arm_fills_gaps_first() {
        assert_eq!(
            next_arm(&set(&[Arm::QuickIntuitive, Arm::ComplianceOfficer])),
            Arm::RubricDeliberative
        );
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(action_label(&set(&[])), "Start Fast Evaluation (ARM A)");
        assert_eq!(
            action_label(&set(&[Arm::QuickIntuitive])),
            "Run Detailed Analysis (ARM B)"
        );
        assert_eq!(action_label(&set(&Arm::ALL[..3])), "Run Compliance + Debias (ARM D)");
        assert_eq!(action_label(&set(&Arm::ALL)), SUMMARY_LABEL);
    }

    #[test]
    fn test_record_completion_overwrites() {
        let mut resume = ResumeRecord::new(1, "Resume 1".to_string());
        record_completion(&mut resume, Arm::QuickIntuitive, quick(2.0));
        record_completion(&mut resume, Arm::QuickIntuitive, quick(4.5));

        assert_eq!(resume.completed_arms.len(), 1);
        assert_eq!(resume.arm_scores.len(), 1);
        assert_eq!(resume.arm_results.len(), 1);
        assert_eq!(resume.arm_scores[&Arm::QuickIntuitive], 4.5);
        assert_eq!(resume.arm_results[&Arm::QuickIntuitive].fit_score(), 4.5);
    }

    #[test]
    fn test_record_completion_reads_nested_score() {
        let mut resume = ResumeRecord::new(1, "Resume 1".to_string());
        record_completion(
            &mut resume,
            Arm::ComplianceOfficer,
            fallback_for(Arm::ComplianceOfficer),
        );
        assert_eq!(resume.arm_scores[&Arm::ComplianceOfficer], 3.0);
    }

    #[test]
    fn test_summarize_undefined_until_all_arms_done() {
        let mut resume = ResumeRecord::new(1, "Resume 1".to_string());
        for arm in &Arm::ALL[..3] {
            record_completion(&mut resume, *arm, fallback_for(*arm));
            assert!(summarize(&resume).is_none());
            assert!(!is_fully_evaluated(&resume));
        }
        record_completion(&mut resume, Arm::LAST, fallback_for(Arm::LAST));
        assert!(is_fully_evaluated(&resume));
        assert!(summarize(&resume).is_some());
    }

    #[test]
    fn test_summarize_moderate_strongly_recommended() {
        let summary = summarize(&resume_with_scores([5.0, 4.1, 4.6, 4.4])).unwrap();
        assert!((summary.average - 4.525).abs() < 1e-9);
        assert!((summary.spread - 0.9).abs() < 1e-9);
        assert_eq!(summary.consistency, Consistency::Moderate);
        assert_eq!(summary.recommendation, Recommendation::StronglyRecommended);
    }

    #[test]
    fn test_summarize_flat_scores() {
        let summary = summarize(&resume_with_scores([3.0, 3.0, 3.0, 3.0])).unwrap();
        assert_eq!(summary.spread, 0.0);
        assert_eq!(summary.consistency, Consistency::High);
        assert_eq!(summary.recommendation, Recommendation::ConsiderWithReservations);
    }

    #[test]
    fn test_boundaries_belong_to_higher_band() {
        assert_eq!(Recommendation::from_average(4.5), Recommendation::StronglyRecommended);
        assert_eq!(Recommendation::from_average(4.0), Recommendation::Recommended);
        assert_eq!(Recommendation::from_average(3.0), Recommendation::ConsiderWithReservations);
        assert_eq!(Recommendation::from_average(2.99), Recommendation::NotRecommended);
        assert_eq!(Consistency::from_spread(0.5), Consistency::Moderate);
        assert_eq!(Consistency::from_spread(1.0), Consistency::Variable);
        assert_eq!(Consistency::from_spread(0.49), Consistency::High);
    }

    #[test]
    fn test_spread_of_exactly_one_is_variable() {
        // 4.1 - 3.1 is 0.9999999999999996 in raw f64.
        let summary = summarize(&resume_with_scores([4.1, 3.1, 3.5, 3.5])).unwrap();
        assert_eq!(summary.spread, 1.0);
        assert_eq!(summary.consistency, Consistency::Variable);
    }

    #[test]
    fn test_spread_of_exactly_half_is_moderate() {
        let summary = summarize(&resume_with_scores([4.6, 4.1, 4.3, 4.3])).unwrap();
        assert_eq!(summary.spread, 0.5);
        assert_eq!(summary.consistency, Consistency::Moderate);
    }

    #[test]
    fn test_average_on_threshold_is_higher_band() {
        let summary = summarize(&resume_with_scores([4.7, 4.3, 4.6, 4.4])).unwrap();
        assert_eq!(summary.average, 4.5);
        assert_eq!(summary.recommendation, Recommendation::StronglyRecommended);

        let summary = summarize(&resume_with_scores([4.3, 3.7, 4.1, 3.9])).unwrap();
        assert_eq!(summary.average, 4.0);
        assert_eq!(summary.recommendation, Recommendation::Recommended);
    }

    #[test]
    fn test_progress_view() {
        let mut resume = ResumeRecord::new(1, "Resume 1".to_string());
        record_completion(&mut resume, Arm::QuickIntuitive, quick(4.0));
        let p = progress(&resume);
        assert_eq!(p.completed, vec![Arm::QuickIntuitive]);
        assert_eq!(p.completed_count, 1);
        assert_eq!(p.total, 4);
        assert_eq!(p.next_arm, Arm::RubricDeliberative);
        assert!(!p.fully_evaluated);
    }

    #[test]
    fn test_recommendation_serializes_as_label() {
        let json = serde_json::to_string(&Recommendation::ConsiderWithReservations).unwrap();
        assert_eq!(json, "\"Consider with Reservations\"");
    }
}

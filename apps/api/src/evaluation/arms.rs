//! The four evaluation arms, in their fixed order.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four evaluation strategies. Declaration order is the run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    QuickIntuitive,
    RubricDeliberative,
    ComplianceOfficer,
    ComplianceDebias,
}

/// Set of completed arms. Ordered so iteration follows run order.
pub type ArmSet = BTreeSet<Arm>;

impl Arm {
    pub const ALL: [Arm; 4] = [
        Arm::QuickIntuitive,
        Arm::RubricDeliberative,
        Arm::ComplianceOfficer,
        Arm::ComplianceDebias,
    ];

    /// The last arm; `next_arm` stays here once every arm has run.
    pub const LAST: Arm = Arm::ComplianceDebias;

    pub fn key(self) -> &'static str {
        match self {
            Arm::QuickIntuitive => "quick_intuitive",
            Arm::RubricDeliberative => "rubric_deliberative",
            Arm::ComplianceOfficer => "compliance_officer",
            Arm::ComplianceDebias => "compliance_debias",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Arm::QuickIntuitive => "ARM A",
            Arm::RubricDeliberative => "ARM B",
            Arm::ComplianceOfficer => "ARM C",
            Arm::ComplianceDebias => "ARM D",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Arm::QuickIntuitive => "ARM A: Fast Intuitive Evaluation",
            Arm::RubricDeliberative => "ARM B: Deliberative Rubric-First",
            Arm::ComplianceOfficer => "ARM C: Compliance Officer",
            Arm::ComplianceDebias => "ARM D: Compliance + Debias",
        }
    }

    /// Call to action shown before running this arm.
    pub fn action_label(self) -> &'static str {
        match self {
            Arm::QuickIntuitive => "Start Fast Evaluation (ARM A)",
            Arm::RubricDeliberative => "Run Detailed Analysis (ARM B)",
            Arm::ComplianceOfficer => "Run Compliance Check (ARM C)",
            Arm::ComplianceDebias => "Run Compliance + Debias (ARM D)",
        }
    }

    /// Arms 2–4 score against the fixed rubric.
    pub fn uses_rubric(self) -> bool {
        !matches!(self, Arm::QuickIntuitive)
    }

    pub fn requires_compliance_review(self) -> bool {
        matches!(self, Arm::ComplianceOfficer | Arm::ComplianceDebias)
    }

    pub fn requires_debias_review(self) -> bool {
        matches!(self, Arm::ComplianceDebias)
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = Arm::ALL;
        sorted.sort();
        assert_eq!(sorted, Arm::ALL);
        assert_eq!(Arm::ALL[3], Arm::LAST);
    }

    #[test]
    fn test_only_quick_arm_skips_rubric() {
        assert!(!Arm::QuickIntuitive.uses_rubric());
        assert!(Arm::RubricDeliberative.uses_rubric());
        assert!(Arm::ComplianceOfficer.uses_rubric());
        assert!(Arm::ComplianceDebias.uses_rubric());
    }

    #[test]
    fn test_review_requirements_accumulate() {
        assert!(!Arm::RubricDeliberative.requires_compliance_review());
        assert!(Arm::ComplianceOfficer.requires_compliance_review());
        assert!(!Arm::ComplianceOfficer.requires_debias_review());
        assert!(Arm::ComplianceDebias.requires_compliance_review());
        assert!(Arm::ComplianceDebias.requires_debias_review());
    }

    #[test]
    fn test_serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&Arm::ComplianceOfficer).unwrap();
        assert_eq!(json, "\"compliance_officer\"");
        let back: Arm = serde_json::from_str("\"quick_intuitive\"").unwrap();
        assert_eq!(back, Arm::QuickIntuitive);
    }
}

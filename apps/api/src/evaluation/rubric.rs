//! The fixed five-criterion rubric used by arms 2–4.

use serde::{Deserialize, Serialize};

/// A weighted evaluation criterion. `name` is serialized as `criterion`
/// to match the response schema the model is asked to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCriterion {
    #[serde(rename = "criterion")]
    pub name: String,
    pub weight: u32,
    pub description: String,
}

/// (name, weight, description). Weights sum to 100.
const FIXED_CRITERIA: [(&str, u32, &str); 5] = [
    (
        "Required technical skill match",
        30,
        "Match between required technical skills in JD and candidate's demonstrated skills",
    ),
    (
        "Relevant years of experience",
        20,
        "Years of relevant work experience in similar roles/industry",
    ),
    (
        "Evidence of role-specific achievements",
        25,
        "Concrete examples of achievements relevant to job requirements",
    ),
    (
        "Evidence of teamwork/communication",
        15,
        "Demonstrated ability to work in teams and communicate effectively",
    ),
    (
        "Certifications/education relevance",
        10,
        "Relevant certifications and educational background",
    ),
];

pub const TOTAL_WEIGHT: u32 = 100;

/// Returns the fixed rubric in presentation order.
pub fn fixed_rubric() -> Vec<RubricCriterion> {
    FIXED_CRITERIA
        .iter()
        .map(|&(name, weight, description)| RubricCriterion {
            name: name.to_string(),
            weight,
            description: description.to_string(),
        })
        .collect()
}

pub fn criterion_names() -> impl Iterator<Item = &'static str> {
    FIXED_CRITERIA.iter().map(|&(name, _, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_total() {
        let sum: u32 = fixed_rubric().iter().map(|c| c.weight).sum();
        assert_eq!(sum, TOTAL_WEIGHT);
    }

    #[test]
    fn test_five_distinct_criteria() {
        let mut names: Vec<&str> = criterion_names().collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_criterion_serializes_name_as_criterion() {
        let value = serde_json::to_value(&fixed_rubric()[0]).unwrap();
        assert_eq!(value["criterion"], "Required technical skill match");
        assert_eq!(value["weight"], 30);
        assert!(value.get("name").is_none());
    }
}

//! Validation of extracted criteria assessments
//!
//! Enforces the evidence standard the reduction depends on: NO must mean
//! "actively contradicted by the text", never "not mentioned".

use crate::model::criteria::{Assessment, CriteriaMap};

/// Result of criteria validation
#[derive(Debug)]
pub struct CriteriaValidationResult {
    /// Whether the extraction passed validation
    pub is_valid: bool,
    /// Critical errors that indicate invalid output
    pub errors: Vec<String>,
    /// Warnings that indicate potential quality issues
    pub warnings: Vec<String>,
}

impl CriteriaValidationResult {
    /// Create a new validation result with no issues
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the validation result
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the validation result
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Validate extracted criteria for grounding and completeness
///
/// Checks:
/// 1. Every NO assessment carries stated reasoning (error if absent)
/// 2. Reasoning is present per criterion (warning when very short)
/// 3. All-UNCLEAR output, which usually signals extractor malfunction
///    rather than a genuinely opaque abstract (warning)
pub fn validate_criteria(criteria: &CriteriaMap) -> CriteriaValidationResult {
    let mut result = CriteriaValidationResult::valid();

    for entry in criteria.entries() {
        let reasoning = entry.reasoning.trim();

        if entry.assessment == Assessment::No && reasoning.is_empty() {
            result.add_error(format!(
                "Criterion '{}' assessed NO with no supporting reasoning",
                entry.criterion
            ));
            continue;
        }

        if reasoning.is_empty() {
            result.add_warning(format!(
                "Criterion '{}' has no reasoning",
                entry.criterion
            ));
        } else if reasoning.len() < 10 {
            result.add_warning(format!(
                "Criterion '{}' has very short reasoning: '{}'",
                entry.criterion, reasoning
            ));
        }
    }

    let all_unclear = criteria
        .iter()
        .all(|(_, assessment)| assessment == Assessment::Unclear);
    if all_unclear {
        result.add_warning(
            "Every criterion is UNCLEAR - possible extractor malfunction rather than ambiguity"
                .to_string(),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::criteria::{Criterion, CriterionAssessment, MissingCriterionPolicy};

    fn map_with(no_reasoning_for: Option<Criterion>, value: Assessment) -> CriteriaMap {
        let entries = Criterion::ALL
            .iter()
            .map(|&c| {
                let reasoning = if Some(c) == no_reasoning_for {
                    String::new()
                } else {
                    "clearly stated in the abstract".to_string()
                };
                (
                    c,
                    CriterionAssessment {
                        assessment: value,
                        reasoning,
                    },
                )
            })
            .collect();
        CriteriaMap::from_assessments(entries, MissingCriterionPolicy::Strict).unwrap()
    }

    #[test]
    fn well_grounded_map_is_valid() {
        let result = validate_criteria(&map_with(None, Assessment::Yes));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn no_without_reasoning_is_an_error() {
        let result = validate_criteria(&map_with(Some(Criterion::StudyDesign), Assessment::No));
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("study_design"));
    }

    #[test]
    fn missing_reasoning_on_yes_is_only_a_warning() {
        let result = validate_criteria(&map_with(Some(Criterion::StudyDesign), Assessment::Yes));
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("study_design")));
    }

    #[test]
    fn all_unclear_triggers_malfunction_warning() {
        let result = validate_criteria(&map_with(None, Assessment::Unclear));
        assert!(result.is_valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("extractor malfunction")));
    }
}

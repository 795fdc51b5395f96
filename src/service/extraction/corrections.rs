//! Post-extraction correction for pure cash-transfer programs
//!
//! Models reliably mark the productive-assets component YES when an abstract
//! reports impacts on asset *ownership*, even though the program only
//! transfers cash. When the stated reasoning describes impact measurement
//! with no provision language, the assessment is corrected to NO with an
//! audit note preserving the original reasoning.

use crate::model::criteria::{Assessment, CriteriaMap, Criterion};

/// Phrases that indicate impact measurement rather than program provision
const IMPACT_PHRASES: &[&str] = &[
    "impacts on",
    "impact on",
    "effects on",
    "effect on",
    "ownership of",
    "asset ownership",
    "asset accumulation",
    "increased ownership",
    "improved ownership",
];

/// Phrases that indicate direct provision (a legitimate YES)
const PROVISION_PHRASES: &[&str] = &[
    "program provides",
    "program gives",
    "program transfers",
    "beneficiaries receive",
    "participants receive",
    "households receive",
    "direct transfer",
    "livestock grants",
    "asset transfers",
    "asset transfer",
];

/// Apply the pure-cash-transfer correction to an extracted criteria map.
///
/// Returns true when a correction was applied.
pub fn apply_asset_provision_correction(criteria: &mut CriteriaMap) -> bool {
    if criteria.get(Criterion::ComponentACashSupport) != Assessment::Yes
        || criteria.get(Criterion::ComponentBProductiveAssets) != Assessment::Yes
    {
        return false;
    }

    let reasoning = criteria
        .reasoning(Criterion::ComponentBProductiveAssets)
        .unwrap_or_default()
        .to_string();

    if !is_impact_measurement_reasoning(&reasoning) {
        return false;
    }

    let mut preview: String = reasoning.chars().take(100).collect();
    if preview.len() < reasoning.len() {
        preview.push_str("...");
    }

    criteria.set(
        Criterion::ComponentBProductiveAssets,
        Assessment::No,
        format!(
            "Corrected: reasoning described impacts on asset ownership, not direct provision. \
             Original: {}",
            preview
        ),
    );

    tracing::debug!("Applied pure-cash-transfer correction to productive-assets criterion");
    true
}

/// Detect reasoning that describes impact measurement rather than provision
fn is_impact_measurement_reasoning(reasoning: &str) -> bool {
    let reasoning_lower = reasoning.to_lowercase();

    let has_impact_language = IMPACT_PHRASES
        .iter()
        .any(|phrase| reasoning_lower.contains(phrase));
    let has_provision_language = PROVISION_PHRASES
        .iter()
        .any(|phrase| reasoning_lower.contains(phrase));

    has_impact_language && !has_provision_language
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::criteria::{CriterionAssessment, MissingCriterionPolicy};

    fn map(assets_assessment: Assessment, assets_reasoning: &str) -> CriteriaMap {
        let entries = Criterion::ALL
            .iter()
            .map(|&c| {
                let (assessment, reasoning) = if c == Criterion::ComponentBProductiveAssets {
                    (assets_assessment, assets_reasoning.to_string())
                } else {
                    (Assessment::Yes, "stated in abstract".to_string())
                };
                (
                    c,
                    CriterionAssessment {
                        assessment,
                        reasoning,
                    },
                )
            })
            .collect();
        CriteriaMap::from_assessments(entries, MissingCriterionPolicy::Strict).unwrap()
    }

    #[test]
    fn corrects_impact_measurement_to_no() {
        let mut criteria = map(
            Assessment::Yes,
            "The program has noticeable impacts on asset ownership among beneficiaries",
        );
        assert!(apply_asset_provision_correction(&mut criteria));
        assert_eq!(
            criteria.get(Criterion::ComponentBProductiveAssets),
            Assessment::No
        );
        assert!(criteria
            .reasoning(Criterion::ComponentBProductiveAssets)
            .unwrap()
            .starts_with("Corrected:"));
    }

    #[test]
    fn provision_language_is_not_corrected() {
        let mut criteria = map(
            Assessment::Yes,
            "Beneficiaries receive livestock grants alongside impacts on asset ownership",
        );
        assert!(!apply_asset_provision_correction(&mut criteria));
        assert_eq!(
            criteria.get(Criterion::ComponentBProductiveAssets),
            Assessment::Yes
        );
    }

    #[test]
    fn non_yes_assessments_are_left_alone() {
        let mut criteria = map(Assessment::Unclear, "impacts on asset ownership");
        assert!(!apply_asset_provision_correction(&mut criteria));
        assert_eq!(
            criteria.get(Criterion::ComponentBProductiveAssets),
            Assessment::Unclear
        );
    }
}

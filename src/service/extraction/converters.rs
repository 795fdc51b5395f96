//! Converters from extracted LLM output to the domain criteria map

use crate::model::criteria::{
    Assessment, CriteriaMap, Criterion, CriterionAssessment, MalformedInputError,
    MissingCriterionPolicy,
};
use crate::model::extracted::{
    ExtractedAssessment, ExtractedCriteria, ExtractedCriterion, ExtractedYear,
};

/// Earliest publication year accepted by the review
const YEAR_CUTOFF: i32 = 2004;

/// Convert a typed extraction into the domain criteria map.
///
/// The extractor's schema is complete by construction, so the strict policy
/// here can only trip if this mapping itself drops a criterion.
pub fn convert_extracted(extracted: ExtractedCriteria) -> Result<CriteriaMap, MalformedInputError> {
    let assessments = vec![
        (
            Criterion::ParticipantsLmic,
            convert_criterion(extracted.participants_lmic),
        ),
        (
            Criterion::ComponentACashSupport,
            convert_criterion(extracted.component_a_cash_support),
        ),
        (
            Criterion::ComponentBProductiveAssets,
            convert_criterion(extracted.component_b_productive_assets),
        ),
        (
            Criterion::RelevantOutcomes,
            convert_criterion(extracted.relevant_outcomes),
        ),
        (
            Criterion::StudyDesign,
            convert_criterion(extracted.study_design),
        ),
        (
            Criterion::PublicationYear2004Plus,
            assess_publication_year(extracted.publication_year),
        ),
        (
            Criterion::CompletedStudy,
            convert_criterion(extracted.completed_study),
        ),
    ];

    CriteriaMap::from_assessments(assessments, MissingCriterionPolicy::Strict)
}

fn convert_criterion(extracted: ExtractedCriterion) -> CriterionAssessment {
    let assessment = match extracted.assessment {
        ExtractedAssessment::Yes => Assessment::Yes,
        ExtractedAssessment::No => Assessment::No,
        ExtractedAssessment::Unclear => Assessment::Unclear,
    };

    CriterionAssessment {
        assessment,
        reasoning: extracted.reasoning,
    }
}

/// Assess the year cutoff in code from the extracted raw year.
///
/// The model only reports the year; judging the cutoff is deterministic and
/// stays on this side of the boundary, like the dual-component derivation.
fn assess_publication_year(extracted: ExtractedYear) -> CriterionAssessment {
    let year = extracted
        .year_extracted
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok());

    match year {
        Some(year) if year >= YEAR_CUTOFF => CriterionAssessment {
            assessment: Assessment::Yes,
            reasoning: format!("Year {} >= {} (assessed from extracted year)", year, YEAR_CUTOFF),
        },
        Some(year) => CriterionAssessment {
            assessment: Assessment::No,
            reasoning: format!("Year {} < {} (assessed from extracted year)", year, YEAR_CUTOFF),
        },
        None => CriterionAssessment {
            assessment: Assessment::Unclear,
            reasoning: format!("Year not extractable: {}", extracted.reasoning),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(assessment: ExtractedAssessment) -> ExtractedCriterion {
        ExtractedCriterion {
            assessment,
            reasoning: "stated in abstract".to_string(),
        }
    }

    fn extracted(year: Option<&str>) -> ExtractedCriteria {
        ExtractedCriteria {
            participants_lmic: criterion(ExtractedAssessment::Yes),
            component_a_cash_support: criterion(ExtractedAssessment::Yes),
            component_b_productive_assets: criterion(ExtractedAssessment::Yes),
            relevant_outcomes: criterion(ExtractedAssessment::Yes),
            study_design: criterion(ExtractedAssessment::Yes),
            publication_year: ExtractedYear {
                year_extracted: year.map(|s| s.to_string()),
                reasoning: "year in record".to_string(),
            },
            completed_study: criterion(ExtractedAssessment::Yes),
        }
    }

    #[test]
    fn year_at_or_after_cutoff_is_yes() {
        let map = convert_extracted(extracted(Some("2004"))).unwrap();
        assert_eq!(map.get(Criterion::PublicationYear2004Plus), Assessment::Yes);
    }

    #[test]
    fn year_before_cutoff_is_no() {
        let map = convert_extracted(extracted(Some("1998"))).unwrap();
        assert_eq!(map.get(Criterion::PublicationYear2004Plus), Assessment::No);
    }

    #[test]
    fn unparsable_year_is_unclear() {
        for raw in [None, Some(""), Some("about 2010"), Some("n.d.")] {
            let map = convert_extracted(extracted(raw)).unwrap();
            assert_eq!(
                map.get(Criterion::PublicationYear2004Plus),
                Assessment::Unclear,
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn all_criteria_carry_reasoning() {
        let map = convert_extracted(extracted(Some("2015"))).unwrap();
        for entry in map.entries() {
            assert!(!entry.reasoning.is_empty());
        }
    }
}

//! Aggregate statistics over screening results
//!
//! Pure functions over result sets; the API endpoint and the export document
//! both use the same computation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{Assessment, Criterion, Decision, ScreeningResult};

/// Counts and rates per decision plus per-criterion UNCLEAR figures
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScreeningStats {
    pub total: usize,
    pub include: usize,
    pub exclude: usize,
    pub maybe: usize,
    pub uncertain: usize,
    /// include / total, 0.0 for an empty set
    pub include_rate: f64,
    pub exclude_rate: f64,
    pub maybe_rate: f64,
    pub uncertain_rate: f64,
    /// UNCLEAR frequency per criterion, over results that carry criteria.
    /// High values single out the criteria the prompt explains worst.
    pub unclear_by_criterion: Vec<CriterionUnclearRate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriterionUnclearRate {
    pub criterion: String,
    pub unclear: usize,
    pub rate: f64,
}

/// Compute aggregate statistics for a set of screening results
pub fn compute_stats(results: &[ScreeningResult]) -> ScreeningStats {
    let total = results.len();
    let count = |d: Decision| results.iter().filter(|r| r.decision == d).count();

    let include = count(Decision::Include);
    let exclude = count(Decision::Exclude);
    let maybe = count(Decision::Maybe);
    let uncertain = count(Decision::Uncertain);

    let rate = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

    // UNCLEAR rates are relative to assessed results only; UNCERTAIN rows
    // carry no criteria and would dilute the denominator
    let assessed = results.iter().filter(|r| r.criteria.is_some()).count();

    let unclear_by_criterion = Criterion::ALL
        .iter()
        .map(|&criterion| {
            let unclear = results
                .iter()
                .filter_map(|r| r.criteria.as_ref())
                .filter(|c| c.get(criterion) == Assessment::Unclear)
                .count();
            CriterionUnclearRate {
                criterion: criterion.name().to_string(),
                unclear,
                rate: if assessed == 0 {
                    0.0
                } else {
                    unclear as f64 / assessed as f64
                },
            }
        })
        .collect();

    ScreeningStats {
        total,
        include,
        exclude,
        maybe,
        uncertain,
        include_rate: rate(include),
        exclude_rate: rate(exclude),
        maybe_rate: rate(maybe),
        uncertain_rate: rate(uncertain),
        unclear_by_criterion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::criteria::{CriteriaMap, CriterionAssessment, MissingCriterionPolicy};

    fn criteria_with(unclear_on: &[Criterion]) -> CriteriaMap {
        let entries = Criterion::ALL
            .iter()
            .map(|&c| {
                let assessment = if unclear_on.contains(&c) {
                    Assessment::Unclear
                } else {
                    Assessment::Yes
                };
                (
                    c,
                    CriterionAssessment {
                        assessment,
                        reasoning: "stated".to_string(),
                    },
                )
            })
            .collect();
        CriteriaMap::from_assessments(entries, MissingCriterionPolicy::Strict).unwrap()
    }

    fn result(decision: Decision, criteria: Option<CriteriaMap>) -> ScreeningResult {
        ScreeningResult {
            paper_id: "p".to_string(),
            decision,
            reasoning: "r".to_string(),
            criteria,
            dual_component: None,
            counts: None,
            extraction_error: None,
            model_used: "m".to_string(),
            screened_at: chrono::Utc::now(),
            processing_time_ms: 0,
        }
    }

    #[test]
    fn empty_set_is_all_zeroes() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.include_rate, 0.0);
        assert!(stats.unclear_by_criterion.iter().all(|c| c.rate == 0.0));
    }

    #[test]
    fn decision_counts_and_rates() {
        let results = vec![
            result(Decision::Include, Some(criteria_with(&[]))),
            result(Decision::Exclude, Some(criteria_with(&[]))),
            result(Decision::Maybe, Some(criteria_with(&[Criterion::StudyDesign]))),
            result(Decision::Uncertain, None),
        ];
        let stats = compute_stats(&results);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.include, 1);
        assert_eq!(stats.exclude, 1);
        assert_eq!(stats.maybe, 1);
        assert_eq!(stats.uncertain, 1);
        assert!((stats.maybe_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn unclear_rate_ignores_uncertain_rows() {
        let results = vec![
            result(Decision::Maybe, Some(criteria_with(&[Criterion::StudyDesign]))),
            result(Decision::Include, Some(criteria_with(&[]))),
            result(Decision::Uncertain, None),
        ];
        let stats = compute_stats(&results);
        let design = stats
            .unclear_by_criterion
            .iter()
            .find(|c| c.criterion == "study_design")
            .unwrap();
        assert_eq!(design.unclear, 1);
        // denominator is the 2 assessed rows, not all 3
        assert!((design.rate - 0.5).abs() < f64::EPSILON);
    }
}

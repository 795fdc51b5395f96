//! Dual-engine screening with agreement checks
//!
//! Screens each paper with two independent engines and compares decisions.
//! Agreement between engines is evidence the decision is stable under model
//! choice; disagreement flags the paper for human review instead of letting
//! either engine win.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{Decision, Paper, ScreeningResult};
use crate::service::screening::{ScreeningService, ScreeningServiceError};

/// Outcome of screening one paper with both engines
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DualScreeningResult {
    pub paper_id: String,
    pub primary: ScreeningResult,
    pub secondary: ScreeningResult,
    /// Whether both engines reached the same decision
    pub agreement: bool,
    /// Decision after resolving the two engines' outputs
    pub consensus: Decision,
    /// Set when the consensus cannot be trusted without a human look
    pub needs_review: bool,
}

/// Aggregate agreement figures for a dual batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DualAgreementSummary {
    pub total: usize,
    pub agreed: usize,
    pub disagreed: usize,
    pub needs_review: usize,
    /// agreed / total, 0.0 for an empty batch
    pub agreement_rate: f64,
}

/// Screening service that runs both engines per paper
pub struct DualScreeningService {
    screening: Arc<ScreeningService>,
}

impl DualScreeningService {
    pub fn new(screening: Arc<ScreeningService>) -> Self {
        Self { screening }
    }

    /// Screen one paper with both engines and resolve a consensus
    pub async fn screen_paper(
        &self,
        paper: Paper,
    ) -> Result<DualScreeningResult, ScreeningServiceError> {
        let primary = self.screening.screen_paper(paper.clone()).await?;
        let secondary = self.screening.screen_paper_secondary(paper).await?;

        Ok(resolve(primary, secondary))
    }

    /// Screen a batch with both engines, returning per-paper results and an
    /// agreement summary
    pub async fn screen_batch(
        &self,
        papers: Vec<Paper>,
    ) -> Result<(Vec<DualScreeningResult>, DualAgreementSummary), ScreeningServiceError> {
        // Fails fast when no secondary engine exists rather than half-running
        if !self.screening.has_secondary_engine() {
            return Err(ScreeningServiceError::NoSecondaryEngine);
        }

        let mut results = Vec::with_capacity(papers.len());
        for paper in papers {
            results.push(self.screen_paper(paper).await?);
        }

        let summary = summarize(&results);
        tracing::info!(
            total = summary.total,
            agreed = summary.agreed,
            needs_review = summary.needs_review,
            agreement_rate = summary.agreement_rate,
            "Dual screening batch completed"
        );

        Ok((results, summary))
    }
}

/// Resolve two engine results into an agreement verdict and consensus.
///
/// Rules:
/// 1. Same decision: consensus is that decision; review only when it is
///    MAYBE or UNCERTAIN (agreement on ambiguity still needs a human).
/// 2. Exactly one engine UNCERTAIN: the other engine's decision stands,
///    flagged for review since only one assessment exists.
/// 3. Substantive disagreement: consensus MAYBE, flagged for review. A
///    unilateral EXCLUDE never drops a paper on its own.
pub fn resolve(primary: ScreeningResult, secondary: ScreeningResult) -> DualScreeningResult {
    let agreement = primary.decision == secondary.decision;

    let (consensus, needs_review) = if agreement {
        let ambiguous = matches!(primary.decision, Decision::Maybe | Decision::Uncertain);
        (primary.decision, ambiguous)
    } else {
        match (primary.decision, secondary.decision) {
            (Decision::Uncertain, other) | (other, Decision::Uncertain) => (other, true),
            _ => (Decision::Maybe, true),
        }
    };

    DualScreeningResult {
        paper_id: primary.paper_id.clone(),
        primary,
        secondary,
        agreement,
        consensus,
        needs_review,
    }
}

/// Compute the agreement summary for a set of dual results
pub fn summarize(results: &[DualScreeningResult]) -> DualAgreementSummary {
    let total = results.len();
    let agreed = results.iter().filter(|r| r.agreement).count();
    let needs_review = results.iter().filter(|r| r.needs_review).count();

    DualAgreementSummary {
        total,
        agreed,
        disagreed: total - agreed,
        needs_review,
        agreement_rate: if total == 0 {
            0.0
        } else {
            agreed as f64 / total as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(decision: Decision) -> ScreeningResult {
        ScreeningResult {
            paper_id: "p1".to_string(),
            decision,
            reasoning: "test".to_string(),
            criteria: None,
            dual_component: None,
            counts: None,
            extraction_error: None,
            model_used: "m".to_string(),
            screened_at: chrono::Utc::now(),
            processing_time_ms: 0,
        }
    }

    #[test]
    fn agreement_on_include_needs_no_review() {
        let r = resolve(result(Decision::Include), result(Decision::Include));
        assert!(r.agreement);
        assert_eq!(r.consensus, Decision::Include);
        assert!(!r.needs_review);
    }

    #[test]
    fn agreement_on_maybe_still_needs_review() {
        let r = resolve(result(Decision::Maybe), result(Decision::Maybe));
        assert!(r.agreement);
        assert_eq!(r.consensus, Decision::Maybe);
        assert!(r.needs_review);
    }

    #[test]
    fn include_exclude_conflict_resolves_to_maybe() {
        let r = resolve(result(Decision::Include), result(Decision::Exclude));
        assert!(!r.agreement);
        assert_eq!(r.consensus, Decision::Maybe);
        assert!(r.needs_review);
    }

    #[test]
    fn single_uncertain_defers_to_the_other_engine() {
        let r = resolve(result(Decision::Uncertain), result(Decision::Exclude));
        assert!(!r.agreement);
        assert_eq!(r.consensus, Decision::Exclude);
        assert!(r.needs_review);
    }

    #[test]
    fn summary_counts_and_rate() {
        let results = vec![
            resolve(result(Decision::Include), result(Decision::Include)),
            resolve(result(Decision::Exclude), result(Decision::Exclude)),
            resolve(result(Decision::Include), result(Decision::Exclude)),
            resolve(result(Decision::Maybe), result(Decision::Maybe)),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.agreed, 3);
        assert_eq!(summary.disagreed, 1);
        assert_eq!(summary.needs_review, 2);
        assert!((summary.agreement_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_batch_rate_is_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.agreement_rate, 0.0);
    }
}

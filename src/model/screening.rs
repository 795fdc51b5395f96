//! Screening decisions and the per-paper result record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::criteria::{Assessment, CriteriaMap};

/// Final screening decision for one paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Include,
    Exclude,
    Maybe,
    /// The assessment itself failed; no criteria were usable. Distinct from
    /// MAYBE, which means assessed with genuine ambiguity.
    Uncertain,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Include => "INCLUDE",
            Decision::Exclude => "EXCLUDE",
            Decision::Maybe => "MAYBE",
            Decision::Uncertain => "UNCERTAIN",
        }
    }

    pub fn from_str_value(value: &str) -> Option<Self> {
        match value {
            "INCLUDE" => Some(Decision::Include),
            "EXCLUDE" => Some(Decision::Exclude),
            "MAYBE" => Some(Decision::Maybe),
            "UNCERTAIN" => Some(Decision::Uncertain),
            _ => None,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessment tally over the base criteria (the derived flag is reported
/// separately, never counted twice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct AssessmentCounts {
    pub yes: usize,
    pub no: usize,
    pub unclear: usize,
}

impl std::fmt::Display for AssessmentCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Y/{}N/{}U", self.yes, self.no, self.unclear)
    }
}

/// One paper's screening outcome.
///
/// Created once per extraction; immutable after decision reduction. The
/// decision field is always fully explainable from `criteria` plus the
/// derived `dual_component` by the reducer's rule table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScreeningResult {
    pub paper_id: String,
    pub decision: Decision,
    /// Names the rule that fired and the criteria that triggered it
    pub reasoning: String,
    /// Empty when the extraction failed structurally (decision UNCERTAIN)
    pub criteria: Option<CriteriaMap>,
    /// Derived from the two component criteria; absent for UNCERTAIN results
    pub dual_component: Option<Assessment>,
    pub counts: Option<AssessmentCounts>,
    /// Error string from the extractor when decision is UNCERTAIN
    pub extraction_error: Option<String>,
    pub model_used: String,
    pub screened_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl ScreeningResult {
    /// Build the UNCERTAIN result for a structural extraction failure.
    ///
    /// Deliberately carries no criteria map: feeding a defaulted map through
    /// the reducer would collapse UNCERTAIN into MAYBE and hide extractor
    /// malfunction behind genuine ambiguity.
    pub fn extraction_failed(
        paper_id: &str,
        model_used: &str,
        error: &str,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            decision: Decision::Uncertain,
            reasoning: format!("UNCERTAIN: assessment failed, no criteria usable ({error})"),
            criteria: None,
            dual_component: None,
            counts: None,
            extraction_error: Some(error.to_string()),
            model_used: model_used.to_string(),
            screened_at: Utc::now(),
            processing_time_ms,
        }
    }
}

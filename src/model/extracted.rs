//! LLM-extractable criteria assessment structures
//!
//! These are the shapes the structured extractor fills in. Note what is
//! absent: there is no dual-component field (it is derived in code from the
//! two component criteria) and no final decision (the reducer owns that).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-criterion assessments extracted from a paper's title and abstract
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedCriteria {
    pub participants_lmic: ExtractedCriterion,

    pub component_a_cash_support: ExtractedCriterion,

    pub component_b_productive_assets: ExtractedCriterion,

    pub relevant_outcomes: ExtractedCriterion,

    pub study_design: ExtractedCriterion,

    /// Publication year is extracted, not judged; the >= 2004 cutoff is
    /// applied in code
    pub publication_year: ExtractedYear,

    pub completed_study: ExtractedCriterion,
}

/// One criterion's three-valued assessment with its supporting reasoning
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedCriterion {
    pub assessment: ExtractedAssessment,

    /// Evidence from the title/abstract supporting the assessment
    #[schemars(
        description = "Brief explanation citing the title or abstract text that supports the assessment. For NO, quote or paraphrase the text that contradicts the criterion."
    )]
    pub reasoning: String,
}

/// Closed assessment domain; anything else is a schema violation upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExtractedAssessment {
    Yes,
    No,
    Unclear,
}

/// Raw publication-year extraction
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedYear {
    /// Four-digit publication year as it appears in the record, or null when
    /// no year is stated
    #[schemars(description = "The four-digit publication year, or null if not stated")]
    pub year_extracted: Option<String>,

    #[schemars(description = "Where the year was found, or why it could not be determined")]
    pub reasoning: String,
}

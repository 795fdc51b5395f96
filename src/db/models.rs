//! Database models for screening results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::model::{Assessment, AssessmentCounts, CriteriaMap, Decision, ScreeningResult};

/// Database representation of a screening result
#[derive(Debug, Clone, FromRow)]
pub struct ScreeningResultRow {
    pub paper_id: String,
    pub decision: String,
    pub reasoning: String,
    pub dual_component: Option<String>,
    pub criteria: Option<serde_json::Value>,
    pub counts: Option<serde_json::Value>,
    pub extraction_error: Option<String>,
    pub model_used: String,
    pub screened_at: DateTime<Utc>,
    pub processing_time_ms: i64,
}

impl ScreeningResultRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<ScreeningResult, String> {
        let decision = Decision::from_str_value(&self.decision)
            .ok_or_else(|| format!("Unknown decision value: {}", self.decision))?;

        let dual_component = match self.dual_component.as_deref() {
            Some("YES") => Some(Assessment::Yes),
            Some("NO") => Some(Assessment::No),
            Some("UNCLEAR") => Some(Assessment::Unclear),
            Some(other) => return Err(format!("Unknown assessment value: {}", other)),
            None => None,
        };

        let criteria: Option<CriteriaMap> = match self.criteria {
            Some(value) => Some(
                serde_json::from_value(value).map_err(|e| format!("Invalid criteria JSON: {}", e))?,
            ),
            None => None,
        };

        let counts: Option<AssessmentCounts> = match self.counts {
            Some(value) => serde_json::from_value(value).ok(),
            None => None,
        };

        Ok(ScreeningResult {
            paper_id: self.paper_id,
            decision,
            reasoning: self.reasoning,
            criteria,
            dual_component,
            counts,
            extraction_error: self.extraction_error,
            model_used: self.model_used,
            screened_at: self.screened_at,
            processing_time_ms: self.processing_time_ms.max(0) as u64,
        })
    }
}

/// Query parameters for listing screening results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResultsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub decision: Option<Decision>,
}

/// Paginated response for screening results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResults {
    pub results: Vec<ScreeningResult>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

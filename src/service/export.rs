//! Export of screening results to CSV and a JSON results document

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::{Criterion, ScreeningResult};
use crate::service::stats::{compute_stats, ScreeningStats};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// Render screening results as CSV.
///
/// One row per paper: identity and decision columns first, then the
/// per-criterion assessment and reasoning pairs in canonical order, so the
/// file diffs cleanly between runs.
pub fn to_csv(results: &[ScreeningResult]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    let mut header = vec![
        "paper_id".to_string(),
        "decision".to_string(),
        "reasoning".to_string(),
        "dual_component".to_string(),
        "yes".to_string(),
        "no".to_string(),
        "unclear".to_string(),
    ];
    for criterion in Criterion::ALL {
        header.push(criterion.name().to_string());
        header.push(format!("{}_reasoning", criterion.name()));
    }
    header.extend([
        "extraction_error".to_string(),
        "model_used".to_string(),
        "screened_at".to_string(),
        "processing_time_ms".to_string(),
    ]);
    writer.write_record(&header)?;

    for result in results {
        let mut record = vec![
            result.paper_id.clone(),
            result.decision.to_string(),
            result.reasoning.clone(),
            result
                .dual_component
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
        ];

        match result.counts {
            Some(counts) => record.extend([
                counts.yes.to_string(),
                counts.no.to_string(),
                counts.unclear.to_string(),
            ]),
            None => record.extend([String::new(), String::new(), String::new()]),
        }

        for criterion in Criterion::ALL {
            match result.criteria.as_ref() {
                Some(criteria) => {
                    record.push(criteria.get(criterion).as_str().to_string());
                    record.push(criteria.reasoning(criterion).unwrap_or_default().to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }

        record.extend([
            result.extraction_error.clone().unwrap_or_default(),
            result.model_used.clone(),
            result.screened_at.to_rfc3339(),
            result.processing_time_ms.to_string(),
        ]);

        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Self-contained JSON results document for downstream analysis
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultsDocument {
    pub metadata: DocumentMetadata,
    pub summary: ScreeningStats,
    pub results: Vec<ScreeningResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentMetadata {
    pub generated_at: String,
    pub model: String,
    pub total_papers: usize,
}

/// Build the results document for a run
pub fn build_results_document(model: &str, results: Vec<ScreeningResult>) -> ResultsDocument {
    ResultsDocument {
        metadata: DocumentMetadata {
            generated_at: Utc::now().to_rfc3339(),
            model: model.to_string(),
            total_papers: results.len(),
        },
        summary: compute_stats(&results),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::criteria::{
        Assessment, CriteriaMap, CriterionAssessment, MissingCriterionPolicy,
    };
    use crate::model::Decision;

    fn full_result() -> ScreeningResult {
        let entries = Criterion::ALL
            .iter()
            .map(|&c| {
                (
                    c,
                    CriterionAssessment {
                        assessment: Assessment::Yes,
                        reasoning: "stated, with a comma".to_string(),
                    },
                )
            })
            .collect();
        let criteria = CriteriaMap::from_assessments(entries, MissingCriterionPolicy::Strict).unwrap();

        ScreeningResult {
            paper_id: "2019_abcd1234".to_string(),
            decision: Decision::Include,
            reasoning: "INCLUDE: all 7 criteria and derived dual_component assessed YES".to_string(),
            criteria: Some(criteria),
            dual_component: Some(Assessment::Yes),
            counts: Some(crate::model::AssessmentCounts {
                yes: 7,
                no: 0,
                unclear: 0,
            }),
            extraction_error: None,
            model_used: "gpt-4o-mini".to_string(),
            screened_at: chrono::Utc::now(),
            processing_time_ms: 1234,
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_result() {
        let csv = to_csv(&[full_result(), full_result()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("paper_id,decision,reasoning,dual_component"));
        assert!(lines[0].contains("participants_lmic,participants_lmic_reasoning"));
        assert!(lines[1].contains("2019_abcd1234"));
        assert!(lines[1].contains("INCLUDE"));
    }

    #[test]
    fn uncertain_rows_export_with_empty_criteria_columns() {
        let result = ScreeningResult::extraction_failed("p1", "gpt-4o-mini", "boom", 10);
        let csv = to_csv(&[result]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("UNCERTAIN"));
        assert!(lines[1].contains("boom"));
    }

    #[test]
    fn commas_in_reasoning_stay_in_one_field() {
        let csv = to_csv(&[full_result()]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), headers.len());
    }

    #[test]
    fn results_document_carries_summary() {
        let doc = build_results_document("gpt-4o-mini", vec![full_result()]);
        assert_eq!(doc.metadata.total_papers, 1);
        assert_eq!(doc.summary.include, 1);
        assert_eq!(doc.results.len(), 1);
    }
}

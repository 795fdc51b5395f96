//! Criteria extraction service using LLM
//!
//! Extracts structured per-criterion assessments from a paper's title and
//! abstract using rig-core. The extractor never assesses the derived
//! dual-component flag or the year cutoff; both are computed in code.

use rig::client::CompletionClient;

use crate::model::criteria::CriteriaMap;
use crate::model::extracted::ExtractedCriteria;
use crate::model::Paper;
use crate::service::llm::LlmClient;

pub mod converters;
pub mod corrections;
pub mod error;
pub mod prompts;
pub mod validation;

pub use error::ExtractionError;

use converters::convert_extracted;
use corrections::apply_asset_provision_correction;
use prompts::{build_screening_prompt, SCREENING_SYSTEM_PROMPT};
use validation::validate_criteria;

/// Service for extracting criteria assessments from paper records
#[derive(Clone)]
pub struct CriteriaExtractionService {
    llm_client: LlmClient,
    model: String,
}

impl CriteriaExtractionService {
    /// Create a new extraction service bound to one model
    pub fn new(llm_client: LlmClient, model: impl Into<String>) -> Self {
        let model = model.into();

        tracing::info!(model = %model, "Criteria extraction service initialized");

        Self { llm_client, model }
    }

    /// The model this engine queries
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Extract the criteria map for one paper.
    ///
    /// Returns a structural [`ExtractionError`] when no usable map could be
    /// produced; never a partially-defaulted map.
    pub async fn extract_criteria(&self, paper: &Paper) -> Result<CriteriaMap, ExtractionError> {
        let start_time = std::time::Instant::now();

        let prompt = build_screening_prompt(paper);
        let prompt_length = prompt.len();

        tracing::debug!(
            paper = %paper.paper_id,
            model = %self.model,
            prompt_length = prompt_length,
            "Initiating criteria extraction"
        );

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<ExtractedCriteria>(&self.model)
            .preamble(SCREENING_SYSTEM_PROMPT)
            .build();

        let extracted = match extractor.extract(&prompt).await {
            Ok(result) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    paper = %paper.paper_id,
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    "Criteria extraction completed"
                );
                result
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    paper = %paper.paper_id,
                    model = %self.model,
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "Criteria extraction failed"
                );
                return Err(ExtractionError::ExtractionFailed(e.to_string()));
            }
        };

        let mut criteria = convert_extracted(extracted)?;

        let validation = validate_criteria(&criteria);
        for warning in &validation.warnings {
            tracing::warn!(paper = %paper.paper_id, warning = %warning, "Extraction quality warning");
        }
        if !validation.is_valid {
            return Err(ExtractionError::ExtractionFailed(format!(
                "extracted criteria failed validation: {}",
                validation.errors.join("; ")
            )));
        }

        if apply_asset_provision_correction(&mut criteria) {
            tracing::info!(
                paper = %paper.paper_id,
                "Corrected productive-assets criterion (impact measurement, not provision)"
            );
        }

        Ok(criteria)
    }
}

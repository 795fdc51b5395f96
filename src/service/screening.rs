//! Screening pipeline orchestration
//!
//! Runs one paper through cache lookup, criteria extraction, decision
//! reduction, and persistence. Extraction failure is not an error at this
//! level: it produces an UNCERTAIN result so a batch never loses papers.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use thiserror::Error;

use crate::db::repository::ScreeningResultRepository;
use crate::db::DbError;
use crate::decision;
use crate::model::{Paper, ScreeningConfig, ScreeningResult};
use crate::service::cache::ScreeningCache;
use crate::service::cache_keys::generate_screening_cache_key;
use crate::service::extraction::CriteriaExtractionService;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScreeningServiceError {
    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("no secondary engine configured")]
    NoSecondaryEngine,
}

/// Orchestrates the screening pipeline for single papers and batches
pub struct ScreeningService {
    primary: CriteriaExtractionService,
    secondary: Option<CriteriaExtractionService>,
    repository: ScreeningResultRepository,
    cache: Option<ScreeningCache>,
    concurrency: usize,
}

impl ScreeningService {
    pub fn new(
        primary: CriteriaExtractionService,
        secondary: Option<CriteriaExtractionService>,
        repository: ScreeningResultRepository,
        cache: Option<ScreeningCache>,
        config: &ScreeningConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            repository,
            cache,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Model identifier of the primary engine
    pub fn primary_model(&self) -> &str {
        self.primary.model()
    }

    /// Whether a secondary engine is configured for dual runs
    pub fn has_secondary_engine(&self) -> bool {
        self.secondary.is_some()
    }

    /// Screen one paper with the primary engine and persist the result
    pub async fn screen_paper(&self, paper: Paper) -> Result<ScreeningResult, ScreeningServiceError> {
        let result = self.screen_with_engine(&self.primary, paper).await;
        self.repository.upsert(&result).await?;
        Ok(result)
    }

    /// Screen one paper with the secondary engine.
    ///
    /// The result is cached but never persisted: the database holds one row
    /// per paper, keyed to the primary engine's decision.
    pub async fn screen_paper_secondary(
        &self,
        paper: Paper,
    ) -> Result<ScreeningResult, ScreeningServiceError> {
        let engine = self
            .secondary
            .as_ref()
            .ok_or(ScreeningServiceError::NoSecondaryEngine)?;
        Ok(self.screen_with_engine(engine, paper).await)
    }

    /// Screen a batch of papers concurrently with the primary engine.
    ///
    /// Papers are processed independently; the output order matches the
    /// input order. Persistence failures are logged per paper rather than
    /// aborting the batch.
    pub async fn screen_batch(&self, papers: Vec<Paper>) -> Vec<ScreeningResult> {
        let total = papers.len();
        tracing::info!(
            total = total,
            concurrency = self.concurrency,
            model = %self.primary.model(),
            "Starting batch screening"
        );
        let started = Instant::now();

        let results: Vec<ScreeningResult> = stream::iter(papers)
            .map(|paper| async {
                let result = self.screen_with_engine(&self.primary, paper).await;
                if let Err(e) = self.repository.upsert(&result).await {
                    tracing::error!(
                        paper = %result.paper_id,
                        error = %e,
                        "Failed to persist screening result"
                    );
                }
                result
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        tracing::info!(
            total = total,
            elapsed_ms = started.elapsed().as_millis(),
            "Batch screening completed"
        );

        results
    }

    /// Run the full pipeline for one paper with a specific engine
    async fn screen_with_engine(
        &self,
        engine: &CriteriaExtractionService,
        mut paper: Paper,
    ) -> ScreeningResult {
        paper.ensure_id();
        let started = Instant::now();

        let cache_key = generate_screening_cache_key(&paper, engine.model());
        if let Some(cache) = &self.cache {
            if let Ok(cached) = cache.get_screening::<ScreeningResult>(&cache_key).await {
                tracing::debug!(paper = %paper.paper_id, "Screening cache hit");
                return cached;
            }
        }

        let result = match engine.extract_criteria(&paper).await {
            Ok(criteria) => {
                let reduction = decision::reduce(&criteria);
                tracing::info!(
                    paper = %paper.paper_id,
                    decision = %reduction.decision,
                    counts = %reduction.counts,
                    "Screening decision"
                );
                ScreeningResult {
                    paper_id: paper.paper_id.clone(),
                    decision: reduction.decision,
                    reasoning: reduction.reasoning,
                    criteria: Some(criteria),
                    dual_component: Some(reduction.dual_component),
                    counts: Some(reduction.counts),
                    extraction_error: None,
                    model_used: engine.model().to_string(),
                    screened_at: chrono::Utc::now(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                }
            }
            Err(e) => {
                tracing::warn!(
                    paper = %paper.paper_id,
                    error = %e,
                    "Extraction failed, recording UNCERTAIN"
                );
                ScreeningResult::extraction_failed(
                    &paper.paper_id,
                    engine.model(),
                    &e.to_string(),
                    started.elapsed().as_millis() as u64,
                )
            }
        };

        // Cache failures only cost the next lookup
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_screening(&cache_key, &result).await {
                tracing::warn!(paper = %result.paper_id, error = %e, "Failed to cache screening result");
            }
        }

        result
    }
}

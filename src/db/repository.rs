//! Repository for screening result database operations

use sqlx::PgPool;

use super::models::{ListResultsQuery, PaginatedResults, ScreeningResultRow};
use super::DbError;
use crate::model::ScreeningResult;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Repository for screening result operations
#[derive(Clone)]
pub struct ScreeningResultRepository {
    pool: PgPool,
}

impl ScreeningResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a screening result.
    ///
    /// Re-screening a paper replaces the stored row; paper_id is the key.
    pub async fn upsert(&self, result: &ScreeningResult) -> Result<(), DbError> {
        let criteria_json = result
            .criteria
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        let counts_json = result
            .counts
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        let dual_component = result.dual_component.map(|a| a.as_str());

        sqlx::query(
            r#"
            INSERT INTO screening_results (
                paper_id, decision, reasoning, dual_component,
                criteria, counts, extraction_error,
                model_used, screened_at, processing_time_ms
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (paper_id) DO UPDATE SET
                decision = EXCLUDED.decision,
                reasoning = EXCLUDED.reasoning,
                dual_component = EXCLUDED.dual_component,
                criteria = EXCLUDED.criteria,
                counts = EXCLUDED.counts,
                extraction_error = EXCLUDED.extraction_error,
                model_used = EXCLUDED.model_used,
                screened_at = EXCLUDED.screened_at,
                processing_time_ms = EXCLUDED.processing_time_ms
            "#,
        )
        .bind(&result.paper_id)
        .bind(result.decision.as_str())
        .bind(&result.reasoning)
        .bind(dual_component)
        .bind(&criteria_json)
        .bind(&counts_json)
        .bind(&result.extraction_error)
        .bind(&result.model_used)
        .bind(result.screened_at)
        .bind(result.processing_time_ms as i64)
        .execute(&self.pool)
        .await?;

        tracing::debug!(paper_id = %result.paper_id, "Upserted screening result");
        Ok(())
    }

    /// Get a screening result by paper ID
    pub async fn get_by_paper_id(&self, paper_id: &str) -> Result<ScreeningResult, DbError> {
        let row: ScreeningResultRow = sqlx::query_as(
            r#"
            SELECT * FROM screening_results WHERE paper_id = $1
            "#,
        )
        .bind(paper_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(paper_id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Delete a screening result by paper ID
    /// Returns true if the result was deleted, false if it didn't exist
    pub async fn delete(&self, paper_id: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM screening_results WHERE paper_id = $1
            "#,
        )
        .bind(paper_id)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(paper_id = %paper_id, "Deleted screening result");
        }

        Ok(deleted)
    }

    /// List screening results with pagination and an optional decision filter
    pub async fn list(&self, query: ListResultsQuery) -> Result<PaginatedResults, DbError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(100);
        let offset = (page - 1) * page_size;

        let where_clause = match query.decision {
            Some(_) => "WHERE decision = $1",
            None => "",
        };

        // Get total count
        let count_query = format!(
            "SELECT COUNT(*) as count FROM screening_results {}",
            where_clause
        );

        let total_count: i64 = {
            let mut q = sqlx::query_scalar(&count_query);
            if let Some(decision) = query.decision {
                q = q.bind(decision.as_str());
            }
            q.fetch_one(&self.pool).await?
        };

        // Get results
        let select_query = format!(
            r#"
            SELECT * FROM screening_results
            {}
            ORDER BY screened_at DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, page_size, offset
        );

        let rows: Vec<ScreeningResultRow> = {
            let mut q = sqlx::query_as(&select_query);
            if let Some(decision) = query.decision {
                q = q.bind(decision.as_str());
            }
            q.fetch_all(&self.pool).await?
        };

        let results: Vec<ScreeningResult> = rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect();

        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedResults {
            results,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }

    /// Fetch every stored result, for stats and export
    pub async fn list_all(&self) -> Result<Vec<ScreeningResult>, DbError> {
        let rows: Vec<ScreeningResultRow> = sqlx::query_as(
            r#"
            SELECT * FROM screening_results ORDER BY screened_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect())
    }
}

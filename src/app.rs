//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::ScreeningResultRepository;
use crate::model::Config;
use crate::service::{
    CriteriaExtractionService, DualScreeningService, LlmClient, ScreeningCache, ScreeningService,
};

/// Application state containing all services and shared resources
///
/// This struct centralizes service initialization and makes it easy to inject
/// dependencies into Actix-web handlers.
pub struct AppState {
    /// Database connection pool
    pub db_pool: Arc<PgPool>,
    /// Redis cache (optional)
    pub cache: Option<ScreeningCache>,
    /// Repository for stored screening results
    pub repository: ScreeningResultRepository,
    /// Screening pipeline service (primary engine)
    pub screening_service: Arc<ScreeningService>,
    /// Dual-engine screening service
    pub dual_service: Arc<DualScreeningService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Redis cache initialization (optional)
    /// 3. LLM client initialization (requires OPENAI_API_KEY)
    /// 4. Service dependency graph construction
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        // Initialize PostgreSQL database
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Initialize database schema
        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Initialize Redis cache (optional - will log warning if Redis is unavailable)
        let cache = match ScreeningCache::new().await {
            Ok(cache) => {
                tracing::info!("Redis cache enabled");
                Some(cache)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis cache unavailable, running without cache");
                None
            }
        };

        // Create shared LLM client (required)
        let llm_client = LlmClient::from_env().map_err(AppError::LlmInit)?;

        let repository = ScreeningResultRepository::new(db_pool.clone());

        let primary = CriteriaExtractionService::new(
            llm_client.clone(),
            config.screening.primary_model.clone(),
        );
        let secondary = config
            .screening
            .secondary_model
            .as_ref()
            .map(|model| CriteriaExtractionService::new(llm_client, model.clone()));

        let screening_service = Arc::new(ScreeningService::new(
            primary,
            secondary,
            repository.clone(),
            cache.clone(),
            &config.screening,
        ));

        let dual_service = Arc::new(DualScreeningService::new(Arc::clone(&screening_service)));

        Ok(Self {
            db_pool: Arc::new(db_pool),
            cache,
            repository,
            screening_service,
            dual_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// LLM client initialization failed
    #[error("LLM client initialization failed: {0}")]
    LlmInit(String),
}

//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use uuid::Uuid;

use crate::model::MalformedInputError;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Screening result not found (404)
    #[error("Screening result not found: {0}")]
    ScreeningNotFound(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Requested operation requires configuration the server lacks (409)
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ScreeningNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::ScreeningNotFound(_) => "screening_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotConfigured(_) => "not_configured",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<MalformedInputError> for ApiError {
    fn from(err: MalformedInputError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<crate::db::DbError> for ApiError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::NotFound(id) => ApiError::ScreeningNotFound(id),
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<crate::service::screening::ScreeningServiceError> for ApiError {
    fn from(err: crate::service::screening::ScreeningServiceError) -> Self {
        match err {
            crate::service::screening::ScreeningServiceError::Database(e) => {
                ApiError::Database(e.to_string())
            }
            crate::service::screening::ScreeningServiceError::NoSecondaryEngine => {
                ApiError::NotConfigured(
                    "dual screening requires a secondary_model in the screening config".to_string(),
                )
            }
        }
    }
}

impl From<crate::service::export::ExportError> for ApiError {
    fn from(err: crate::service::export::ExportError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

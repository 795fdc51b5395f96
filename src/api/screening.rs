//! REST API endpoints for paper screening

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::error::ApiError;
use crate::db::models::ListResultsQuery;
use crate::db::repository::ScreeningResultRepository;
use crate::decision::{self, Reduction};
use crate::model::criteria::CriteriaMap;
use crate::model::{Config, Decision, Paper, ScreeningResult};
use crate::service::dual::{DualAgreementSummary, DualScreeningResult, DualScreeningService};
use crate::service::export;
use crate::service::stats::{compute_stats, ScreeningStats};
use crate::service::ScreeningService;

/// Request body for screening a batch of papers
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScreenRequest {
    pub papers: Vec<Paper>,
}

/// Response for a screening run
#[derive(Debug, Serialize, ToSchema)]
pub struct ScreeningRunResponse {
    pub results: Vec<ScreeningResult>,
    pub summary: ScreeningStats,
    pub model: String,
}

/// Response for a dual-engine screening run
#[derive(Debug, Serialize, ToSchema)]
pub struct DualScreeningRunResponse {
    pub results: Vec<DualScreeningResult>,
    pub summary: DualAgreementSummary,
}

/// One criterion assessment as supplied by an API caller
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionCriterionInput {
    /// Criterion name, e.g. `participants_lmic`
    pub criterion: String,
    /// YES, NO or UNCLEAR
    pub assessment: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Request body for the reduce-only endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    pub criteria: Vec<DecisionCriterionInput>,
}

/// Query parameters for listing screening results
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListResultsParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub page_size: Option<u32>,
    /// Filter by decision (INCLUDE, EXCLUDE, MAYBE, UNCERTAIN)
    pub decision: Option<String>,
}

/// Paginated response for stored screening results
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultListResponse {
    pub results: Vec<ScreeningResult>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Screen a batch of papers with the primary engine
#[utoipa::path(
    post,
    path = "/v1/screenings",
    request_body = ScreenRequest,
    responses(
        (status = 200, description = "Papers screened", body = ScreeningRunResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[post("/v1/screenings")]
pub async fn screen_papers(
    service: web::Data<ScreeningService>,
    body: web::Json<ScreenRequest>,
) -> Result<HttpResponse, ApiError> {
    let papers = body.into_inner().papers;
    if papers.is_empty() {
        return Err(ApiError::BadRequest("papers must not be empty".to_string()));
    }

    let results = service.screen_batch(papers).await;
    let summary = compute_stats(&results);

    Ok(HttpResponse::Ok().json(ScreeningRunResponse {
        summary,
        model: service.primary_model().to_string(),
        results,
    }))
}

/// Screen a batch of papers with both engines and compare decisions
#[utoipa::path(
    post,
    path = "/v1/screenings/dual",
    request_body = ScreenRequest,
    responses(
        (status = 200, description = "Papers screened by both engines", body = DualScreeningRunResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "No secondary engine configured"),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[post("/v1/screenings/dual")]
pub async fn screen_papers_dual(
    service: web::Data<DualScreeningService>,
    body: web::Json<ScreenRequest>,
) -> Result<HttpResponse, ApiError> {
    let papers = body.into_inner().papers;
    if papers.is_empty() {
        return Err(ApiError::BadRequest("papers must not be empty".to_string()));
    }

    let (results, summary) = service.screen_batch(papers).await?;

    Ok(HttpResponse::Ok().json(DualScreeningRunResponse { results, summary }))
}

/// Reduce already-extracted criteria to a decision, without calling any model
#[utoipa::path(
    post,
    path = "/v1/decisions",
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision computed", body = Reduction),
        (status = 400, description = "Malformed criteria input")
    ),
    tag = "decisions"
)]
#[post("/v1/decisions")]
pub async fn compute_decision(
    config: web::Data<Config>,
    body: web::Json<DecisionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let raw = request.criteria.iter().map(|c| {
        (
            c.criterion.as_str(),
            c.assessment.as_str(),
            c.reasoning.as_deref().unwrap_or(""),
        )
    });

    let criteria = CriteriaMap::from_raw_entries(raw, config.screening.missing_criterion)?;
    let reduction = decision::reduce(&criteria);

    Ok(HttpResponse::Ok().json(reduction))
}

/// List stored screening results with pagination and an optional decision filter
#[utoipa::path(
    get,
    path = "/v1/screenings",
    params(ListResultsParams),
    responses(
        (status = 200, description = "Results retrieved", body = ResultListResponse),
        (status = 400, description = "Invalid decision filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[get("/v1/screenings")]
pub async fn list_screenings(
    repository: web::Data<ScreeningResultRepository>,
    query: web::Query<ListResultsParams>,
) -> Result<HttpResponse, ApiError> {
    let decision = match query.decision.as_deref() {
        Some(raw) => Some(Decision::from_str_value(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("unknown decision filter: {}", raw))
        })?),
        None => None,
    };

    let paginated = repository
        .list(ListResultsQuery {
            page: query.page,
            page_size: query.page_size,
            decision,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ResultListResponse {
        results: paginated.results,
        page: paginated.page,
        page_size: paginated.page_size,
        total_count: paginated.total_count,
        total_pages: paginated.total_pages,
    }))
}

/// Aggregate statistics over all stored screening results
#[utoipa::path(
    get,
    path = "/v1/screenings/stats",
    responses(
        (status = 200, description = "Statistics computed", body = ScreeningStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[get("/v1/screenings/stats")]
pub async fn screening_stats(
    repository: web::Data<ScreeningResultRepository>,
) -> Result<HttpResponse, ApiError> {
    let results = repository.list_all().await?;
    Ok(HttpResponse::Ok().json(compute_stats(&results)))
}

/// Export all stored screening results as CSV
#[utoipa::path(
    get,
    path = "/v1/screenings/export.csv",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv"),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[get("/v1/screenings/export.csv")]
pub async fn export_csv(
    repository: web::Data<ScreeningResultRepository>,
) -> Result<HttpResponse, ApiError> {
    let results = repository.list_all().await?;
    let csv = export::to_csv(&results)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"screening_results.csv\"",
        ))
        .body(csv))
}

/// Export all stored screening results as a self-contained JSON document
#[utoipa::path(
    get,
    path = "/v1/screenings/export.json",
    responses(
        (status = 200, description = "JSON results document", body = export::ResultsDocument),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[get("/v1/screenings/export.json")]
pub async fn export_json(
    service: web::Data<ScreeningService>,
    repository: web::Data<ScreeningResultRepository>,
) -> Result<HttpResponse, ApiError> {
    let results = repository.list_all().await?;
    let document = export::build_results_document(service.primary_model(), results);

    Ok(HttpResponse::Ok().json(document))
}

/// Get the stored screening result for one paper
#[utoipa::path(
    get,
    path = "/v1/screenings/{paper_id}",
    params(
        ("paper_id" = String, Path, description = "Paper identifier")
    ),
    responses(
        (status = 200, description = "Result retrieved", body = ScreeningResult),
        (status = 404, description = "Result not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[get("/v1/screenings/{paper_id}")]
pub async fn get_screening(
    repository: web::Data<ScreeningResultRepository>,
    path: web::Path<String>,
) -> impl Responder {
    let paper_id = path.into_inner();

    match repository.get_by_paper_id(&paper_id).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(crate::db::DbError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Screening result not found",
            "paper_id": paper_id
        })),
        Err(e) => {
            tracing::error!(error = %e, paper_id = %paper_id, "Failed to get screening result");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to get screening result",
                "message": e.to_string()
            }))
        }
    }
}

/// Delete the stored screening result for one paper
#[utoipa::path(
    delete,
    path = "/v1/screenings/{paper_id}",
    params(
        ("paper_id" = String, Path, description = "Paper identifier")
    ),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 404, description = "Result not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "screenings"
)]
#[actix_web::delete("/v1/screenings/{paper_id}")]
pub async fn delete_screening(
    repository: web::Data<ScreeningResultRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let paper_id = path.into_inner();

    if repository.delete(&paper_id).await? {
        tracing::info!(paper_id = %paper_id, "Screening result deleted");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::ScreeningNotFound(paper_id))
    }
}

/// OpenAPI documentation for the screening API
#[derive(OpenApi)]
#[openapi(
    paths(
        screen_papers,
        screen_papers_dual,
        compute_decision,
        list_screenings,
        screening_stats,
        export_csv,
        export_json,
        get_screening,
        delete_screening,
        crate::api::health::liveness,
        crate::api::health::readiness,
    ),
    components(schemas(
        ScreenRequest,
        ScreeningRunResponse,
        DualScreeningRunResponse,
        DecisionRequest,
        DecisionCriterionInput,
        ResultListResponse,
        Paper,
        ScreeningResult,
        Reduction,
        ScreeningStats,
        DualScreeningResult,
        DualAgreementSummary,
        crate::decision::AppliedRule,
        crate::model::Assessment,
        crate::model::Criterion,
        crate::model::CriteriaMap,
        crate::model::CriteriaEntry,
        crate::model::AssessmentCounts,
        crate::model::Decision,
        crate::service::stats::CriterionUnclearRate,
        export::ResultsDocument,
        export::DocumentMetadata,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth,
    )),
    tags(
        (name = "screenings", description = "Paper screening operations"),
        (name = "decisions", description = "Deterministic decision reduction"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Configure screening routes.
///
/// Fixed-path routes register before `/v1/screenings/{paper_id}` so "stats"
/// and "export.csv" are not captured as paper IDs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(screen_papers_dual)
        .service(screen_papers)
        .service(compute_decision)
        .service(screening_stats)
        .service(export_csv)
        .service(export_json)
        .service(list_screenings)
        .service(get_screening)
        .service(delete_screening);
}

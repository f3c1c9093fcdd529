use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnalysisId, AnalysisSubmission, PatientSubmission};
use super::repository::{AnalysisRepository, RepositoryError};
use super::service::{AnalysisService, AnalysisServiceError};

/// Optional `?limit=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing patient registration and analysis endpoints.
pub fn analysis_router<R>(service: Arc<AnalysisService<R>>) -> Router
where
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route(
            "/api/patients",
            get(list_patients_handler::<R>).post(create_patient_handler::<R>),
        )
        .route(
            "/api/analysis",
            get(list_analyses_handler::<R>).post(create_analysis_handler::<R>),
        )
        .route("/api/analysis/:analysis_id", get(get_analysis_handler::<R>))
        .with_state(service)
}

pub(crate) async fn create_patient_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    axum::Json(submission): axum::Json<PatientSubmission>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match run_blocking(move || service.create_patient(submission)).await {
        Ok(patient) => (StatusCode::OK, axum::Json(patient)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_patients_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match run_blocking(move || service.list_patients(query.limit)).await {
        Ok(patients) => (StatusCode::OK, axum::Json(patients)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_analysis_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    axum::Json(submission): axum::Json<AnalysisSubmission>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match run_blocking(move || service.create_analysis(submission)).await {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_analyses_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match run_blocking(move || service.list_analyses(query.limit)).await {
        Ok(analyses) => (StatusCode::OK, axum::Json(analyses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_analysis_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    let id = AnalysisId(analysis_id);
    match run_blocking(move || service.get_analysis(&id)).await {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Store calls may block on disk I/O; keep them off the async workers.
async fn run_blocking<T, F>(task: F) -> Result<T, AnalysisServiceError>
where
    F: FnOnce() -> Result<T, AnalysisServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|join_error| {
        AnalysisServiceError::Repository(RepositoryError::Unavailable(join_error.to_string()))
    })?
}

/// Status mapping for every service failure, shared with `AppError`.
pub(crate) fn error_response(error: AnalysisServiceError) -> Response {
    if error.is_not_found() {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "analysis not found" })),
        )
            .into_response();
    }

    let status = match &error {
        AnalysisServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AnalysisServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{Answers, Condition, DiagnosticError};
use super::registry::DiagnosticService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub condition: String,
    pub answers: Answers,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingRequest {
    pub answers: Answers,
    #[serde(default)]
    pub follow_ups: BTreeMap<Condition, Answers>,
}

/// Router builder exposing quiz retrieval and analysis endpoints.
pub fn diagnostics_router(service: Arc<DiagnosticService>) -> Router {
    Router::new()
        .route("/api/v1/quiz/:condition", get(quiz_handler))
        .route("/api/v1/analyze", post(analyze_handler))
        .route("/api/v1/analyze/report", post(report_handler))
        .route("/api/v1/screening/route", post(route_handler))
        .with_state(service)
}

pub(crate) async fn quiz_handler(
    State(service): State<Arc<DiagnosticService>>,
    Path(condition): Path<String>,
) -> Response {
    match service.quiz(&condition) {
        Ok(quiz) => (StatusCode::OK, axum::Json(quiz)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<DiagnosticService>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response {
    match service.analyze(&request.condition, &request.answers) {
        Ok(lines) => {
            let payload = json!({
                "condition": request.condition,
                "analysis": lines,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler(
    State(service): State<Arc<DiagnosticService>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response {
    match service.report(&request.condition, &request.answers) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn route_handler(
    State(service): State<Arc<DiagnosticService>>,
    axum::Json(request): axum::Json<RoutingRequest>,
) -> Response {
    match service.route(&request.answers, &request.follow_ups) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

/// HTTP status for a diagnostic failure. Client mistakes map to 4xx; broken
/// models or chain wiring map to 500.
pub fn status_for(error: &DiagnosticError) -> StatusCode {
    match error {
        DiagnosticError::UnknownCondition(_) => StatusCode::NOT_FOUND,
        DiagnosticError::MissingEvidence { .. }
        | DiagnosticError::InvalidAnswer { .. }
        | DiagnosticError::UnmappedEvidenceCode { .. }
        | DiagnosticError::NotRedirectable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DiagnosticError::FactAlreadyDeclared(_)
        | DiagnosticError::FactKind { .. }
        | DiagnosticError::NotPrimed(_)
        | DiagnosticError::StageOutOfOrder(_)
        | DiagnosticError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(error: DiagnosticError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!(%error, "diagnostic run failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

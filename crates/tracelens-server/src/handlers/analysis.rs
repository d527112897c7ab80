//! Performance analysis handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use tracelens_core::analysis::{AnalysisResult, WorkflowAnalysis};
use tracelens_core::ids::WorkflowId;

use crate::error::ApiError;
use crate::handlers::traces::parse_execution_id;
use crate::schema::common::ApiResponse;
use crate::state::AppState;

/// `GET /traces/{id}/analysis`
pub async fn trace_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiError> {
    let execution_id = parse_execution_id(&id)?;
    let result = state.analyzer.analyze_execution(&execution_id)?;
    Ok(Json(ApiResponse::ok(result)))
}

/// `GET /workflows/{id}/analysis`
pub async fn workflow_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WorkflowAnalysis>>, ApiError> {
    let workflow_id = Uuid::parse_str(&id).map(WorkflowId).map_err(|_| {
        ApiError::BadRequest(format!("invalid workflow id '{id}': expected UUID"))
    })?;
    let analysis = state.analyzer.analyze_workflow(&workflow_id)?;
    Ok(Json(ApiResponse::ok(analysis)))
}

//! Visualization handlers: flow diagrams, token reports, decision trees.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::handlers::traces::lookup_trace;
use crate::schema::common::ApiResponse;
use crate::schema::visualization::{DecisionsResponse, FlowDiagram, TokenReport};
use crate::state::AppState;

/// `GET /traces/{id}/flow`
pub async fn trace_flow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FlowDiagram>>, ApiError> {
    let trace = lookup_trace(&state, &id)?;
    Ok(Json(ApiResponse::ok(FlowDiagram::from_trace(&trace))))
}

/// `GET /traces/{id}/tokens`
pub async fn trace_tokens(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TokenReport>>, ApiError> {
    let trace = lookup_trace(&state, &id)?;
    Ok(Json(ApiResponse::ok(TokenReport::from_trace(&trace))))
}

/// `GET /traces/{id}/decisions`
pub async fn trace_decisions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DecisionsResponse>>, ApiError> {
    let trace = lookup_trace(&state, &id)?;
    Ok(Json(ApiResponse::ok(DecisionsResponse {
        execution_id: trace.execution_id,
        decisions: trace.decisions,
    })))
}

//! Trace query handlers.

use axum::extract::{Path, Query, State};
use axum::Json;

use tracelens_core::ids::ExecutionId;
use tracelens_core::store::TraceFilter;
use tracelens_core::trace::ExecutionTrace;
use uuid::Uuid;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::traces::{ListTracesParams, ListTracesResponse, TraceSummary};
use crate::state::AppState;

pub(crate) fn parse_execution_id(raw: &str) -> Result<ExecutionId, ApiError> {
    Uuid::parse_str(raw)
        .map(ExecutionId)
        .map_err(|_| ApiError::BadRequest(format!("invalid execution id '{raw}': expected UUID")))
}

pub(crate) fn lookup_trace(
    state: &AppState,
    raw_id: &str,
) -> Result<ExecutionTrace, ApiError> {
    let id = parse_execution_id(raw_id)?;
    state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("trace {id} not found")))
}

/// `GET /traces`
pub async fn list_traces(
    State(state): State<AppState>,
    Query(params): Query<ListTracesParams>,
) -> Result<Json<ApiResponse<ListTracesResponse>>, ApiError> {
    let filter = TraceFilter {
        agent_name: params.agent_name,
        status: params.status,
        limit: params.limit,
    };
    let traces: Vec<TraceSummary> = state
        .store
        .list(&filter)
        .iter()
        .map(TraceSummary::from)
        .collect();
    let total = traces.len();
    Ok(Json(ApiResponse::ok(ListTracesResponse { traces, total })))
}

/// `GET /traces/{id}`
pub async fn get_trace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExecutionTrace>>, ApiError> {
    let trace = lookup_trace(&state, &id)?;
    Ok(Json(ApiResponse::ok(trace)))
}

//! Breakpoint registration and lifecycle handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use tracelens_core::debug::Breakpoint;
use tracelens_core::ids::BreakpointId;
use tracelens_engine::BreakpointSpec;

use crate::error::ApiError;
use crate::schema::breakpoints::{
    ListBreakpointsResponse, RemoveBreakpointResponse, UpdateBreakpointRequest,
};
use crate::schema::common::ApiResponse;
use crate::state::AppState;

fn parse_breakpoint_id(id: &str) -> Result<BreakpointId, ApiError> {
    Uuid::parse_str(id)
        .map(BreakpointId)
        .map_err(|_| ApiError::BadRequest(format!("invalid breakpoint id '{id}': expected UUID")))
}

/// `POST /breakpoints`
pub async fn create_breakpoint(
    State(state): State<AppState>,
    Json(spec): Json<BreakpointSpec>,
) -> Result<Json<ApiResponse<Breakpoint>>, ApiError> {
    let breakpoint = state.engine.add_breakpoint(spec)?;
    Ok(Json(ApiResponse::ok(breakpoint)))
}

/// `GET /breakpoints`
pub async fn list_breakpoints(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ListBreakpointsResponse>>, ApiError> {
    let mut breakpoints = state.engine.list_breakpoints();
    breakpoints.sort_by_key(|b| b.created_at);
    let total = breakpoints.len();
    Ok(Json(ApiResponse::ok(ListBreakpointsResponse {
        breakpoints,
        total,
    })))
}

/// `PATCH /breakpoints/{id}`
pub async fn update_breakpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBreakpointRequest>,
) -> Result<Json<ApiResponse<Breakpoint>>, ApiError> {
    let breakpoint_id = parse_breakpoint_id(&id)?;
    let breakpoint = state
        .engine
        .set_breakpoint_enabled(&breakpoint_id, req.enabled)
        .ok_or_else(|| ApiError::NotFound(format!("breakpoint {breakpoint_id} not found")))?;
    Ok(Json(ApiResponse::ok(breakpoint)))
}

/// `DELETE /breakpoints/{id}`
pub async fn remove_breakpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RemoveBreakpointResponse>>, ApiError> {
    let breakpoint_id = parse_breakpoint_id(&id)?;
    let removed = state.engine.remove_breakpoint(&breakpoint_id);
    Ok(Json(ApiResponse::ok(RemoveBreakpointResponse {
        breakpoint_id,
        removed,
    })))
}

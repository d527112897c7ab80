//! Watch expression handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use tracelens_core::debug::WatchExpression;
use tracelens_core::ids::WatchId;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::watches::{
    CreateWatchRequest, ListWatchesResponse, RemoveWatchResponse, UpdateWatchRequest,
};
use crate::state::AppState;

fn parse_watch_id(id: &str) -> Result<WatchId, ApiError> {
    Uuid::parse_str(id)
        .map(WatchId)
        .map_err(|_| ApiError::BadRequest(format!("invalid watch id '{id}': expected UUID")))
}

/// `POST /watches`
pub async fn create_watch(
    State(state): State<AppState>,
    Json(req): Json<CreateWatchRequest>,
) -> Result<Json<ApiResponse<WatchExpression>>, ApiError> {
    let watch = state.engine.add_watch(&req.expression)?;
    Ok(Json(ApiResponse::ok(watch)))
}

/// `GET /watches`
pub async fn list_watches(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ListWatchesResponse>>, ApiError> {
    let watches = state.engine.list_watches();
    let total = watches.len();
    Ok(Json(ApiResponse::ok(ListWatchesResponse { watches, total })))
}

/// `PATCH /watches/{id}`
pub async fn update_watch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateWatchRequest>,
) -> Result<Json<ApiResponse<WatchExpression>>, ApiError> {
    let watch_id = parse_watch_id(&id)?;
    let watch = state
        .engine
        .set_watch_enabled(&watch_id, req.enabled)
        .ok_or_else(|| ApiError::NotFound(format!("watch {watch_id} not found")))?;
    Ok(Json(ApiResponse::ok(watch)))
}

/// `DELETE /watches/{id}`
pub async fn remove_watch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RemoveWatchResponse>>, ApiError> {
    let watch_id = parse_watch_id(&id)?;
    let removed = state.engine.remove_watch(&watch_id);
    Ok(Json(ApiResponse::ok(RemoveWatchResponse { watch_id, removed })))
}

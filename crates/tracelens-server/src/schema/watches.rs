//! Watch expression endpoint types.

use serde::{Deserialize, Serialize};

use tracelens_core::debug::WatchExpression;
use tracelens_core::ids::WatchId;

/// Request body for `POST /watches`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWatchRequest {
    pub expression: String,
}

/// Request body for `PATCH /watches/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWatchRequest {
    pub enabled: bool,
}

/// Response body for `GET /watches`.
#[derive(Debug, Clone, Serialize)]
pub struct ListWatchesResponse {
    pub watches: Vec<WatchExpression>,
    pub total: usize,
}

/// Response body for `DELETE /watches/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveWatchResponse {
    pub watch_id: WatchId,
    pub removed: bool,
}

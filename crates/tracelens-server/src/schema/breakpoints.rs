//! Breakpoint endpoint types.
//!
//! Registration reuses [`tracelens_engine::BreakpointSpec`] directly as the
//! request body.

use serde::{Deserialize, Serialize};

use tracelens_core::debug::Breakpoint;
use tracelens_core::ids::BreakpointId;

/// Request body for `PATCH /breakpoints/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBreakpointRequest {
    pub enabled: bool,
}

/// Response body for `GET /breakpoints`.
#[derive(Debug, Clone, Serialize)]
pub struct ListBreakpointsResponse {
    pub breakpoints: Vec<Breakpoint>,
    pub total: usize,
}

/// Response body for `DELETE /breakpoints/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveBreakpointResponse {
    pub breakpoint_id: BreakpointId,
    pub removed: bool,
}

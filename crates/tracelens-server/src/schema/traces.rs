//! Trace listing and retrieval types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tracelens_core::ids::{ExecutionId, WorkflowId};
use tracelens_core::trace::{ExecutionStatus, ExecutionTrace};

/// Query parameters for `GET /traces`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTracesParams {
    pub agent_name: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub limit: Option<usize>,
}

/// Compact trace row for listings; the full trace is fetched by id.
#[derive(Debug, Clone, Serialize)]
pub struct TraceSummary {
    pub execution_id: ExecutionId,
    pub workflow_id: WorkflowId,
    pub agent_name: String,
    pub task_description: String,
    pub status: ExecutionStatus,
    pub step_count: usize,
    pub duration_ms: f64,
    pub total_tokens: u64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&ExecutionTrace> for TraceSummary {
    fn from(trace: &ExecutionTrace) -> Self {
        TraceSummary {
            execution_id: trace.execution_id,
            workflow_id: trace.workflow_id,
            agent_name: trace.agent_name.clone(),
            task_description: trace.task_description.clone(),
            status: trace.status,
            step_count: trace.steps.len(),
            duration_ms: trace.performance.duration_ms,
            total_tokens: trace.token_usage.total_tokens,
            started_at: trace.started_at,
            completed_at: trace.completed_at,
        }
    }
}

/// Response body for `GET /traces`.
#[derive(Debug, Clone, Serialize)]
pub struct ListTracesResponse {
    pub traces: Vec<TraceSummary>,
    pub total: usize,
}

//! Analyzer error types.

use thiserror::Error;

use tracelens_core::ids::{ExecutionId, WorkflowId};

/// Errors produced by analyzer lookups.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The referenced trace is unknown or was evicted.
    #[error("trace not found: {0}")]
    TraceNotFound(ExecutionId),

    /// No traces exist for the referenced workflow.
    #[error("workflow has no traces: {0}")]
    WorkflowNotFound(WorkflowId),
}

//! Error types for the breakpoint engine and instrumentation adapter.

use thiserror::Error;

use tracelens_core::ids::ExecutionId;
use tracelens_expr::EvalError;

/// Errors from breakpoint/watch registration and step-session management.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configured maximum was reached; the caller must reduce usage
    /// before retrying.
    #[error("capacity exceeded: {kind} limit of {limit} reached")]
    CapacityExceeded { kind: &'static str, limit: usize },

    /// A condition was supplied while conditional breakpoints are off.
    #[error("conditional breakpoints are disabled")]
    FeatureDisabled,

    /// The condition/expression failed to parse at registration time.
    #[error("invalid expression: {0}")]
    InvalidExpression(#[from] EvalError),

    /// No advisory step session exists for this execution.
    #[error("no step session for execution {0}")]
    NoStepSession(ExecutionId),
}

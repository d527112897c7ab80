//! Core error types for tracelens-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! failure modes in the shared trace data model and store.

use thiserror::Error;

use crate::ids::{BreakpointId, ExecutionId, SessionId, WatchId};

/// Core errors produced by the tracelens-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A trace was not found (possibly evicted by the retention sweep).
    #[error("trace not found: {0}")]
    TraceNotFound(ExecutionId),

    /// A breakpoint ID was not found.
    #[error("breakpoint not found: {0}")]
    BreakpointNotFound(BreakpointId),

    /// A watch expression ID was not found.
    #[error("watch expression not found: {0}")]
    WatchNotFound(WatchId),

    /// A session ID was not found.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// Attempted to mutate a trace whose status is terminal.
    #[error("trace {0} is immutable (terminal status)")]
    TraceImmutable(ExecutionId),
}

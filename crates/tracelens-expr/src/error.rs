//! Evaluation error types with trap semantics.
//!
//! Every failure mode of parsing or evaluating a condition/watch expression
//! is a distinct variant. Callers treat all of them as "condition not met"
//! or "skip this watch" rather than propagating; none are fatal to the
//! engine.

use serde::{Deserialize, Serialize};

/// Errors produced by the expression parser and evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum EvalError {
    #[error("parse error at position {pos}: {message}")]
    Parse { pos: usize, message: String },

    #[error("unknown identifier: '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown field '{field}' in path '{path}'")]
    UnknownField { path: String, field: String },

    #[error("type mismatch: cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        op: String,
        lhs: String,
        rhs: String,
    },

    #[error("divide by zero")]
    DivideByZero,

    #[error("evaluation exceeded wall-clock deadline")]
    Timeout,

    #[error("evaluation exceeded node budget ({limit})")]
    Budget { limit: u64 },

    #[error("expression nesting exceeds depth limit ({limit})")]
    DepthLimit { limit: usize },
}

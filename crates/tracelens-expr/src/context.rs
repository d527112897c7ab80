//! Restricted evaluation context assembled from trace state.
//!
//! [`EvalContext`] is the *only* namespace an expression can see: a record
//! built from trace, step, performance, and token data plus the user-defined
//! variables captured during execution. There is no process, global, or
//! filesystem access to deny because none exists in the first place.

use serde_json::{json, Map, Value as Json};

use tracelens_core::trace::{ExecutionStep, ExecutionTrace};

use crate::error::EvalError;
use crate::value::Value;

/// The context record expressions resolve identifiers against.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    root: Map<String, Json>,
}

impl EvalContext {
    /// Builds the context for evaluating conditions/watches at a step
    /// boundary.
    pub fn for_step(trace: &ExecutionTrace, step: &ExecutionStep) -> Self {
        let mut root = Map::new();
        root.insert("execution_id".into(), json!(trace.execution_id));
        root.insert("agent".into(), json!(trace.agent_name));
        root.insert("task".into(), json!(trace.task_description));
        root.insert("status".into(), json!(trace.status));
        root.insert("step_count".into(), json!(trace.steps.len()));
        root.insert(
            "step".into(),
            json!({
                "name": step.name,
                "index": step.index,
                "kind": step.kind,
                "status": step.status,
                "duration_ms": step.duration_ms,
                "memory_bytes": step.resources.memory_bytes,
                "cpu_percent": step.resources.cpu_percent,
            }),
        );
        root.insert(
            "performance".into(),
            json!({
                "duration_ms": trace.performance.duration_ms,
                "cpu_time_ms": trace.performance.cpu_time_ms,
                "memory_peak": trace.performance.memory.peak_bytes,
                "memory_average": trace.performance.memory.average_bytes,
                "cache_hit_ratio": trace.performance.cache_hit_ratio,
            }),
        );
        root.insert(
            "tokens".into(),
            json!({
                "prompt": trace.token_usage.prompt_tokens,
                "completion": trace.token_usage.completion_tokens,
                "total": trace.token_usage.total_tokens,
                "context_size": trace.token_usage.context_size,
            }),
        );
        root.insert(
            "variables".into(),
            Json::Object(trace.variables.clone().into_iter().collect()),
        );
        EvalContext { root }
    }

    /// Builds a context from an arbitrary record (used by tests and the
    /// watch preview endpoint).
    pub fn from_map(root: Map<String, Json>) -> Self {
        EvalContext { root }
    }

    /// Resolves a dot-path into the record.
    ///
    /// An unknown root name is `UnknownIdentifier`; an unknown nested field
    /// is `UnknownField` carrying the full path for diagnostics.
    pub fn resolve(&self, path: &[String]) -> Result<Value, EvalError> {
        let first = path
            .first()
            .ok_or_else(|| EvalError::UnknownIdentifier(String::new()))?;
        let mut current = self
            .root
            .get(first)
            .ok_or_else(|| EvalError::UnknownIdentifier(first.clone()))?;

        for field in &path[1..] {
            current = match current {
                Json::Object(map) => map.get(field).ok_or_else(|| EvalError::UnknownField {
                    path: path.join("."),
                    field: field.clone(),
                })?,
                _ => {
                    return Err(EvalError::UnknownField {
                        path: path.join("."),
                        field: field.clone(),
                    });
                }
            };
        }

        Ok(Value::from_json(current))
    }
}

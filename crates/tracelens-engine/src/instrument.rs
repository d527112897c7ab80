//! Instrumentation adapter wrapping an external execution host.
//!
//! [`Instrumenter`] brackets a single "run a task" call: it opens a trace,
//! emits synthetic preparation/execution/validation steps around the host
//! call, consults the breakpoint engine at the start of execution, and
//! closes the trace with success or failure. A host failure still closes
//! the trace as `failed` with the error recorded, so no trace is ever left
//! permanently `running`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tracelens_core::event::{DebugEvent, EventBus};
use tracelens_core::ids::{ExecutionId, WorkflowId};
use tracelens_core::store::TraceStore;
use tracelens_core::trace::{
    ExecutionError, ExecutionStatus, ExecutionStep, ExecutionTrace, StepKind, StepStatus,
    TokenUsage,
};

use crate::breakpoints::{BreakDecision, BreakpointEngine};

/// A task to be delegated to the execution host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub workflow_id: WorkflowId,
    pub agent_name: String,
    pub task_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ExecutionId>,
    /// User-defined variables made visible to conditions and watches.
    #[serde(default)]
    pub variables: std::collections::HashMap<String, serde_json::Value>,
}

/// Metrics record returned by the execution host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HostMetrics {
    pub duration_ms: f64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub context_size: u64,
    pub peak_memory_bytes: u64,
}

/// Successful host result: an output payload plus metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostOutcome {
    pub output: serde_json::Value,
    pub metrics: HostMetrics,
}

/// Host-side failure, carried into the trace's terminal error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("host execution failed: {message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }
}

/// The external collaborator that actually runs tasks.
///
/// The adapter requires nothing beyond this single call.
#[async_trait]
pub trait ExecutionHost: Send + Sync {
    async fn run(&self, task: &TaskRequest) -> Result<HostOutcome, HostError>;
}

/// Result of one instrumented host call.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentedOutcome {
    pub execution_id: ExecutionId,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
    /// The breakpoint decision surfaced before delegation, if any matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_decision: Option<BreakDecision>,
}

/// Thin hook layer between the execution host and the debug subsystem.
pub struct Instrumenter {
    store: Arc<TraceStore>,
    engine: Arc<BreakpointEngine>,
    events: Arc<EventBus>,
}

impl Instrumenter {
    pub fn new(
        store: Arc<TraceStore>,
        engine: Arc<BreakpointEngine>,
        events: Arc<EventBus>,
    ) -> Self {
        Instrumenter {
            store,
            engine,
            events,
        }
    }

    /// Runs a task through the host with full trace instrumentation.
    pub async fn run<H: ExecutionHost>(
        &self,
        host: &H,
        request: TaskRequest,
    ) -> InstrumentedOutcome {
        let mut trace = ExecutionTrace::new(
            request.workflow_id,
            request.agent_name.clone(),
            request.task_description.clone(),
        );
        trace.parent_id = request.parent_id;
        trace.variables = request.variables.clone();
        let execution_id = trace.execution_id;

        self.store.insert(trace.clone());
        self.events.publish(DebugEvent::TraceStarted {
            trace: Box::new(trace),
        });

        let started = Instant::now();

        // Preparation bracket.
        self.record_step(&execution_id, "preparation", StepKind::Preparation, |step| {
            step.finish(StepStatus::Completed, 0.0);
        });

        // Start-of-execution breakpoint check, surfaced before delegating.
        let exec_step = ExecutionStep::new("execution", StepKind::Execution);
        let break_decision = self
            .store
            .get(&execution_id)
            .map(|trace| self.engine.should_break(&trace, &exec_step));
        let break_decision = break_decision.filter(|d| d.should_break);

        let exec_started = Instant::now();
        let host_result = host.run(&request).await;
        let exec_ms = exec_started.elapsed().as_secs_f64() * 1000.0;

        match host_result {
            Ok(outcome) => {
                self.record_step(&execution_id, "execution", StepKind::Execution, |step| {
                    step.finish(StepStatus::Completed, exec_ms);
                    step.output_summary = Some(summarize(&outcome.output));
                });
                self.record_step(&execution_id, "validation", StepKind::Validation, |step| {
                    step.finish(StepStatus::Completed, 0.0);
                });
                self.close_trace(&execution_id, started, Some(&outcome.metrics), None);
                InstrumentedOutcome {
                    execution_id,
                    status: ExecutionStatus::Completed,
                    output: Some(outcome.output),
                    error: None,
                    break_decision,
                }
            }
            Err(err) => {
                let error = ExecutionError::new(err.message.clone());
                self.record_step(&execution_id, "execution", StepKind::Execution, |step| {
                    step.finish(StepStatus::Failed, exec_ms);
                    step.error = Some(ExecutionError::new(err.message.clone()));
                });
                self.close_trace(&execution_id, started, None, Some(error.clone()));
                InstrumentedOutcome {
                    execution_id,
                    status: ExecutionStatus::Failed,
                    output: None,
                    error: Some(error),
                    break_decision,
                }
            }
        }
    }

    /// Appends a synthetic step, evaluates watches against it, and emits
    /// `trace:step-added`.
    fn record_step<F>(&self, execution_id: &ExecutionId, name: &str, kind: StepKind, finish: F)
    where
        F: FnOnce(&mut ExecutionStep),
    {
        let mut step = ExecutionStep::new(name, kind);
        finish(&mut step);

        let appended = self.store.mutate(execution_id, |trace| {
            let idx = trace.push_step(step.clone());
            trace.steps[idx].clone()
        });
        let Ok(appended) = appended else {
            // Terminal or evicted trace; nothing to record against.
            return;
        };

        if let Some(trace) = self.store.get(execution_id) {
            self.engine.evaluate_watches(&trace, &appended);
        }
        self.events.publish(DebugEvent::StepAdded {
            execution_id: *execution_id,
            step: appended,
        });
    }

    /// Closes the trace with final status and metrics and emits
    /// `trace:completed`. This runs on both success and failure paths.
    fn close_trace(
        &self,
        execution_id: &ExecutionId,
        started: Instant,
        metrics: Option<&HostMetrics>,
        error: Option<ExecutionError>,
    ) {
        let total_ms = started.elapsed().as_secs_f64() * 1000.0;
        let failed = error.is_some();

        let result = self.store.mutate(execution_id, |trace| {
            trace.performance.duration_ms = if let Some(m) = metrics {
                if m.duration_ms > 0.0 {
                    m.duration_ms
                } else {
                    total_ms
                }
            } else {
                total_ms
            };
            if let Some(m) = metrics {
                trace.performance.memory.peak_bytes = m.peak_memory_bytes;
                trace.token_usage = TokenUsage {
                    prompt_tokens: m.prompt_tokens,
                    completion_tokens: m.completion_tokens,
                    total_tokens: m.prompt_tokens + m.completion_tokens,
                    context_size: m.context_size,
                };
            }
            trace.error = error.clone();
            trace.completed_at = Some(chrono::Utc::now());
            trace.status = if failed {
                ExecutionStatus::Failed
            } else {
                ExecutionStatus::Completed
            };
        });

        if result.is_err() {
            tracing::warn!(execution = %execution_id, "trace vanished before close");
            return;
        }
        if let Some(trace) = self.store.get(execution_id) {
            self.events.publish(DebugEvent::TraceCompleted {
                trace: Box::new(trace),
            });
        }
    }
}

/// Byte budget for step output summaries.
const SUMMARY_MAX_BYTES: usize = 120;

/// Compact summary of a JSON payload for data-dependency checks.
///
/// serde_json emits non-ASCII characters unescaped, so the cut point must
/// land on a char boundary.
fn summarize(value: &serde_json::Value) -> String {
    let text = value.to_string();
    if text.len() <= SUMMARY_MAX_BYTES {
        return text;
    }
    let mut end = SUMMARY_MAX_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

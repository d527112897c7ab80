//! Execution trace data model: traces, steps, and their lifecycle metadata.
//!
//! An [`ExecutionTrace`] records the full history of one task execution.
//! Traces are created when an execution begins, mutated only through the
//! instrumentation layer, and become immutable once their status reaches a
//! terminal state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ExecutionId, WorkflowId};
use crate::metrics::{PerformanceMetrics, ResourceUsage};

/// Lifecycle status of an execution trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
    Paused,
    Cancelled,
}

impl ExecutionStatus {
    /// Terminal statuses freeze the trace: no further mutation is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }
}

/// Phase classification of a step within a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Preparation,
    Execution,
    Validation,
    Cleanup,
}

/// Status of an individual step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Completed,
    Failed,
    Skipped,
}

/// A nested sub-operation within a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubStep {
    pub name: String,
    pub duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One bracketed phase within a trace.
///
/// Steps are appended in index order and never removed individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub index: usize,
    pub name: String,
    pub kind: StepKind,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_ms: f64,
    pub resources: ResourceUsage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_steps: Vec<SubStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
    /// Summary of the step's input, used for data-dependency checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_summary: Option<String>,
    /// Summary of the step's output, used for data-dependency checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_summary: Option<String>,
}

/// Token consumption summary for an execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub context_size: u64,
}

/// One option considered at a decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub label: String,
    pub score: f64,
}

/// A recorded decision point within an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    pub id: String,
    pub description: String,
    pub options: Vec<DecisionOption>,
    /// Index into `options` of the chosen branch.
    pub chosen: usize,
    pub timestamp: DateTime<Utc>,
}

/// A recorded error, attached to a step or terminal trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        ExecutionError {
            message: message.into(),
            kind: None,
            timestamp: Utc::now(),
        }
    }
}

/// The recorded history of one task execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub execution_id: ExecutionId,
    pub workflow_id: WorkflowId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ExecutionId>,
    /// Name of the agent driving this execution.
    pub agent_name: String,
    pub task_description: String,
    pub status: ExecutionStatus,
    pub steps: Vec<ExecutionStep>,
    pub performance: PerformanceMetrics,
    pub token_usage: TokenUsage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<DecisionNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// User-defined variables captured during execution, available to
    /// breakpoint conditions and watch expressions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, serde_json::Value>,
}

impl ExecutionTrace {
    /// Creates a new running trace for the given agent and task.
    pub fn new(
        workflow_id: WorkflowId,
        agent_name: impl Into<String>,
        task_description: impl Into<String>,
    ) -> Self {
        ExecutionTrace {
            execution_id: ExecutionId::new(),
            workflow_id,
            parent_id: None,
            agent_name: agent_name.into(),
            task_description: task_description.into(),
            status: ExecutionStatus::Running,
            steps: Vec::new(),
            performance: PerformanceMetrics::default(),
            token_usage: TokenUsage::default(),
            decisions: Vec::new(),
            error: None,
            started_at: Utc::now(),
            completed_at: None,
            variables: HashMap::new(),
        }
    }

    /// Appends a step, assigning it the next index.
    pub fn push_step(&mut self, mut step: ExecutionStep) -> usize {
        step.index = self.steps.len();
        let idx = step.index;
        self.steps.push(step);
        idx
    }

    /// Returns the mean step duration in milliseconds, or 0.0 for an
    /// empty trace.
    pub fn mean_step_duration_ms(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let total: f64 = self.steps.iter().map(|s| s.duration_ms).sum();
        total / self.steps.len() as f64
    }
}

impl ExecutionStep {
    /// Creates a new running step. The index is assigned on append.
    pub fn new(name: impl Into<String>, kind: StepKind) -> Self {
        ExecutionStep {
            index: 0,
            name: name.into(),
            kind,
            status: StepStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
            duration_ms: 0.0,
            resources: ResourceUsage::default(),
            sub_steps: Vec::new(),
            error: None,
            input_summary: None,
            output_summary: None,
        }
    }

    /// Marks the step finished with the given status and duration.
    pub fn finish(&mut self, status: StepStatus, duration_ms: f64) {
        self.status = status;
        self.duration_ms = duration_ms;
        self.ended_at = Some(Utc::now());
    }
}

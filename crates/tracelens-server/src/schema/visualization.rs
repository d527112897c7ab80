//! Visualization payloads: flow diagrams, token reports, and decisions.

use serde::Serialize;

use tracelens_core::ids::ExecutionId;
use tracelens_core::trace::{
    DecisionNode, ExecutionTrace, StepKind, StepStatus, TokenUsage,
};

/// One node of the execution flow diagram, styled by its step status.
#[derive(Debug, Clone, Serialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub kind: StepKind,
    pub status: StepStatus,
    pub duration_ms: f64,
    /// Rendering hint derived from status.
    pub style: &'static str,
}

/// A directed edge between consecutive flow nodes.
#[derive(Debug, Clone, Serialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
}

/// Ordered flow diagram of one execution.
#[derive(Debug, Clone, Serialize)]
pub struct FlowDiagram {
    pub execution_id: ExecutionId,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

fn style_for(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Running => "active",
        StepStatus::Completed => "solid",
        StepStatus::Failed => "error",
        StepStatus::Skipped => "muted",
    }
}

impl FlowDiagram {
    /// Builds the ordered node/edge list from a trace's steps.
    pub fn from_trace(trace: &ExecutionTrace) -> Self {
        let nodes: Vec<FlowNode> = trace
            .steps
            .iter()
            .map(|step| FlowNode {
                id: format!("step-{}", step.index),
                label: step.name.clone(),
                kind: step.kind,
                status: step.status,
                duration_ms: step.duration_ms,
                style: style_for(step.status),
            })
            .collect();
        let edges = nodes
            .windows(2)
            .map(|pair| FlowEdge {
                from: pair[0].id.clone(),
                to: pair[1].id.clone(),
            })
            .collect();
        FlowDiagram {
            execution_id: trace.execution_id,
            nodes,
            edges,
        }
    }
}

/// Token usage report for one execution.
#[derive(Debug, Clone, Serialize)]
pub struct TokenReport {
    pub execution_id: ExecutionId,
    pub usage: TokenUsage,
    /// Share of the prompt in total tokens, in [0, 1].
    pub prompt_share: f64,
    /// Share of the completion in total tokens, in [0, 1].
    pub completion_share: f64,
    /// Context window fill ratio, when the context size is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_utilization: Option<f64>,
}

impl TokenReport {
    pub fn from_trace(trace: &ExecutionTrace) -> Self {
        let usage = trace.token_usage;
        let total = usage.total_tokens as f64;
        let (prompt_share, completion_share) = if usage.total_tokens == 0 {
            (0.0, 0.0)
        } else {
            (
                usage.prompt_tokens as f64 / total,
                usage.completion_tokens as f64 / total,
            )
        };
        let context_utilization = (usage.context_size > 0)
            .then(|| usage.prompt_tokens as f64 / usage.context_size as f64);
        TokenReport {
            execution_id: trace.execution_id,
            usage,
            prompt_share,
            completion_share,
            context_utilization,
        }
    }
}

/// Decision points recorded for one execution.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionsResponse {
    pub execution_id: ExecutionId,
    pub decisions: Vec<DecisionNode>,
}

//! Shared debug event model and the broadcast event bus.
//!
//! State-changing components publish [`DebugEvent`]s onto an [`EventBus`];
//! the broadcast server forwards them to connected observer sessions. Events
//! carry their execution scope so the server can filter per-subscription
//! rather than relying on client-side filtering.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::analysis::AnalysisResult;
use crate::debug::Breakpoint;
use crate::ids::{BreakpointId, ExecutionId};
use crate::metrics::Bottleneck;
use crate::trace::{ExecutionStep, ExecutionTrace};

/// A state-change notification published on the event bus.
///
/// Serializes as `{"type": "...", "data": {...}}` with camelCase payload
/// fields, matching the server's wire envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DebugEvent {
    #[serde(rename = "trace:started")]
    TraceStarted { trace: Box<ExecutionTrace> },

    #[serde(rename = "trace:step-added", rename_all = "camelCase")]
    StepAdded {
        execution_id: ExecutionId,
        step: ExecutionStep,
    },

    #[serde(rename = "trace:completed")]
    TraceCompleted { trace: Box<ExecutionTrace> },

    #[serde(rename = "breakpoint:hit", rename_all = "camelCase")]
    BreakpointHit {
        execution_id: ExecutionId,
        breakpoint: Box<Breakpoint>,
        step_name: String,
        reason: String,
    },

    #[serde(rename = "breakpoint:set")]
    BreakpointSet { breakpoint: Box<Breakpoint> },

    #[serde(rename = "breakpoint:removed", rename_all = "camelCase")]
    BreakpointRemoved { breakpoint_id: BreakpointId },

    #[serde(rename = "performance:bottleneck-detected", rename_all = "camelCase")]
    BottleneckDetected {
        execution_id: ExecutionId,
        bottleneck: Bottleneck,
    },

    #[serde(rename = "performance:low-score", rename_all = "camelCase")]
    LowScore {
        execution_id: ExecutionId,
        result: Box<AnalysisResult>,
    },
}

impl DebugEvent {
    /// Returns the execution this event is scoped to, if any.
    ///
    /// Scoped events are delivered only to sessions subscribed to that
    /// execution; unscoped events (breakpoint lifecycle) go to everyone.
    pub fn execution_scope(&self) -> Option<ExecutionId> {
        match self {
            DebugEvent::TraceStarted { trace } => Some(trace.execution_id),
            DebugEvent::StepAdded { execution_id, .. } => Some(*execution_id),
            DebugEvent::TraceCompleted { trace } => Some(trace.execution_id),
            DebugEvent::BreakpointHit { execution_id, .. } => Some(*execution_id),
            DebugEvent::BottleneckDetected { execution_id, .. } => Some(*execution_id),
            DebugEvent::LowScore { execution_id, .. } => Some(*execution_id),
            DebugEvent::BreakpointSet { .. } | DebugEvent::BreakpointRemoved { .. } => None,
        }
    }

    /// Wire name of the event type, matching the serde tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            DebugEvent::TraceStarted { .. } => "trace:started",
            DebugEvent::StepAdded { .. } => "trace:step-added",
            DebugEvent::TraceCompleted { .. } => "trace:completed",
            DebugEvent::BreakpointHit { .. } => "breakpoint:hit",
            DebugEvent::BreakpointSet { .. } => "breakpoint:set",
            DebugEvent::BreakpointRemoved { .. } => "breakpoint:removed",
            DebugEvent::BottleneckDetected { .. } => "performance:bottleneck-detected",
            DebugEvent::LowScore { .. } => "performance:low-score",
        }
    }
}

/// Broadcast fan-out bus for [`DebugEvent`]s.
///
/// Thin wrapper over `tokio::sync::broadcast`: publishing never blocks, and
/// a publish with no live subscribers is not an error. Slow subscribers that
/// fall behind the channel capacity observe `Lagged` and miss events rather
/// than stalling publishers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DebugEvent>,
}

impl EventBus {
    /// Creates a bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers the event was delivered to.
    pub fn publish(&self, event: DebugEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Opens a new subscription starting at the current stream position.
    pub fn subscribe(&self) -> broadcast::Receiver<DebugEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        // Enough headroom for bursty step emission across many executions.
        EventBus::new(1024)
    }
}

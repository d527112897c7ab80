//! Debug entity data model: breakpoints, watch expressions, and sessions.
//!
//! Breakpoints and watch expressions outlive any individual trace. A
//! [`DebugSession`] owns nothing but its own subscription set; the traces and
//! breakpoints it references are shared, session-independent state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BreakpointId, ExecutionId, SessionId, WatchId};

/// A registered rule that flags a step as worth suspending on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub name: String,
    /// Match only steps belonging to this agent, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    /// Match only steps with this name, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    /// Boolean condition; absence means "always break".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub enabled: bool,
    pub hit_count: u64,
    /// Once `hit_count` reaches this cap, the breakpoint self-disables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hits: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_hit_at: Option<DateTime<Utc>>,
}

/// A registered rule that records a computed value at each step without
/// suspending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchExpression {
    pub id: WatchId,
    pub expression: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_at: Option<DateTime<Utc>>,
    pub evaluation_count: u64,
}

/// Rendering mode requested by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    Flow,
    Timeline,
    Tree,
}

/// Per-session visualization preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    pub mode: VisualizationMode,
    /// Detail level in [1, 3]; higher means more verbose rendering.
    pub detail_level: u8,
    /// Whether the client view should auto-follow the newest trace.
    pub auto_follow: bool,
    pub show_metrics: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        VisualizationConfig {
            mode: VisualizationMode::Flow,
            detail_level: 2,
            auto_follow: true,
            show_metrics: true,
        }
    }
}

/// Partial update to a [`VisualizationConfig`]; unset fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<VisualizationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_follow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_metrics: Option<bool>,
}

impl VisualizationConfig {
    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: &VisualizationConfigPatch) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(level) = patch.detail_level {
            self.detail_level = level.clamp(1, 3);
        }
        if let Some(follow) = patch.auto_follow {
            self.auto_follow = follow;
        }
        if let Some(show) = patch.show_metrics {
            self.show_metrics = show;
        }
    }
}

/// One connected observer's subscription and preference state.
///
/// Subscriptions reference traces by id and must tolerate the referenced
/// trace being evicted (lookup returns "not found", never a dangling
/// reference).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSession {
    pub session_id: SessionId,
    pub subscribed: HashSet<ExecutionId>,
    pub owned_breakpoints: HashSet<BreakpointId>,
    pub visualization: VisualizationConfig,
    pub connected_at: DateTime<Utc>,
}

impl DebugSession {
    pub fn new(session_id: SessionId) -> Self {
        DebugSession {
            session_id,
            subscribed: HashSet::new(),
            owned_breakpoints: HashSet::new(),
            visualization: VisualizationConfig::default(),
            connected_at: Utc::now(),
        }
    }
}

/// Advisory step-through command consumed by a cooperating execution host.
///
/// These are signals, not OS-level suspension: the engine never pauses a
/// thread itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepCommand {
    Run,
    StepOver,
    StepInto,
    Pause,
    Stop,
}

//! Analyzer output data model: analysis results, baselines, and trends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ExecutionId, WorkflowId};
use crate::metrics::{Bottleneck, OptimizationSuggestion, Severity, SuggestionKind};

/// Direction of change relative to a baseline or over a trend window.
///
/// For the metrics tracked here, lower is better: an increasing metric is
/// `Degrading`, a decreasing one `Improving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Improving,
    Degrading,
    Stable,
}

/// Per-metric comparison against the rolling per-agent baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub metric: String,
    pub baseline_value: f64,
    pub current_value: f64,
    /// Percent improvement versus baseline; positive means better (lower).
    pub improvement_pct: f64,
    pub direction: ChangeDirection,
}

/// Direction and strength of change of one metric over the sliding window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendInfo {
    pub metric: String,
    pub direction: ChangeDirection,
    /// Relative slope magnitude clamped to [0, 1].
    pub strength: f64,
    pub sample_count: usize,
}

/// One entry of the ranked action list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedAction {
    pub priority: Severity,
    pub kind: SuggestionKind,
    pub description: String,
    pub estimated_impact_ms: f64,
}

/// Aggregate impact estimate across all suggested actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub duration_reduction_ms: f64,
    pub resource_saving_pct: f64,
    /// Rough cost-saving proxy derived from duration and resource savings.
    pub cost_saving_proxy: f64,
    /// Reliability bump contributed by resource-allocation suggestions.
    pub reliability_bump: f64,
}

/// A cached, timestamped snapshot of one analyzer run for one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub execution_id: ExecutionId,
    pub agent_name: String,
    pub analyzed_at: DateTime<Utc>,
    /// Overall score in [0, 100]; penalized per bottleneck.
    pub performance_score: f64,
    /// Mean of token efficiency and memory efficiency, in [0, 100].
    pub efficiency_score: f64,
    /// 100 completed, 0 failed, 50 otherwise; -20 when an error is present.
    pub reliability_score: f64,
    pub bottlenecks: Vec<Bottleneck>,
    pub suggestions: Vec<OptimizationSuggestion>,
    pub baseline: Vec<BaselineComparison>,
    pub trends: Vec<TrendInfo>,
    pub actions: Vec<PrioritizedAction>,
    pub impact: ImpactEstimate,
}

/// Workflow-level aggregate over per-trace analysis results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAnalysis {
    pub workflow_id: WorkflowId,
    pub trace_count: usize,
    pub mean_performance_score: f64,
    pub mean_efficiency_score: f64,
    pub mean_reliability_score: f64,
    /// Bottlenecks deduplicated by (kind, severity).
    pub bottlenecks: Vec<Bottleneck>,
    /// Suggestions deduplicated by kind, preferring higher priority.
    pub suggestions: Vec<OptimizationSuggestion>,
    /// Set when multiple traces in the workflow have no declared dependency
    /// on each other and could run concurrently.
    pub sequential_execution_opportunity: bool,
}

//! Performance metrics, bottleneck findings, and optimization suggestions.
//!
//! [`PerformanceMetrics`] is the aggregate measurement record attached to a
//! trace. [`Bottleneck`] and [`OptimizationSuggestion`] are always derived by
//! the analyzer, never hand-authored.

use serde::{Deserialize, Serialize};

/// A point-in-time resource usage sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub memory_bytes: u64,
    pub io_read_ops: u64,
    pub io_write_ops: u64,
}

/// Memory usage summary for a whole execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub peak_bytes: u64,
    pub average_bytes: u64,
    pub final_bytes: u64,
}

/// I/O activity counters for a whole execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IoCounters {
    pub reads: u64,
    pub writes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Aggregate performance measurements for a trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub duration_ms: f64,
    pub cpu_time_ms: f64,
    pub memory: MemoryUsage,
    pub io: IoCounters,
    /// Ratio of cache hits in [0, 1] observed during the execution.
    pub cache_hit_ratio: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bottlenecks: Vec<Bottleneck>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<OptimizationSuggestion>,
}

/// Classification of a detected bottleneck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleneckKind {
    Cpu,
    Memory,
    Io,
    Network,
    Wait,
    Duration,
    Token,
}

/// Severity scale shared by bottlenecks and suggestion priorities.
///
/// `Ord` ranks `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Where in the trace a bottleneck was located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    /// Offset from trace start, in milliseconds.
    pub start_offset_ms: f64,
    pub end_offset_ms: f64,
}

/// A detected performance problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub kind: BottleneckKind,
    pub severity: Severity,
    pub location: BottleneckLocation,
    /// Estimated time impact in milliseconds.
    pub estimated_impact_ms: f64,
    pub suggestions: Vec<String>,
}

/// Category of an optimization suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    Caching,
    Parallelization,
    Algorithm,
    ResourceAllocation,
}

/// Qualitative effort or risk level for applying a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

/// A derived optimization opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub kind: SuggestionKind,
    pub priority: Severity,
    pub description: String,
    pub estimated_duration_reduction_ms: f64,
    /// Estimated resource saving as a percentage in [0, 100].
    pub estimated_resource_saving_pct: f64,
    pub effort: EffortLevel,
    pub risk: EffortLevel,
}

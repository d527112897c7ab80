pub mod analysis;
pub mod debug;
pub mod error;
pub mod event;
pub mod ids;
pub mod metrics;
pub mod store;
pub mod trace;

// Re-export commonly used types
pub use analysis::{
    AnalysisResult, BaselineComparison, ChangeDirection, ImpactEstimate, PrioritizedAction,
    TrendInfo, WorkflowAnalysis,
};
pub use debug::{
    Breakpoint, DebugSession, StepCommand, VisualizationConfig, VisualizationConfigPatch,
    VisualizationMode, WatchExpression,
};
pub use error::CoreError;
pub use event::{DebugEvent, EventBus};
pub use ids::{BreakpointId, ExecutionId, SessionId, WatchId, WorkflowId};
pub use metrics::{
    Bottleneck, BottleneckKind, BottleneckLocation, EffortLevel, IoCounters, MemoryUsage,
    OptimizationSuggestion, PerformanceMetrics, ResourceUsage, Severity, SuggestionKind,
};
pub use store::{TraceFilter, TraceStore};
pub use trace::{
    DecisionNode, DecisionOption, ExecutionError, ExecutionStatus, ExecutionStep, ExecutionTrace,
    StepKind, StepStatus, SubStep, TokenUsage,
};

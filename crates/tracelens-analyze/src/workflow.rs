//! Workflow-level aggregation over per-trace analysis results.

use tracelens_core::analysis::WorkflowAnalysis;
use tracelens_core::ids::WorkflowId;
use tracelens_core::metrics::{Bottleneck, OptimizationSuggestion};
use tracelens_core::store::TraceFilter;
use tracelens_core::trace::ExecutionTrace;

use crate::analyzer::PerformanceAnalyzer;
use crate::error::AnalyzeError;

impl PerformanceAnalyzer {
    /// Analyzes every trace belonging to `workflow_id` and aggregates the
    /// per-trace results into one workflow view.
    ///
    /// Mean scores are unweighted. Bottlenecks are deduplicated by
    /// `(kind, severity)` and suggestions by kind, keeping the
    /// highest-priority instance of each.
    pub fn analyze_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<WorkflowAnalysis, AnalyzeError> {
        let traces: Vec<ExecutionTrace> = self
            .store
            .list(&TraceFilter::default())
            .into_iter()
            .filter(|t| t.workflow_id == *workflow_id)
            .collect();
        if traces.is_empty() {
            return Err(AnalyzeError::WorkflowNotFound(*workflow_id));
        }

        let results: Vec<_> = traces.iter().map(|t| self.analyze_trace(t)).collect();
        let n = results.len() as f64;

        let mut bottlenecks: Vec<Bottleneck> = Vec::new();
        for candidate in results.iter().flat_map(|r| r.bottlenecks.iter()) {
            let seen = bottlenecks
                .iter()
                .any(|b| b.kind == candidate.kind && b.severity == candidate.severity);
            if !seen {
                bottlenecks.push(candidate.clone());
            }
        }

        let mut suggestions: Vec<OptimizationSuggestion> = Vec::new();
        for candidate in results.iter().flat_map(|r| r.suggestions.iter()) {
            match suggestions.iter_mut().find(|s| s.kind == candidate.kind) {
                Some(existing) => {
                    if candidate.priority > existing.priority {
                        *existing = candidate.clone();
                    }
                }
                None => suggestions.push(candidate.clone()),
            }
        }

        Ok(WorkflowAnalysis {
            workflow_id: *workflow_id,
            trace_count: traces.len(),
            mean_performance_score: results.iter().map(|r| r.performance_score).sum::<f64>() / n,
            mean_efficiency_score: results.iter().map(|r| r.efficiency_score).sum::<f64>() / n,
            mean_reliability_score: results.iter().map(|r| r.reliability_score).sum::<f64>() / n,
            bottlenecks,
            suggestions,
            sequential_execution_opportunity: sequential_opportunity(&traces),
        })
    }
}

/// True when the workflow ran more than one trace and none of them declares
/// another trace in the set as its parent. Independent siblings executed in
/// sequence could have run concurrently.
fn sequential_opportunity(traces: &[ExecutionTrace]) -> bool {
    if traces.len() < 2 {
        return false;
    }
    !traces.iter().any(|t| {
        t.parent_id
            .map(|p| traces.iter().any(|other| other.execution_id == p))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracelens_core::event::EventBus;
    use tracelens_core::store::TraceStore;
    use tracelens_core::trace::ExecutionStatus;

    use super::*;
    use crate::config::AnalyzerConfig;

    fn setup() -> (PerformanceAnalyzer, Arc<TraceStore>) {
        let store = Arc::new(TraceStore::new());
        let analyzer = PerformanceAnalyzer::new(
            AnalyzerConfig::default(),
            Arc::clone(&store),
            Arc::new(EventBus::new(64)),
        );
        (analyzer, store)
    }

    fn trace_for(workflow_id: WorkflowId, agent: &str) -> ExecutionTrace {
        let mut trace = ExecutionTrace::new(workflow_id, agent, "task");
        trace.status = ExecutionStatus::Completed;
        trace.performance.cache_hit_ratio = 1.0;
        trace
    }

    #[test]
    fn unknown_workflow_errors() {
        let (analyzer, _store) = setup();
        let err = analyzer
            .analyze_workflow(&WorkflowId::new())
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::WorkflowNotFound(_)));
    }

    #[test]
    fn aggregates_scores_and_counts() {
        let (analyzer, store) = setup();
        let workflow_id = WorkflowId::new();
        store.insert(trace_for(workflow_id, "a"));
        store.insert(trace_for(workflow_id, "b"));
        // Different workflow, must be excluded.
        store.insert(trace_for(WorkflowId::new(), "c"));

        let analysis = analyzer.analyze_workflow(&workflow_id).unwrap();
        assert_eq!(analysis.trace_count, 2);
        assert_eq!(analysis.mean_reliability_score, 100.0);
    }

    #[test]
    fn dedupes_bottlenecks_by_kind_and_severity() {
        let (analyzer, store) = setup();
        let workflow_id = WorkflowId::new();
        for agent in ["a", "b"] {
            let mut trace = trace_for(workflow_id, agent);
            trace.performance.duration_ms = 150_000.0;
            store.insert(trace);
        }

        let analysis = analyzer.analyze_workflow(&workflow_id).unwrap();
        let duration_count = analysis
            .bottlenecks
            .iter()
            .filter(|b| b.kind == tracelens_core::metrics::BottleneckKind::Duration)
            .count();
        assert_eq!(duration_count, 1);
    }

    #[test]
    fn independent_siblings_flag_sequential_opportunity() {
        let (analyzer, store) = setup();
        let workflow_id = WorkflowId::new();
        store.insert(trace_for(workflow_id, "a"));
        store.insert(trace_for(workflow_id, "b"));

        let analysis = analyzer.analyze_workflow(&workflow_id).unwrap();
        assert!(analysis.sequential_execution_opportunity);
    }

    #[test]
    fn parent_child_traces_do_not_flag_sequential_opportunity() {
        let (analyzer, store) = setup();
        let workflow_id = WorkflowId::new();
        let parent = trace_for(workflow_id, "a");
        let parent_id = parent.execution_id;
        let mut child = trace_for(workflow_id, "b");
        child.parent_id = Some(parent_id);
        store.insert(parent);
        store.insert(child);

        let analysis = analyzer.analyze_workflow(&workflow_id).unwrap();
        assert!(!analysis.sequential_execution_opportunity);
    }

    #[test]
    fn single_trace_has_no_sequential_opportunity() {
        let (analyzer, store) = setup();
        let workflow_id = WorkflowId::new();
        store.insert(trace_for(workflow_id, "a"));
        let analysis = analyzer.analyze_workflow(&workflow_id).unwrap();
        assert!(!analysis.sequential_execution_opportunity);
    }
}

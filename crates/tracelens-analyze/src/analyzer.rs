//! The performance analyzer: bottleneck detection, optimization
//! suggestions, scoring, baselines, trends, and the TTL'd result cache.
//!
//! `analyze_trace` is idempotent for an unchanged trace within the cache
//! TTL: a fresh cached result is returned verbatim (bumping the hit
//! counter) and neither baselines nor trend windows are touched. Results
//! are cached only once fully computed; a failed analysis caches nothing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use tracelens_core::analysis::{
    AnalysisResult, ImpactEstimate, PrioritizedAction, TrendInfo,
};
use tracelens_core::event::{DebugEvent, EventBus};
use tracelens_core::ids::ExecutionId;
use tracelens_core::metrics::{
    Bottleneck, BottleneckKind, BottleneckLocation, EffortLevel, OptimizationSuggestion,
    Severity, SuggestionKind,
};
use tracelens_core::store::TraceStore;
use tracelens_core::trace::{ExecutionStatus, ExecutionTrace};

use crate::baseline::BaselineTracker;
use crate::cache::{AnalysisCache, CacheMetrics};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::trend::TrendTracker;

/// Performance score below which a `performance:low-score` event is
/// emitted.
const LOW_SCORE_FLOOR: f64 = 60.0;

/// Detects bottlenecks and derives suggestions, scores, baselines, and
/// trends for execution traces.
pub struct PerformanceAnalyzer {
    config: AnalyzerConfig,
    pub(crate) store: Arc<TraceStore>,
    pub(crate) cache: AnalysisCache,
    baselines: BaselineTracker,
    trends: TrendTracker,
    events: Arc<EventBus>,
}

impl PerformanceAnalyzer {
    pub fn new(config: AnalyzerConfig, store: Arc<TraceStore>, events: Arc<EventBus>) -> Self {
        let cache = AnalysisCache::new(config.cache_ttl);
        let baselines = BaselineTracker::new(config.baseline_alpha);
        let trends = TrendTracker::new(config.trend_window);
        PerformanceAnalyzer {
            config,
            store,
            cache,
            baselines,
            trends,
            events,
        }
    }

    /// Analyzes a trace by execution id.
    pub fn analyze_execution(&self, id: &ExecutionId) -> Result<AnalysisResult, AnalyzeError> {
        let trace = self
            .store
            .get(id)
            .ok_or(AnalyzeError::TraceNotFound(*id))?;
        Ok(self.analyze_trace(&trace))
    }

    /// Runs the full analysis pipeline for one trace.
    pub fn analyze_trace(&self, trace: &ExecutionTrace) -> AnalysisResult {
        if let Some(cached) = self.cache.get(&trace.execution_id, &trace.agent_name) {
            return cached;
        }

        let bottlenecks = self.detect_bottlenecks(trace);
        let suggestions = self.generate_suggestions(trace, &bottlenecks);
        let performance_score = performance_score(&bottlenecks, trace.performance.cache_hit_ratio);
        let efficiency_score = self.efficiency_score(trace);
        let reliability_score = reliability_score(trace);

        let samples = [
            ("duration_ms", trace.performance.duration_ms),
            ("cpu_time_ms", trace.performance.cpu_time_ms),
            (
                "memory_peak_bytes",
                trace.performance.memory.peak_bytes as f64,
            ),
            ("total_tokens", trace.token_usage.total_tokens as f64),
        ];
        let baseline = self.baselines.compare_and_update(&trace.agent_name, &samples);
        let trends: Vec<TrendInfo> = samples
            .iter()
            .filter_map(|(metric, value)| self.trends.record(&trace.agent_name, metric, *value))
            .collect();

        let actions = prioritize(&suggestions);
        let impact = estimate_impact(&suggestions);

        let result = AnalysisResult {
            execution_id: trace.execution_id,
            agent_name: trace.agent_name.clone(),
            analyzed_at: Utc::now(),
            performance_score,
            efficiency_score,
            reliability_score,
            bottlenecks: bottlenecks.clone(),
            suggestions,
            baseline,
            trends,
            actions,
            impact,
        };

        // Cache only the fully computed result.
        self.cache.put(result.clone());

        for bottleneck in &bottlenecks {
            if bottleneck.severity >= Severity::High {
                self.events.publish(DebugEvent::BottleneckDetected {
                    execution_id: trace.execution_id,
                    bottleneck: bottleneck.clone(),
                });
            }
        }
        if performance_score < LOW_SCORE_FLOOR {
            self.events.publish(DebugEvent::LowScore {
                execution_id: trace.execution_id,
                result: Box::new(result.clone()),
            });
        }

        result
    }

    /// Observable cache hit/miss counters.
    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }

    /// Each detector is independent and additive.
    fn detect_bottlenecks(&self, trace: &ExecutionTrace) -> Vec<Bottleneck> {
        let mut found = Vec::new();
        let cfg = &self.config;
        let duration = trace.performance.duration_ms;

        // Total duration vs the warning/critical pair.
        if duration > cfg.duration_warning_ms {
            let severity = if duration > cfg.duration_critical_ms {
                Severity::Critical
            } else {
                Severity::Medium
            };
            found.push(Bottleneck {
                kind: BottleneckKind::Duration,
                severity,
                location: BottleneckLocation {
                    step_name: None,
                    start_offset_ms: 0.0,
                    end_offset_ms: duration,
                },
                estimated_impact_ms: duration - cfg.duration_warning_ms,
                suggestions: vec![
                    "Profile the slowest steps and review the overall algorithm".to_string(),
                ],
            });
        }

        // Per-step outliers against the mean.
        if trace.steps.len() >= 2 {
            let mean = trace.mean_step_duration_ms();
            let threshold = mean * (2.0 - cfg.step_sensitivity);
            if threshold > 0.0 {
                let mut offset = 0.0;
                for step in &trace.steps {
                    let start = offset;
                    offset += step.duration_ms;
                    if step.duration_ms <= threshold {
                        continue;
                    }
                    let severity = if step.duration_ms > 2.0 * threshold {
                        Severity::High
                    } else {
                        Severity::Medium
                    };
                    found.push(Bottleneck {
                        kind: BottleneckKind::Cpu,
                        severity,
                        location: BottleneckLocation {
                            step_name: Some(step.name.clone()),
                            start_offset_ms: start,
                            end_offset_ms: offset,
                        },
                        estimated_impact_ms: step.duration_ms - threshold,
                        suggestions: vec![format!(
                            "Step '{}' runs {:.0}ms against a {:.0}ms step mean",
                            step.name, step.duration_ms, mean
                        )],
                    });
                }
            }
        }

        // Peak memory vs the warning/critical pair.
        let peak = trace.performance.memory.peak_bytes;
        if peak > cfg.memory_warning_bytes {
            let severity = if peak > cfg.memory_critical_bytes {
                Severity::Critical
            } else {
                Severity::Medium
            };
            found.push(Bottleneck {
                kind: BottleneckKind::Memory,
                severity,
                location: BottleneckLocation {
                    step_name: None,
                    start_offset_ms: 0.0,
                    end_offset_ms: duration,
                },
                estimated_impact_ms: 0.0,
                suggestions: vec![
                    "Reduce peak memory via streaming or pooled allocation".to_string(),
                ],
            });
        }

        // Token usage vs the warning/critical pair.
        let tokens = trace.token_usage.total_tokens;
        if tokens > cfg.token_warning {
            let severity = if tokens > cfg.token_critical {
                Severity::High
            } else {
                Severity::Medium
            };
            found.push(Bottleneck {
                kind: BottleneckKind::Token,
                severity,
                location: BottleneckLocation {
                    step_name: None,
                    start_offset_ms: 0.0,
                    end_offset_ms: duration,
                },
                estimated_impact_ms: 0.0,
                suggestions: vec![
                    "Trim prompt context or cache repeated completions".to_string(),
                ],
            });
        }

        found
    }

    /// Maps bottlenecks to suggestion templates, plus the cache-hit and
    /// parallelization heuristics. Suggestions are deduplicated by kind,
    /// keeping the highest priority seen.
    fn generate_suggestions(
        &self,
        trace: &ExecutionTrace,
        bottlenecks: &[Bottleneck],
    ) -> Vec<OptimizationSuggestion> {
        let mut suggestions: Vec<OptimizationSuggestion> = Vec::new();
        let mut upsert = |candidate: OptimizationSuggestion| {
            match suggestions.iter_mut().find(|s| s.kind == candidate.kind) {
                Some(existing) => {
                    if candidate.priority > existing.priority {
                        *existing = candidate;
                    } else if candidate.priority == existing.priority {
                        existing.estimated_duration_reduction_ms +=
                            candidate.estimated_duration_reduction_ms;
                    }
                }
                None => suggestions.push(candidate),
            }
        };

        for bottleneck in bottlenecks {
            let template = match bottleneck.kind {
                BottleneckKind::Duration | BottleneckKind::Cpu => OptimizationSuggestion {
                    kind: SuggestionKind::Algorithm,
                    priority: bottleneck.severity,
                    description: "Review the dominant step's algorithm and data volume"
                        .to_string(),
                    estimated_duration_reduction_ms: bottleneck.estimated_impact_ms * 0.5,
                    estimated_resource_saving_pct: 0.0,
                    effort: EffortLevel::High,
                    risk: EffortLevel::Medium,
                },
                BottleneckKind::Memory => OptimizationSuggestion {
                    kind: SuggestionKind::ResourceAllocation,
                    priority: bottleneck.severity,
                    description: "Pool allocations or stream large intermediate data"
                        .to_string(),
                    estimated_duration_reduction_ms: 0.0,
                    estimated_resource_saving_pct: 25.0,
                    effort: EffortLevel::Medium,
                    risk: EffortLevel::Low,
                },
                BottleneckKind::Token => OptimizationSuggestion {
                    kind: SuggestionKind::Caching,
                    priority: bottleneck.severity,
                    description: "Cache repeated completions and tighten prompt context"
                        .to_string(),
                    estimated_duration_reduction_ms: 0.0,
                    estimated_resource_saving_pct: 15.0,
                    effort: EffortLevel::Low,
                    risk: EffortLevel::Low,
                },
                BottleneckKind::Io | BottleneckKind::Network | BottleneckKind::Wait => {
                    OptimizationSuggestion {
                        kind: SuggestionKind::ResourceAllocation,
                        priority: bottleneck.severity,
                        description: "Batch or overlap I/O with computation".to_string(),
                        estimated_duration_reduction_ms: bottleneck.estimated_impact_ms * 0.3,
                        estimated_resource_saving_pct: 10.0,
                        effort: EffortLevel::Medium,
                        risk: EffortLevel::Medium,
                    }
                }
            };
            upsert(template);
        }

        if trace.performance.cache_hit_ratio < self.config.cache_hit_floor {
            upsert(OptimizationSuggestion {
                kind: SuggestionKind::Caching,
                priority: Severity::Medium,
                description: format!(
                    "Cache hit ratio {:.2} is below {:.2}; widen the cache",
                    trace.performance.cache_hit_ratio, self.config.cache_hit_floor
                ),
                estimated_duration_reduction_ms: trace.performance.duration_ms * 0.1,
                estimated_resource_saving_pct: 10.0,
                effort: EffortLevel::Low,
                risk: EffortLevel::Low,
            });
        }

        if trace.steps.len() > 3 && has_independent_consecutive_steps(trace) {
            upsert(OptimizationSuggestion {
                kind: SuggestionKind::Parallelization,
                priority: Severity::Medium,
                description: "Consecutive steps share no data dependency; run them concurrently"
                    .to_string(),
                estimated_duration_reduction_ms: trace.mean_step_duration_ms(),
                estimated_resource_saving_pct: 0.0,
                effort: EffortLevel::Medium,
                risk: EffortLevel::Medium,
            });
        }

        suggestions
    }

    /// Mean of token efficiency and memory efficiency, each in [0, 100].
    fn efficiency_score(&self, trace: &ExecutionTrace) -> f64 {
        let token_eff = if trace.token_usage.total_tokens == 0 {
            100.0
        } else {
            let used = trace.token_usage.total_tokens as f64;
            (100.0 * (1.0 - used / self.config.token_critical as f64)).clamp(0.0, 100.0)
        };
        let memory = trace.performance.memory;
        let memory_eff = if memory.peak_bytes == 0 {
            100.0
        } else {
            (memory.average_bytes as f64 / memory.peak_bytes as f64 * 100.0).clamp(0.0, 100.0)
        };
        (token_eff + memory_eff) / 2.0
    }

    /// Spawns the periodic maintenance sweep: expired cache entries, stale
    /// baselines, and aged trend points are dropped. Each sweep works on
    /// its own snapshot; no lock is held across a full scan.
    pub fn start_maintenance(self: &Arc<Self>, interval: Duration) {
        let analyzer = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let retention = analyzer.config.retention;
                let cache = analyzer.cache.sweep_expired(analyzer.config.cache_ttl);
                let baselines = analyzer.baselines.sweep_stale(retention);
                let points = analyzer.trends.sweep_old(retention);
                if cache + baselines + points > 0 {
                    tracing::info!(
                        cache_entries = cache,
                        baselines,
                        trend_points = points,
                        "analysis maintenance sweep"
                    );
                }
            }
        });
    }
}

/// True when any consecutive step pair shows no input/output dependency.
fn has_independent_consecutive_steps(trace: &ExecutionTrace) -> bool {
    trace.steps.windows(2).any(|pair| {
        let previous_output = pair[0].output_summary.as_deref();
        let current_input = pair[1].input_summary.as_deref();
        match (previous_output, current_input) {
            (Some(out), Some(input)) => out != input,
            // Missing summaries: no declared dependency.
            _ => true,
        }
    })
}

/// Starts at 100, penalized per bottleneck, nudged up by the cache-hit
/// ratio, clamped to [0, 100].
fn performance_score(bottlenecks: &[Bottleneck], cache_hit_ratio: f64) -> f64 {
    let mut score: f64 = 100.0;
    for bottleneck in bottlenecks {
        score -= match bottleneck.severity {
            Severity::Critical => 30.0,
            Severity::High => 20.0,
            Severity::Medium => 10.0,
            Severity::Low => 5.0,
        };
    }
    score = score.max(0.0);
    (score + cache_hit_ratio * 10.0).clamp(0.0, 100.0)
}

/// 100 for completed, 0 for failed, 50 otherwise; -20 when an error is
/// recorded.
fn reliability_score(trace: &ExecutionTrace) -> f64 {
    let base: f64 = match trace.status {
        ExecutionStatus::Completed => 100.0,
        ExecutionStatus::Failed => 0.0,
        _ => 50.0,
    };
    let penalty = if trace.error.is_some() { 20.0 } else { 0.0 };
    (base - penalty).max(0.0)
}

/// Ranks suggestions into the single action list: severity first, then
/// expected impact.
fn prioritize(suggestions: &[OptimizationSuggestion]) -> Vec<PrioritizedAction> {
    let mut actions: Vec<PrioritizedAction> = suggestions
        .iter()
        .map(|s| PrioritizedAction {
            priority: s.priority,
            kind: s.kind,
            description: s.description.clone(),
            estimated_impact_ms: s.estimated_duration_reduction_ms,
        })
        .collect();
    actions.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.estimated_impact_ms.total_cmp(&a.estimated_impact_ms))
    });
    actions
}

/// Aggregate impact across all suggestions. Resource-allocation
/// suggestions contribute a reliability bump on top of their savings.
fn estimate_impact(suggestions: &[OptimizationSuggestion]) -> ImpactEstimate {
    let mut impact = ImpactEstimate::default();
    for s in suggestions {
        impact.duration_reduction_ms += s.estimated_duration_reduction_ms;
        impact.resource_saving_pct += s.estimated_resource_saving_pct;
        if s.kind == SuggestionKind::ResourceAllocation {
            impact.reliability_bump += 5.0;
        }
    }
    impact.cost_saving_proxy =
        impact.duration_reduction_ms / 1000.0 + impact.resource_saving_pct / 10.0;
    impact
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_core::ids::WorkflowId;
    use tracelens_core::trace::{ExecutionStep, StepKind, StepStatus};

    fn analyzer() -> PerformanceAnalyzer {
        PerformanceAnalyzer::new(
            AnalyzerConfig::default(),
            Arc::new(TraceStore::new()),
            Arc::new(EventBus::new(64)),
        )
    }

    fn completed_trace(agent: &str) -> ExecutionTrace {
        let mut trace = ExecutionTrace::new(WorkflowId::new(), agent, "task");
        trace.status = ExecutionStatus::Completed;
        trace.performance.cache_hit_ratio = 1.0;
        trace
    }

    fn with_steps(durations: &[f64]) -> ExecutionTrace {
        let mut trace = completed_trace("agent");
        for (i, d) in durations.iter().enumerate() {
            let mut step = ExecutionStep::new(format!("step-{i}"), StepKind::Execution);
            step.finish(StepStatus::Completed, *d);
            // Chain outputs to inputs so parallelization stays quiet.
            step.input_summary = Some(format!("v{i}"));
            step.output_summary = Some(format!("v{}", i + 1));
            trace.push_step(step);
        }
        trace.performance.duration_ms = durations.iter().sum();
        trace
    }

    #[test]
    fn duration_over_critical_yields_exactly_one_critical_duration_bottleneck() {
        let analyzer = analyzer();
        let mut trace = completed_trace("agent");
        trace.performance.duration_ms = 150_000.0;

        let result = analyzer.analyze_trace(&trace);
        let duration_bottlenecks: Vec<&Bottleneck> = result
            .bottlenecks
            .iter()
            .filter(|b| b.kind == BottleneckKind::Duration)
            .collect();
        assert_eq!(duration_bottlenecks.len(), 1);
        assert_eq!(duration_bottlenecks[0].severity, Severity::Critical);
    }

    #[test]
    fn step_outlier_flagged_and_only_it() {
        let analyzer = analyzer();
        let trace = with_steps(&[10.0, 10.0, 10.0, 10.0, 100.0]);

        let result = analyzer.analyze_trace(&trace);
        let step_bottlenecks: Vec<&Bottleneck> = result
            .bottlenecks
            .iter()
            .filter(|b| b.kind == BottleneckKind::Cpu)
            .collect();
        assert_eq!(step_bottlenecks.len(), 1);
        assert_eq!(
            step_bottlenecks[0].location.step_name.as_deref(),
            Some("step-4")
        );
        // mean 28, threshold 36.4, 100 > 72.8 -> high.
        assert_eq!(step_bottlenecks[0].severity, Severity::High);
    }

    #[test]
    fn analyze_is_idempotent_within_ttl() {
        let analyzer = analyzer();
        let mut trace = completed_trace("agent");
        trace.performance.duration_ms = 150_000.0;

        let first = analyzer.analyze_trace(&trace);
        let second = analyzer.analyze_trace(&trace);
        assert_eq!(first.bottlenecks, second.bottlenecks);
        assert_eq!(first.suggestions, second.suggestions);
        assert_eq!(first.analyzed_at, second.analyzed_at);

        let metrics = analyzer.cache_metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
    }

    #[test]
    fn memory_and_token_bottlenecks() {
        let analyzer = analyzer();
        let mut trace = completed_trace("agent");
        trace.performance.memory.peak_bytes = 2 * 1024 * 1024 * 1024;
        trace.token_usage.total_tokens = 10_000;

        let result = analyzer.analyze_trace(&trace);
        assert!(result
            .bottlenecks
            .iter()
            .any(|b| b.kind == BottleneckKind::Memory && b.severity == Severity::Critical));
        assert!(result
            .bottlenecks
            .iter()
            .any(|b| b.kind == BottleneckKind::Token && b.severity == Severity::Medium));
    }

    #[test]
    fn low_cache_ratio_yields_caching_suggestion() {
        let analyzer = analyzer();
        let mut trace = completed_trace("agent");
        trace.performance.cache_hit_ratio = 0.5;

        let result = analyzer.analyze_trace(&trace);
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Caching));
    }

    #[test]
    fn independent_steps_yield_parallelization_suggestion() {
        let analyzer = analyzer();
        let mut trace = completed_trace("agent");
        for i in 0..5 {
            let mut step = ExecutionStep::new(format!("s{i}"), StepKind::Execution);
            step.finish(StepStatus::Completed, 10.0);
            // No input/output summaries: no declared dependency.
            trace.push_step(step);
        }

        let result = analyzer.analyze_trace(&trace);
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Parallelization));
    }

    #[test]
    fn chained_steps_do_not_suggest_parallelization() {
        let analyzer = analyzer();
        let trace = with_steps(&[10.0, 10.0, 10.0, 10.0, 10.0]);
        let result = analyzer.analyze_trace(&trace);
        assert!(!result
            .suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::Parallelization));
    }

    #[test]
    fn scores() {
        let analyzer = analyzer();
        let trace = completed_trace("agent");
        let result = analyzer.analyze_trace(&trace);
        // No bottlenecks, perfect cache ratio: 100 + 10 clamped to 100.
        assert_eq!(result.performance_score, 100.0);
        assert_eq!(result.reliability_score, 100.0);

        let mut failed = completed_trace("agent-b");
        failed.status = ExecutionStatus::Failed;
        failed.error = Some(tracelens_core::trace::ExecutionError::new("boom"));
        let result = analyzer.analyze_trace(&failed);
        assert_eq!(result.reliability_score, 0.0);
    }

    #[test]
    fn critical_bottleneck_emits_event() {
        let events = Arc::new(EventBus::new(64));
        let analyzer = PerformanceAnalyzer::new(
            AnalyzerConfig::default(),
            Arc::new(TraceStore::new()),
            Arc::clone(&events),
        );
        let mut rx = events.subscribe();

        let mut trace = completed_trace("agent");
        trace.performance.duration_ms = 150_000.0;
        analyzer.analyze_trace(&trace);

        let mut saw_bottleneck = false;
        while let Ok(event) = rx.try_recv() {
            if event.type_name() == "performance:bottleneck-detected" {
                saw_bottleneck = true;
            }
        }
        assert!(saw_bottleneck);
    }

    #[test]
    fn low_score_emits_event() {
        let events = Arc::new(EventBus::new(64));
        let analyzer = PerformanceAnalyzer::new(
            AnalyzerConfig::default(),
            Arc::new(TraceStore::new()),
            Arc::clone(&events),
        );
        let mut rx = events.subscribe();

        // Critical duration + critical memory + high token: 100-30-30-20=20.
        let mut trace = completed_trace("agent");
        trace.performance.cache_hit_ratio = 0.0;
        trace.performance.duration_ms = 150_000.0;
        trace.performance.memory.peak_bytes = 2 * 1024 * 1024 * 1024;
        trace.token_usage.total_tokens = 40_000;
        let result = analyzer.analyze_trace(&trace);
        assert!(result.performance_score < LOW_SCORE_FLOOR);

        let mut saw_low_score = false;
        while let Ok(event) = rx.try_recv() {
            if event.type_name() == "performance:low-score" {
                saw_low_score = true;
            }
        }
        assert!(saw_low_score);
    }

    #[test]
    fn actions_ranked_by_priority_then_impact() {
        let suggestions = vec![
            OptimizationSuggestion {
                kind: SuggestionKind::Caching,
                priority: Severity::Medium,
                description: "cache".into(),
                estimated_duration_reduction_ms: 500.0,
                estimated_resource_saving_pct: 0.0,
                effort: EffortLevel::Low,
                risk: EffortLevel::Low,
            },
            OptimizationSuggestion {
                kind: SuggestionKind::Algorithm,
                priority: Severity::Critical,
                description: "algo".into(),
                estimated_duration_reduction_ms: 100.0,
                estimated_resource_saving_pct: 0.0,
                effort: EffortLevel::High,
                risk: EffortLevel::Medium,
            },
            OptimizationSuggestion {
                kind: SuggestionKind::Parallelization,
                priority: Severity::Medium,
                description: "par".into(),
                estimated_duration_reduction_ms: 900.0,
                estimated_resource_saving_pct: 0.0,
                effort: EffortLevel::Medium,
                risk: EffortLevel::Medium,
            },
        ];
        let actions = prioritize(&suggestions);
        assert_eq!(actions[0].kind, SuggestionKind::Algorithm);
        assert_eq!(actions[1].kind, SuggestionKind::Parallelization);
        assert_eq!(actions[2].kind, SuggestionKind::Caching);
    }
}

//! Concurrent in-memory trace store with bounded-time retention.
//!
//! [`TraceStore`] is the single shared home of execution traces. Backed by
//! `DashMap` for concurrent access from instrumentation, analysis, and
//! server tasks. Traces are retained for a bounded time window after
//! reaching a terminal state, then evicted by a periodic sweep; memory stays
//! bounded by trading a time window for a size cap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::CoreError;
use crate::ids::ExecutionId;
use crate::trace::{ExecutionStatus, ExecutionTrace};

/// Filter for listing traces.
#[derive(Debug, Clone, Default)]
pub struct TraceFilter {
    pub agent_name: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub limit: Option<usize>,
}

struct StoredTrace {
    trace: ExecutionTrace,
    /// When the trace reached a terminal state; retention starts here.
    finished_at: Option<Instant>,
}

/// Concurrent map of live and recently finished traces.
pub struct TraceStore {
    traces: DashMap<ExecutionId, StoredTrace>,
}

impl TraceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        TraceStore {
            traces: DashMap::new(),
        }
    }

    /// Inserts a new trace, keyed by its execution ID.
    pub fn insert(&self, trace: ExecutionTrace) {
        let finished_at = trace.status.is_terminal().then(Instant::now);
        self.traces.insert(
            trace.execution_id,
            StoredTrace { trace, finished_at },
        );
    }

    /// Returns a clone of the trace, or `None` if unknown or evicted.
    pub fn get(&self, id: &ExecutionId) -> Option<ExecutionTrace> {
        self.traces.get(id).map(|entry| entry.trace.clone())
    }

    /// Mutates a trace in place under its map entry.
    ///
    /// Fails with [`CoreError::TraceImmutable`] once the trace is terminal.
    /// If the mutation itself moves the trace into a terminal state, the
    /// retention clock starts.
    pub fn mutate<F, R>(&self, id: &ExecutionId, f: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut ExecutionTrace) -> R,
    {
        let mut entry = self
            .traces
            .get_mut(id)
            .ok_or(CoreError::TraceNotFound(*id))?;
        if entry.trace.status.is_terminal() {
            return Err(CoreError::TraceImmutable(*id));
        }
        let result = f(&mut entry.trace);
        if entry.trace.status.is_terminal() && entry.finished_at.is_none() {
            entry.finished_at = Some(Instant::now());
        }
        Ok(result)
    }

    /// Lists traces matching the filter, newest first.
    pub fn list(&self, filter: &TraceFilter) -> Vec<ExecutionTrace> {
        let mut matched: Vec<ExecutionTrace> = self
            .traces
            .iter()
            .filter(|entry| {
                let trace = &entry.trace;
                if let Some(agent) = &filter.agent_name {
                    if &trace.agent_name != agent {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if trace.status != status {
                        return false;
                    }
                }
                true
            })
            .map(|entry| entry.trace.clone())
            .collect();

        matched.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        matched
    }

    /// Number of stored traces.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Evicts terminal traces older than `retention` and returns their IDs.
    ///
    /// Snapshot-then-remove: the scan never holds an entry lock while
    /// mutating the map.
    pub fn sweep_expired(&self, retention: Duration) -> Vec<ExecutionId> {
        let now = Instant::now();
        let expired: Vec<ExecutionId> = self
            .traces
            .iter()
            .filter_map(|entry| {
                let finished = entry.finished_at?;
                (now.duration_since(finished) >= retention).then(|| *entry.key())
            })
            .collect();

        for id in &expired {
            self.traces.remove(id);
        }
        expired
    }

    /// Spawns a background tokio task that periodically evicts expired
    /// traces.
    pub fn start_retention_sweep(self: &Arc<Self>, interval: Duration, retention: Duration) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let evicted = store.sweep_expired(retention);
                if !evicted.is_empty() {
                    tracing::info!("Evicted {} expired trace(s)", evicted.len());
                }
            }
        });
    }
}

impl Default for TraceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WorkflowId;
    use crate::trace::{ExecutionStep, StepKind};

    fn sample_trace(agent: &str) -> ExecutionTrace {
        ExecutionTrace::new(WorkflowId::new(), agent, "task")
    }

    #[test]
    fn get_after_insert() {
        let store = TraceStore::new();
        let trace = sample_trace("a");
        let id = trace.execution_id;
        store.insert(trace);
        assert!(store.get(&id).is_some());
        assert!(store.get(&ExecutionId::new()).is_none());
    }

    #[test]
    fn mutate_appends_steps() {
        let store = TraceStore::new();
        let trace = sample_trace("a");
        let id = trace.execution_id;
        store.insert(trace);

        store
            .mutate(&id, |t| {
                t.push_step(ExecutionStep::new("prep", StepKind::Preparation));
            })
            .unwrap();
        assert_eq!(store.get(&id).unwrap().steps.len(), 1);
    }

    #[test]
    fn terminal_trace_is_immutable() {
        let store = TraceStore::new();
        let trace = sample_trace("a");
        let id = trace.execution_id;
        store.insert(trace);

        store
            .mutate(&id, |t| t.status = ExecutionStatus::Completed)
            .unwrap();
        let err = store.mutate(&id, |t| t.status = ExecutionStatus::Running);
        assert!(matches!(err, Err(CoreError::TraceImmutable(_))));
    }

    #[test]
    fn list_filters_by_agent_and_status() {
        let store = TraceStore::new();
        store.insert(sample_trace("alpha"));
        store.insert(sample_trace("alpha"));
        store.insert(sample_trace("beta"));

        let filter = TraceFilter {
            agent_name: Some("alpha".to_string()),
            status: Some(ExecutionStatus::Running),
            limit: Some(1),
        };
        assert_eq!(store.list(&filter).len(), 1);

        let all = store.list(&TraceFilter::default());
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn sweep_evicts_only_terminal_traces() {
        let store = TraceStore::new();
        let running = sample_trace("a");
        let running_id = running.execution_id;
        store.insert(running);

        let done = sample_trace("a");
        let done_id = done.execution_id;
        store.insert(done);
        store
            .mutate(&done_id, |t| t.status = ExecutionStatus::Completed)
            .unwrap();

        let evicted = store.sweep_expired(Duration::ZERO);
        assert_eq!(evicted, vec![done_id]);
        assert!(store.get(&done_id).is_none());
        assert!(store.get(&running_id).is_some());
    }
}

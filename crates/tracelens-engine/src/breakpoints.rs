//! Breakpoint and watch expression engine.
//!
//! [`BreakpointEngine`] owns the shared registries of breakpoints and watch
//! expressions, decides whether an execution step should suspend, and
//! evaluates watch values against the same restricted context used for
//! conditions. Backed by `DashMap` so instrumentation from many concurrent
//! executions never serializes on a single lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use tracelens_core::debug::{Breakpoint, WatchExpression};
use tracelens_core::event::{DebugEvent, EventBus};
use tracelens_core::ids::{BreakpointId, WatchId};
use tracelens_core::trace::{ExecutionStep, ExecutionTrace};
use tracelens_expr::{eval_condition, parse, EvalContext, EvalLimits};

use crate::error::EngineError;

/// Length a condition string is truncated to when used as an auto-name.
const NAME_CONDITION_LEN: usize = 32;

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_breakpoints: usize,
    pub max_watches: usize,
    /// When false, supplying a condition fails with `FeatureDisabled`.
    pub allow_conditions: bool,
    pub eval_limits: EvalLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_breakpoints: 50,
            max_watches: 50,
            allow_conditions: true,
            eval_limits: EvalLimits::default(),
        }
    }
}

/// Operator request to register a breakpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakpointSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hits: Option<u64>,
}

/// Outcome of a `should_break` check.
#[derive(Debug, Clone, Serialize)]
pub struct BreakDecision {
    pub should_break: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoint: Option<Breakpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BreakDecision {
    fn no() -> Self {
        BreakDecision {
            should_break: false,
            breakpoint: None,
            reason: None,
        }
    }
}

/// One recorded watch evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct WatchSample {
    pub watch_id: WatchId,
    pub expression: String,
    pub value: serde_json::Value,
}

/// Shared breakpoint/watch registry and matcher.
pub struct BreakpointEngine {
    config: EngineConfig,
    breakpoints: DashMap<BreakpointId, Breakpoint>,
    watches: DashMap<WatchId, WatchExpression>,
    events: Arc<EventBus>,
    name_seq: AtomicU64,
}

impl BreakpointEngine {
    pub fn new(config: EngineConfig, events: Arc<EventBus>) -> Self {
        BreakpointEngine {
            config,
            breakpoints: DashMap::new(),
            watches: DashMap::new(),
            events,
            name_seq: AtomicU64::new(0),
        }
    }

    /// Registers a breakpoint.
    ///
    /// Fails with `CapacityExceeded` past the configured maximum and with
    /// `FeatureDisabled` when a condition arrives while conditions are off.
    /// Conditions are parse-validated here so a malformed expression is
    /// rejected at registration rather than silently never matching.
    pub fn add_breakpoint(&self, spec: BreakpointSpec) -> Result<Breakpoint, EngineError> {
        if self.breakpoints.len() >= self.config.max_breakpoints {
            return Err(EngineError::CapacityExceeded {
                kind: "breakpoint",
                limit: self.config.max_breakpoints,
            });
        }
        if spec.condition.is_some() && !self.config.allow_conditions {
            return Err(EngineError::FeatureDisabled);
        }
        if let Some(condition) = &spec.condition {
            parse(condition)?;
        }

        let name = self.auto_name(&spec);
        let breakpoint = Breakpoint {
            id: BreakpointId::new(),
            name,
            agent_name: spec.agent_name,
            step_name: spec.step_name,
            condition: spec.condition,
            enabled: spec.enabled.unwrap_or(true),
            hit_count: 0,
            max_hits: spec.max_hits,
            created_at: Utc::now(),
            last_hit_at: None,
        };
        self.breakpoints.insert(breakpoint.id, breakpoint.clone());
        self.events.publish(DebugEvent::BreakpointSet {
            breakpoint: Box::new(breakpoint.clone()),
        });
        Ok(breakpoint)
    }

    /// Human-readable name: `agent:step`, else a truncated condition, else a
    /// sequence number.
    fn auto_name(&self, spec: &BreakpointSpec) -> String {
        if let Some(name) = &spec.name {
            return name.clone();
        }
        match (&spec.agent_name, &spec.step_name) {
            (Some(agent), Some(step)) => format!("{agent}:{step}"),
            (Some(agent), None) => format!("{agent}:*"),
            (None, Some(step)) => format!("*:{step}"),
            (None, None) => match &spec.condition {
                Some(condition) => {
                    let mut name: String =
                        condition.chars().take(NAME_CONDITION_LEN).collect();
                    if condition.chars().count() > NAME_CONDITION_LEN {
                        name.push('…');
                    }
                    name
                }
                None => {
                    let n = self.name_seq.fetch_add(1, Ordering::Relaxed) + 1;
                    format!("breakpoint-{n}")
                }
            },
        }
    }

    /// Removes a breakpoint. Idempotent: removing an unknown ID returns
    /// `false` without error.
    pub fn remove_breakpoint(&self, id: &BreakpointId) -> bool {
        let removed = self.breakpoints.remove(id).is_some();
        if removed {
            self.events
                .publish(DebugEvent::BreakpointRemoved { breakpoint_id: *id });
        }
        removed
    }

    pub fn get_breakpoint(&self, id: &BreakpointId) -> Option<Breakpoint> {
        self.breakpoints.get(id).map(|e| e.clone())
    }

    /// Lists all breakpoints, oldest first.
    pub fn list_breakpoints(&self) -> Vec<Breakpoint> {
        let mut all: Vec<Breakpoint> = self.breakpoints.iter().map(|e| e.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        all
    }

    /// Enables or disables a breakpoint, returning the updated snapshot.
    /// `None` for an unknown ID.
    pub fn set_breakpoint_enabled(
        &self,
        id: &BreakpointId,
        enabled: bool,
    ) -> Option<Breakpoint> {
        self.breakpoints.get_mut(id).map(|mut entry| {
            entry.enabled = enabled;
            entry.clone()
        })
    }

    pub fn breakpoint_count(&self) -> usize {
        self.breakpoints.len()
    }

    /// Decides whether the given step should suspend.
    ///
    /// Enabled breakpoints whose agent/step filters match are checked in
    /// creation order; absence of a condition means "always break". The
    /// first truthy match records the hit (count, timestamp, self-disable at
    /// the cap) and wins. One breakpoint's evaluation failure never prevents
    /// checking the next.
    pub fn should_break(&self, trace: &ExecutionTrace, step: &ExecutionStep) -> BreakDecision {
        let mut candidates: Vec<(BreakpointId, chrono::DateTime<Utc>, Option<String>)> = self
            .breakpoints
            .iter()
            .filter(|entry| {
                let bp = entry.value();
                if !bp.enabled {
                    return false;
                }
                if let Some(agent) = &bp.agent_name {
                    if agent != &trace.agent_name {
                        return false;
                    }
                }
                if let Some(name) = &bp.step_name {
                    if name != &step.name {
                        return false;
                    }
                }
                true
            })
            .map(|entry| (entry.id, entry.created_at, entry.condition.clone()))
            .collect();
        if candidates.is_empty() {
            return BreakDecision::no();
        }
        // Oldest first; id bytes break registration-timestamp ties.
        candidates.sort_by_key(|(id, created_at, _)| (*created_at, *id.0.as_bytes()));

        let ctx = EvalContext::for_step(trace, step);
        for (id, _, condition) in candidates {
            let (matched, reason) = match &condition {
                None => (true, "unconditional".to_string()),
                Some(source) => {
                    match eval_condition(source, &ctx, &self.config.eval_limits) {
                        Ok(truthy) => (truthy, format!("condition: {source}")),
                        Err(err) => {
                            tracing::warn!(
                                breakpoint = %id,
                                error = %err,
                                "breakpoint condition evaluation failed; treating as no match"
                            );
                            continue;
                        }
                    }
                }
            };
            if !matched {
                continue;
            }

            // Record the hit under the entry lock; the breakpoint may have
            // been removed concurrently, in which case keep scanning.
            let Some(mut entry) = self.breakpoints.get_mut(&id) else {
                continue;
            };
            entry.hit_count += 1;
            entry.last_hit_at = Some(Utc::now());
            if let Some(max) = entry.max_hits {
                if entry.hit_count >= max {
                    entry.enabled = false;
                }
            }
            let snapshot = entry.clone();
            drop(entry);

            self.events.publish(DebugEvent::BreakpointHit {
                execution_id: trace.execution_id,
                breakpoint: Box::new(snapshot.clone()),
                step_name: step.name.clone(),
                reason: reason.clone(),
            });
            return BreakDecision {
                should_break: true,
                breakpoint: Some(snapshot),
                reason: Some(reason),
            };
        }

        BreakDecision::no()
    }

    /// Registers a watch expression (capacity-checked, parse-validated).
    pub fn add_watch(&self, expression: &str) -> Result<WatchExpression, EngineError> {
        if self.watches.len() >= self.config.max_watches {
            return Err(EngineError::CapacityExceeded {
                kind: "watch expression",
                limit: self.config.max_watches,
            });
        }
        parse(expression)?;

        let watch = WatchExpression {
            id: WatchId::new(),
            expression: expression.to_string(),
            enabled: true,
            last_value: None,
            last_evaluated_at: None,
            evaluation_count: 0,
        };
        self.watches.insert(watch.id, watch.clone());
        Ok(watch)
    }

    /// Removes a watch expression. Idempotent.
    pub fn remove_watch(&self, id: &WatchId) -> bool {
        self.watches.remove(id).is_some()
    }

    pub fn list_watches(&self) -> Vec<WatchExpression> {
        self.watches.iter().map(|e| e.clone()).collect()
    }

    /// Enables or disables a watch expression, returning the updated
    /// snapshot. `None` for an unknown ID.
    pub fn set_watch_enabled(&self, id: &WatchId, enabled: bool) -> Option<WatchExpression> {
        self.watches.get_mut(id).map(|mut entry| {
            entry.enabled = enabled;
            entry.clone()
        })
    }

    /// Evaluates every enabled watch against the step context, recording
    /// value, timestamp, and evaluation count. A failing expression is
    /// logged and skipped, never fatal.
    pub fn evaluate_watches(
        &self,
        trace: &ExecutionTrace,
        step: &ExecutionStep,
    ) -> Vec<WatchSample> {
        let ctx = EvalContext::for_step(trace, step);
        let mut samples = Vec::new();

        for mut entry in self.watches.iter_mut() {
            if !entry.enabled {
                continue;
            }
            match tracelens_expr::eval_str(&entry.expression, &ctx, &self.config.eval_limits) {
                Ok(value) => {
                    let json = value.to_json();
                    entry.last_value = Some(json.clone());
                    entry.last_evaluated_at = Some(Utc::now());
                    entry.evaluation_count += 1;
                    samples.push(WatchSample {
                        watch_id: entry.id,
                        expression: entry.expression.clone(),
                        value: json,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        watch = %entry.id,
                        error = %err,
                        "watch expression evaluation failed; skipping"
                    );
                }
            }
        }

        samples
    }
}

//! Per-agent exponentially-smoothed performance baselines.
//!
//! Each agent carries one smoothed value per metric, updated after every
//! analysis with `baseline = alpha * current + (1 - alpha) * baseline`.
//! Comparisons classify the current value against the baseline with a ±5%
//! deadband; for all tracked metrics, lower is better.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use tracelens_core::analysis::{BaselineComparison, ChangeDirection};

/// Deadband half-width in percent for improving/degrading classification.
const DEADBAND_PCT: f64 = 5.0;

struct AgentBaseline {
    metrics: HashMap<String, f64>,
    updated_at: Instant,
}

/// Rolling smoothed baselines keyed by agent name.
pub struct BaselineTracker {
    agents: DashMap<String, AgentBaseline>,
    alpha: f64,
}

impl BaselineTracker {
    pub fn new(alpha: f64) -> Self {
        BaselineTracker {
            agents: DashMap::new(),
            alpha,
        }
    }

    /// Compares the sampled metrics against the agent's baseline, then folds
    /// the samples into the baseline.
    ///
    /// The first sample for a metric seeds the baseline and classifies as
    /// `Stable` with zero improvement.
    pub fn compare_and_update(
        &self,
        agent: &str,
        samples: &[(&str, f64)],
    ) -> Vec<BaselineComparison> {
        let mut entry = self
            .agents
            .entry(agent.to_string())
            .or_insert_with(|| AgentBaseline {
                metrics: HashMap::new(),
                updated_at: Instant::now(),
            });
        entry.updated_at = Instant::now();

        let mut comparisons = Vec::with_capacity(samples.len());
        for (metric, current) in samples {
            let comparison = match entry.metrics.get(*metric) {
                Some(&baseline) if baseline != 0.0 => {
                    // Positive improvement means the metric went down.
                    let improvement_pct = (baseline - current) / baseline * 100.0;
                    let direction = if improvement_pct > DEADBAND_PCT {
                        ChangeDirection::Improving
                    } else if improvement_pct < -DEADBAND_PCT {
                        ChangeDirection::Degrading
                    } else {
                        ChangeDirection::Stable
                    };
                    BaselineComparison {
                        metric: metric.to_string(),
                        baseline_value: baseline,
                        current_value: *current,
                        improvement_pct,
                        direction,
                    }
                }
                _ => BaselineComparison {
                    metric: metric.to_string(),
                    baseline_value: *current,
                    current_value: *current,
                    improvement_pct: 0.0,
                    direction: ChangeDirection::Stable,
                },
            };
            comparisons.push(comparison);

            let slot = entry.metrics.entry(metric.to_string()).or_insert(*current);
            *slot = self.alpha * current + (1.0 - self.alpha) * *slot;
        }

        comparisons
    }

    /// Drops baselines not updated within `retention`.
    pub fn sweep_stale(&self, retention: Duration) -> usize {
        let before = self.agents.len();
        self.agents
            .retain(|_, baseline| baseline.updated_at.elapsed() < retention);
        before - self.agents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_stable() {
        let tracker = BaselineTracker::new(0.1);
        let cmp = tracker.compare_and_update("a", &[("duration_ms", 100.0)]);
        assert_eq!(cmp[0].direction, ChangeDirection::Stable);
        assert_eq!(cmp[0].improvement_pct, 0.0);
    }

    #[test]
    fn lower_value_classifies_improving() {
        let tracker = BaselineTracker::new(0.1);
        tracker.compare_and_update("a", &[("duration_ms", 100.0)]);
        let cmp = tracker.compare_and_update("a", &[("duration_ms", 50.0)]);
        assert_eq!(cmp[0].direction, ChangeDirection::Improving);
        assert!(cmp[0].improvement_pct > 0.0);
    }

    #[test]
    fn higher_value_classifies_degrading() {
        let tracker = BaselineTracker::new(0.1);
        tracker.compare_and_update("a", &[("duration_ms", 100.0)]);
        let cmp = tracker.compare_and_update("a", &[("duration_ms", 200.0)]);
        assert_eq!(cmp[0].direction, ChangeDirection::Degrading);
    }

    #[test]
    fn deadband_classifies_stable() {
        let tracker = BaselineTracker::new(0.1);
        tracker.compare_and_update("a", &[("duration_ms", 100.0)]);
        let cmp = tracker.compare_and_update("a", &[("duration_ms", 103.0)]);
        assert_eq!(cmp[0].direction, ChangeDirection::Stable);
    }

    #[test]
    fn smoothing_moves_the_baseline_slowly() {
        let tracker = BaselineTracker::new(0.1);
        tracker.compare_and_update("a", &[("duration_ms", 100.0)]);
        tracker.compare_and_update("a", &[("duration_ms", 200.0)]);
        // Baseline after one update: 0.1 * 200 + 0.9 * 100 = 110.
        let cmp = tracker.compare_and_update("a", &[("duration_ms", 110.0)]);
        assert!((cmp[0].baseline_value - 110.0).abs() < 1e-9);
    }

    #[test]
    fn agents_are_independent() {
        let tracker = BaselineTracker::new(0.1);
        tracker.compare_and_update("a", &[("duration_ms", 100.0)]);
        let cmp = tracker.compare_and_update("b", &[("duration_ms", 500.0)]);
        assert_eq!(cmp[0].direction, ChangeDirection::Stable);
    }
}

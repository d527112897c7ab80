//! Sliding-window trend tracking with least-squares slope classification.
//!
//! Each `(agent, metric)` key holds a bounded window of samples. An ordinary
//! least-squares line is fit over the sample sequence; the relative slope
//! (slope / mean) classifies the trend. For these metrics lower is better,
//! so an increasing metric is degrading.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use tracelens_core::analysis::{ChangeDirection, TrendInfo};

/// Relative-slope magnitude below which the trend counts as stable.
const STABLE_REL_SLOPE: f64 = 0.01;

/// Samples required before a trend is reported at all.
const MIN_SAMPLES: usize = 3;

struct Window {
    points: VecDeque<(Instant, f64)>,
}

/// Bounded per-(agent, metric) sample windows.
pub struct TrendTracker {
    windows: DashMap<(String, String), Window>,
    capacity: usize,
}

impl TrendTracker {
    pub fn new(capacity: usize) -> Self {
        TrendTracker {
            windows: DashMap::new(),
            capacity,
        }
    }

    /// Records a sample and returns the current trend for the key, once
    /// enough samples exist.
    pub fn record(&self, agent: &str, metric: &str, value: f64) -> Option<TrendInfo> {
        let key = (agent.to_string(), metric.to_string());
        let mut entry = self.windows.entry(key).or_insert_with(|| Window {
            points: VecDeque::new(),
        });

        entry.points.push_back((Instant::now(), value));
        while entry.points.len() > self.capacity {
            entry.points.pop_front();
        }

        let n = entry.points.len();
        if n < MIN_SAMPLES {
            return None;
        }

        // OLS over the sample sequence: x = 0..n, y = value.
        let xs_mean = (n - 1) as f64 / 2.0;
        let ys_mean: f64 = entry.points.iter().map(|(_, y)| y).sum::<f64>() / n as f64;
        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, (_, y)) in entry.points.iter().enumerate() {
            let dx = i as f64 - xs_mean;
            sxy += dx * (y - ys_mean);
            sxx += dx * dx;
        }
        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        let relative = if ys_mean == 0.0 {
            0.0
        } else {
            slope / ys_mean
        };

        let direction = if relative.abs() < STABLE_REL_SLOPE {
            ChangeDirection::Stable
        } else if relative > 0.0 {
            // Metric increasing: worse.
            ChangeDirection::Degrading
        } else {
            ChangeDirection::Improving
        };

        Some(TrendInfo {
            metric: metric.to_string(),
            direction,
            strength: (relative.abs() * 10.0).clamp(0.0, 1.0),
            sample_count: n,
        })
    }

    /// Drops sample points older than `retention`; empty windows are removed.
    pub fn sweep_old(&self, retention: Duration) -> usize {
        let mut dropped = 0;
        for mut entry in self.windows.iter_mut() {
            let before = entry.points.len();
            entry
                .points
                .retain(|(at, _)| at.elapsed() < retention);
            dropped += before - entry.points.len();
        }
        self.windows.retain(|_, window| !window.points.is_empty());
        dropped
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_increasing_sequence_degrades() {
        let tracker = TrendTracker::new(50);
        let mut last = None;
        for i in 0..20 {
            last = tracker.record("a", "duration_ms", 100.0 + i as f64 * 10.0);
        }
        let trend = last.unwrap();
        assert_eq!(trend.direction, ChangeDirection::Degrading);
        assert!(trend.strength > 0.0);
    }

    #[test]
    fn decreasing_sequence_improves() {
        let tracker = TrendTracker::new(50);
        let mut last = None;
        for i in 0..20 {
            last = tracker.record("a", "duration_ms", 400.0 - i as f64 * 10.0);
        }
        assert_eq!(last.unwrap().direction, ChangeDirection::Improving);
    }

    #[test]
    fn flat_sequence_is_stable() {
        let tracker = TrendTracker::new(50);
        let mut last = None;
        for _ in 0..20 {
            last = tracker.record("a", "duration_ms", 250.0);
        }
        let trend = last.unwrap();
        assert_eq!(trend.direction, ChangeDirection::Stable);
        assert_eq!(trend.strength, 0.0);
    }

    #[test]
    fn too_few_samples_report_nothing() {
        let tracker = TrendTracker::new(50);
        assert!(tracker.record("a", "duration_ms", 1.0).is_none());
        assert!(tracker.record("a", "duration_ms", 2.0).is_none());
        assert!(tracker.record("a", "duration_ms", 3.0).is_some());
    }

    #[test]
    fn window_is_bounded() {
        let tracker = TrendTracker::new(5);
        for i in 0..100 {
            tracker.record("a", "duration_ms", i as f64);
        }
        let trend = tracker.record("a", "duration_ms", 100.0).unwrap();
        assert_eq!(trend.sample_count, 5);
    }

    #[test]
    fn sweep_removes_all_current_points_with_zero_retention() {
        let tracker = TrendTracker::new(50);
        for i in 0..5 {
            tracker.record("a", "duration_ms", i as f64);
        }
        assert_eq!(tracker.sweep_old(Duration::ZERO), 5);
        assert_eq!(tracker.window_count(), 0);
    }
}

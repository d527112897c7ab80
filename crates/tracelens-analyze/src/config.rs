//! Analyzer tunables.

use std::time::Duration;

/// Thresholds and knobs for the performance analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Total-duration warning threshold.
    pub duration_warning_ms: f64,
    /// Total-duration critical threshold.
    pub duration_critical_ms: f64,
    /// Peak-memory warning threshold.
    pub memory_warning_bytes: u64,
    /// Peak-memory critical threshold.
    pub memory_critical_bytes: u64,
    /// Total-token warning threshold.
    pub token_warning: u64,
    /// Total-token critical threshold.
    pub token_critical: u64,
    /// Per-step outlier sensitivity in [0, 1]; a step is flagged when its
    /// duration exceeds `mean * (2 - sensitivity)`.
    pub step_sensitivity: f64,
    /// Cache-hit ratio below which a caching suggestion is generated.
    pub cache_hit_floor: f64,
    /// Analysis result cache TTL.
    pub cache_ttl: Duration,
    /// Sliding window size per (agent, metric) trend key.
    pub trend_window: usize,
    /// Exponential smoothing factor for per-agent baselines.
    pub baseline_alpha: f64,
    /// Age past which cached results, baselines, and trend points are
    /// evicted by the maintenance sweep.
    pub retention: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            duration_warning_ms: 30_000.0,
            duration_critical_ms: 120_000.0,
            memory_warning_bytes: 512 * 1024 * 1024,
            memory_critical_bytes: 1024 * 1024 * 1024,
            token_warning: 8_000,
            token_critical: 32_000,
            step_sensitivity: 0.7,
            cache_hit_floor: 0.8,
            cache_ttl: Duration::from_secs(5 * 60),
            trend_window: 50,
            baseline_alpha: 0.1,
            retention: Duration::from_secs(24 * 60 * 60),
        }
    }
}

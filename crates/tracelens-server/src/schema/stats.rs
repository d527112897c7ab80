//! Aggregate statistics and health surface types.

use serde::Serialize;

use tracelens_analyze::CacheMetrics;

/// Trace counts by lifecycle status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceCounts {
    pub total: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Response body for `GET /stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub traces: TraceCounts,
    pub breakpoints: usize,
    pub watches: usize,
    pub sessions: usize,
    pub analysis_cache: CacheMetrics,
    pub events_relayed: u64,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub sessions: usize,
    pub events_relayed: u64,
}

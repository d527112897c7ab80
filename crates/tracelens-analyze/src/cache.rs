//! TTL cache for analysis results with observable hit rate.
//!
//! Keyed by `(execution_id, agent_name)`. Entries expire after the
//! configured TTL; a fresh hit bumps the hit counter so cache effectiveness
//! is observable without instrumentation on the caller side.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use tracelens_core::analysis::AnalysisResult;
use tracelens_core::ids::ExecutionId;

/// Observable cache counters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
    pub entries: usize,
}

struct CachedEntry {
    result: AnalysisResult,
    stored_at: Instant,
}

/// Concurrent analysis-result cache.
pub struct AnalysisCache {
    entries: DashMap<(ExecutionId, String), CachedEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        AnalysisCache {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns a fresh cached result, counting the lookup as hit or miss.
    pub fn get(&self, execution_id: &ExecutionId, agent: &str) -> Option<AnalysisResult> {
        let key = (*execution_id, agent.to_string());
        if let Some(entry) = self.entries.get(&key) {
            if entry.stored_at.elapsed() < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.result.clone());
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores a completed result. Never called with partial data: a failed
    /// analysis caches nothing, so prior entries stay valid until expiry.
    pub fn put(&self, result: AnalysisResult) {
        let key = (result.execution_id, result.agent_name.clone());
        self.entries.insert(
            key,
            CachedEntry {
                result,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn metrics(&self) -> CacheMetrics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheMetrics {
            hits,
            misses,
            hit_ratio: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
            entries: self.entries.len(),
        }
    }

    /// Drops entries older than `max_age`, returning how many were removed.
    pub fn sweep_expired(&self, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < max_age);
        before - self.entries.len()
    }
}

//! Performance analysis for execution traces.
//!
//! Detects bottlenecks, derives optimization suggestions, scores executions,
//! and tracks per-agent baselines and metric trends over time. Results are
//! cached with a TTL so repeated analysis of an unchanged trace is cheap and
//! idempotent.

pub mod analyzer;
pub mod baseline;
pub mod cache;
pub mod config;
pub mod error;
pub mod trend;
pub mod workflow;

pub use analyzer::PerformanceAnalyzer;
pub use cache::CacheMetrics;
pub use config::AnalyzerConfig;
pub use error::AnalyzeError;

//! Application state shared across handlers and connection tasks.
//!
//! [`AppState`] wires the trace store, breakpoint engine, analyzer, event
//! bus, and session registry together with explicit dependency injection;
//! there are no globals. Everything is `Arc`'d so the state clones cheaply
//! into each handler task.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use tracelens_analyze::{AnalyzerConfig, PerformanceAnalyzer};
use tracelens_core::event::EventBus;
use tracelens_core::store::TraceStore;
use tracelens_engine::{BreakpointEngine, EngineConfig, StepSessions};

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state for the HTTP/WebSocket server.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<TraceStore>,
    pub events: Arc<EventBus>,
    pub engine: Arc<BreakpointEngine>,
    pub analyzer: Arc<PerformanceAnalyzer>,
    pub steppers: Arc<StepSessions>,
    pub sessions: Arc<SessionRegistry>,
    /// Server start time, for the health uptime report.
    pub started: Instant,
    /// Total events relayed to WebSocket sessions.
    pub relayed: Arc<AtomicU64>,
}

impl AppState {
    /// Creates the full state with default engine/analyzer tunables and
    /// starts the background retention and maintenance sweeps.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_configs(config, EngineConfig::default(), AnalyzerConfig::default())
    }

    /// Creates the state with explicit engine/analyzer tunables.
    pub fn with_configs(
        config: ServerConfig,
        engine_config: EngineConfig,
        analyzer_config: AnalyzerConfig,
    ) -> Self {
        let store = Arc::new(TraceStore::new());
        let events = Arc::new(EventBus::default());
        let engine = Arc::new(BreakpointEngine::new(engine_config, Arc::clone(&events)));
        let analyzer = Arc::new(PerformanceAnalyzer::new(
            analyzer_config,
            Arc::clone(&store),
            Arc::clone(&events),
        ));
        let sessions = Arc::new(SessionRegistry::new(config.max_connections));

        store.start_retention_sweep(config.sweep_interval, config.trace_retention);
        analyzer.start_maintenance(config.sweep_interval);

        AppState {
            config,
            store,
            events,
            engine,
            analyzer,
            steppers: Arc::new(StepSessions::new()),
            sessions,
            started: Instant::now(),
            relayed: Arc::new(AtomicU64::new(0)),
        }
    }
}

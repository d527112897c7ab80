//! Aggregate statistics and health handlers.

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::Json;

use tracelens_core::store::TraceFilter;
use tracelens_core::trace::ExecutionStatus;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::stats::{HealthResponse, StatsResponse, TraceCounts};
use crate::state::AppState;

/// `GET /stats`
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let mut counts = TraceCounts::default();
    for trace in state.store.list(&TraceFilter::default()) {
        counts.total += 1;
        match trace.status {
            ExecutionStatus::Running => counts.running += 1,
            ExecutionStatus::Completed => counts.completed += 1,
            ExecutionStatus::Failed => counts.failed += 1,
            _ => {}
        }
    }

    Ok(Json(ApiResponse::ok(StatsResponse {
        traces: counts,
        breakpoints: state.engine.breakpoint_count(),
        watches: state.engine.list_watches().len(),
        sessions: state.sessions.count(),
        analysis_cache: state.analyzer.cache_metrics(),
        events_relayed: state.relayed.load(Ordering::Relaxed),
    })))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.started.elapsed().as_secs(),
        sessions: state.sessions.count(),
        events_relayed: state.relayed.load(Ordering::Relaxed),
    })
}

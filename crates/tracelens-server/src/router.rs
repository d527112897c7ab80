//! Router assembly for the tracelens HTTP/WebSocket API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS
//! and tracing middleware layers.

use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive
/// (observer UIs may connect from various origins). TraceLayer provides
/// request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Persistent observer connection
        .route("/ws", get(ws::ws_upgrade))
        // Traces
        .route("/traces", get(handlers::traces::list_traces))
        .route("/traces/{id}", get(handlers::traces::get_trace))
        .route("/traces/{id}/flow", get(handlers::visualization::trace_flow))
        .route(
            "/traces/{id}/tokens",
            get(handlers::visualization::trace_tokens),
        )
        .route(
            "/traces/{id}/decisions",
            get(handlers::visualization::trace_decisions),
        )
        .route(
            "/traces/{id}/analysis",
            get(handlers::analysis::trace_analysis),
        )
        // Workflow aggregation
        .route(
            "/workflows/{id}/analysis",
            get(handlers::analysis::workflow_analysis),
        )
        // Breakpoints
        .route(
            "/breakpoints",
            get(handlers::breakpoints::list_breakpoints)
                .post(handlers::breakpoints::create_breakpoint),
        )
        .route(
            "/breakpoints/{id}",
            delete(handlers::breakpoints::remove_breakpoint)
                .patch(handlers::breakpoints::update_breakpoint),
        )
        // Watch expressions
        .route(
            "/watches",
            get(handlers::watches::list_watches).post(handlers::watches::create_watch),
        )
        .route(
            "/watches/{id}",
            delete(handlers::watches::remove_watch).patch(handlers::watches::update_watch),
        )
        // Observability
        .route("/stats", get(handlers::stats::stats))
        .route("/health", get(handlers::stats::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

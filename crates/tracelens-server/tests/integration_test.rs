//! End-to-end integration tests for the tracelens HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! store/engine/analyzer -> HTTP response. Each test creates a fresh
//! `AppState` and uses `tower::ServiceExt::oneshot` to send requests
//! directly to the router without starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use tracelens_analyze::AnalyzerConfig;
use tracelens_core::ids::WorkflowId;
use tracelens_core::trace::{
    ExecutionStatus, ExecutionStep, ExecutionTrace, StepKind, StepStatus,
};
use tracelens_engine::EngineConfig;
use tracelens_server::config::ServerConfig;
use tracelens_server::router::build_router;
use tracelens_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_state() -> AppState {
    AppState::new(ServerConfig::default())
}

fn test_app(state: &AppState) -> Router {
    build_router(state.clone())
}

async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!(null)))
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!(null)))
}

async fn patch_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!(null)))
}

async fn delete_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!(null)))
}

/// Inserts a completed three-step trace and returns its execution id.
fn seed_trace(state: &AppState, agent: &str) -> ExecutionTrace {
    let mut trace = ExecutionTrace::new(WorkflowId::new(), agent, "summarize the report");
    for (name, kind, duration) in [
        ("prepare", StepKind::Preparation, 5.0),
        ("execute", StepKind::Execution, 42.0),
        ("validate", StepKind::Validation, 3.0),
    ] {
        let mut step = ExecutionStep::new(name, kind);
        step.finish(StepStatus::Completed, duration);
        trace.push_step(step);
    }
    trace.status = ExecutionStatus::Completed;
    trace.performance.duration_ms = 50.0;
    trace.performance.cache_hit_ratio = 1.0;
    trace.token_usage.prompt_tokens = 300;
    trace.token_usage.completion_tokens = 100;
    trace.token_usage.total_tokens = 400;
    state.store.insert(trace.clone());
    trace
}

// ---------------------------------------------------------------------------
// Health and stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let state = test_state();
    let app = test_app(&state);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn stats_counts_traces_and_registrations() {
    let state = test_state();
    let app = test_app(&state);
    seed_trace(&state, "alpha");
    seed_trace(&state, "beta");
    post_json(&app, "/breakpoints", json!({ "agent_name": "alpha" })).await;

    let (status, body) = get_json(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["traces"]["total"], 2);
    assert_eq!(body["data"]["traces"]["completed"], 2);
    assert_eq!(body["data"]["breakpoints"], 1);
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_traces_filters_by_agent() {
    let state = test_state();
    let app = test_app(&state);
    seed_trace(&state, "alpha");
    seed_trace(&state, "alpha");
    seed_trace(&state, "beta");

    let (status, body) = get_json(&app, "/traces?agent_name=alpha").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);

    let (_, all) = get_json(&app, "/traces").await;
    assert_eq!(all["data"]["total"], 3);
}

#[tokio::test]
async fn get_trace_by_id_and_not_found() {
    let state = test_state();
    let app = test_app(&state);
    let trace = seed_trace(&state, "alpha");

    let (status, body) = get_json(&app, &format!("/traces/{}", trace.execution_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agent_name"], "alpha");
    assert_eq!(body["data"]["steps"].as_array().unwrap().len(), 3);

    let (status, body) = get_json(
        &app,
        "/traces/00000000-0000-4000-8000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_trace_id_is_bad_request() {
    let state = test_state();
    let app = test_app(&state);
    let (status, body) = get_json(&app, "/traces/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn flow_diagram_reflects_steps() {
    let state = test_state();
    let app = test_app(&state);
    let trace = seed_trace(&state, "alpha");

    let (status, body) =
        get_json(&app, &format!("/traces/{}/flow", trace.execution_id)).await;
    assert_eq!(status, StatusCode::OK);
    let nodes = body["data"]["nodes"].as_array().unwrap();
    let edges = body["data"]["edges"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(edges.len(), 2);
    assert_eq!(nodes[0]["label"], "prepare");
    assert_eq!(nodes[0]["style"], "solid");
}

#[tokio::test]
async fn token_report_computes_shares() {
    let state = test_state();
    let app = test_app(&state);
    let trace = seed_trace(&state, "alpha");

    let (status, body) =
        get_json(&app, &format!("/traces/{}/tokens", trace.execution_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usage"]["total_tokens"], 400);
    assert!((body["data"]["prompt_share"].as_f64().unwrap() - 0.75).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Breakpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn breakpoint_lifecycle() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = post_json(
        &app,
        "/breakpoints",
        json!({ "agent_name": "alpha", "step_name": "execute" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "alpha:execute");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, listing) = get_json(&app, "/breakpoints").await;
    assert_eq!(listing["data"]["total"], 1);

    let (status, body) = delete_json(&app, &format!("/breakpoints/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);

    let (_, listing) = get_json(&app, "/breakpoints").await;
    assert_eq!(listing["data"]["total"], 0);
}

#[tokio::test]
async fn breakpoint_can_be_disabled_and_reenabled() {
    let state = test_state();
    let app = test_app(&state);

    let (_, body) = post_json(&app, "/breakpoints", json!({ "agent_name": "alpha" })).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) =
        patch_json(&app, &format!("/breakpoints/{id}"), json!({ "enabled": false })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], false);

    let (_, listing) = get_json(&app, "/breakpoints").await;
    assert_eq!(listing["data"]["breakpoints"][0]["enabled"], false);

    let (status, body) =
        patch_json(&app, &format!("/breakpoints/{id}"), json!({ "enabled": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], true);

    let (status, body) = patch_json(
        &app,
        "/breakpoints/00000000-0000-4000-8000-000000000000",
        json!({ "enabled": false }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_condition_is_rejected_at_registration() {
    let state = test_state();
    let app = test_app(&state);
    let (status, body) = post_json(
        &app,
        "/breakpoints",
        json!({ "condition": "duration_ms >" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn breakpoint_capacity_maps_to_429() {
    let state = AppState::with_configs(
        ServerConfig::default(),
        EngineConfig {
            max_breakpoints: 1,
            ..Default::default()
        },
        AnalyzerConfig::default(),
    );
    let app = test_app(&state);

    let (status, _) = post_json(&app, "/breakpoints", json!({ "agent_name": "a" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post_json(&app, "/breakpoints", json!({ "agent_name": "b" })).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn conditions_disabled_maps_to_403() {
    let state = AppState::with_configs(
        ServerConfig::default(),
        EngineConfig {
            allow_conditions: false,
            ..Default::default()
        },
        AnalyzerConfig::default(),
    );
    let app = test_app(&state);

    let (status, body) = post_json(
        &app,
        "/breakpoints",
        json!({ "condition": "tokens.total > 100" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FEATURE_DISABLED");
}

// ---------------------------------------------------------------------------
// Watches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn watch_lifecycle() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = post_json(
        &app,
        "/watches",
        json!({ "expression": "performance.duration_ms" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, listing) = get_json(&app, "/watches").await;
    assert_eq!(listing["data"]["total"], 1);

    let (status, body) = delete_json(&app, &format!("/watches/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);
}

#[tokio::test]
async fn watch_can_be_disabled() {
    let state = test_state();
    let app = test_app(&state);

    let (_, body) = post_json(
        &app,
        "/watches",
        json!({ "expression": "tokens.total" }),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) =
        patch_json(&app, &format!("/watches/{id}"), json!({ "enabled": false })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], false);

    let (status, _) = patch_json(
        &app,
        "/watches/00000000-0000-4000-8000-000000000000",
        json!({ "enabled": false }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparseable_watch_is_rejected() {
    let state = test_state();
    let app = test_app(&state);
    let (status, _) = post_json(&app, "/watches", json!({ "expression": "a &&" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trace_analysis_returns_scores() {
    let state = test_state();
    let app = test_app(&state);
    let trace = seed_trace(&state, "alpha");

    let (status, body) =
        get_json(&app, &format!("/traces/{}/analysis", trace.execution_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["performance_score"], 100.0);
    assert_eq!(body["data"]["reliability_score"], 100.0);
    assert!(body["data"]["bottlenecks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn workflow_analysis_aggregates_traces() {
    let state = test_state();
    let app = test_app(&state);
    let first = seed_trace(&state, "alpha");
    let mut second = ExecutionTrace::new(first.workflow_id, "beta", "task");
    second.status = ExecutionStatus::Completed;
    second.performance.cache_hit_ratio = 1.0;
    state.store.insert(second);

    let (status, body) =
        get_json(&app, &format!("/workflows/{}/analysis", first.workflow_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["trace_count"], 2);
    assert_eq!(body["data"]["sequential_execution_opportunity"], true);

    let (status, _) = get_json(
        &app,
        "/workflows/00000000-0000-4000-8000-000000000000/analysis",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

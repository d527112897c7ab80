//! Binary entrypoint for the tracelens broadcast server.
//!
//! Reads configuration from environment variables:
//! - `TRACELENS_PORT`: listen port (default 3000)
//! - `TRACELENS_MAX_CONNECTIONS`: WebSocket session cap (default 100)
//! - `TRACELENS_HEARTBEAT_SECS`: heartbeat interval (default 30)
//! - `TRACELENS_SEND_QUEUE`: per-connection queue capacity (default 256)
//! - `TRACELENS_RETENTION_HOURS`: trace retention window (default 24)

use tracelens_server::config::ServerConfig;
use tracelens_server::router::build_router;
use tracelens_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config);
    let app = build_router(state);

    tracing::info!("tracelens server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind {addr}: {err}"));
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|err| panic!("server error: {err}"));
}

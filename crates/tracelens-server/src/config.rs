//! Server configuration, read from environment variables at startup.

use std::time::Duration;

/// Tunables for the broadcast server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP listen port.
    pub port: u16,
    /// Maximum concurrent WebSocket sessions; connection attempts above the
    /// cap are closed with code 4429.
    pub max_connections: usize,
    /// Interval between server heartbeat pings. A connection that missed
    /// the previous ping is pruned on the next tick.
    pub heartbeat_interval: Duration,
    /// Per-connection outbound queue capacity. A consumer that overflows
    /// its queue is disconnected rather than slowing the publisher.
    pub send_queue_capacity: usize,
    /// How long terminal traces are retained before eviction.
    pub trace_retention: Duration,
    /// Interval of the retention/maintenance sweeps.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 3000,
            max_connections: 100,
            heartbeat_interval: Duration::from_secs(30),
            send_queue_capacity: 256,
            trace_retention: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl ServerConfig {
    /// Reads configuration from `TRACELENS_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        ServerConfig {
            port: env_parse("TRACELENS_PORT").unwrap_or(defaults.port),
            max_connections: env_parse("TRACELENS_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            heartbeat_interval: env_parse("TRACELENS_HEARTBEAT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.heartbeat_interval),
            send_queue_capacity: env_parse("TRACELENS_SEND_QUEUE")
                .unwrap_or(defaults.send_queue_capacity),
            trace_retention: env_parse("TRACELENS_RETENTION_HOURS")
                .map(|h: u64| Duration::from_secs(h * 60 * 60))
                .unwrap_or(defaults.trace_retention),
            sweep_interval: defaults.sweep_interval,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

//! HTTP and WebSocket broadcast server for execution debugging.
//!
//! Exposes the trace store, breakpoint engine, and performance analyzer
//! over a REST query surface plus a persistent WebSocket connection with
//! server-side filtered event fan-out.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod sessions;
pub mod state;
pub mod ws;

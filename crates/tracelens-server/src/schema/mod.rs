//! Request/response types for the HTTP API and WebSocket protocol.

pub mod breakpoints;
pub mod common;
pub mod stats;
pub mod traces;
pub mod visualization;
pub mod watches;
pub mod ws;

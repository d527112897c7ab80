//! WebSocket endpoint: session lifecycle, typed message handling, event
//! fan-out, and heartbeat pruning.
//!
//! Each connection runs three tasks: the writer (drains the bounded send
//! queue into the socket), the relay (subscribes to the event bus and
//! forwards events this session should see), and the main loop (inbound
//! messages plus heartbeat ticks). A consumer that overflows its send queue
//! or misses a heartbeat is disconnected; publishers are never blocked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::sync::mpsc;

use tracelens_core::ids::SessionId;

use crate::error::ApiError;
use crate::schema::ws::{ClientMessage, Envelope};
use crate::sessions::Outbound;
use crate::state::AppState;

/// Close code sent when the connection cap is reached.
pub const CLOSE_CAPACITY: u16 = 4429;

/// `GET /ws`
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let (queue_tx, queue_rx) = mpsc::channel(state.config.send_queue_capacity);
    let Some((session, alive)) = state.sessions.register(queue_tx) else {
        reject_over_capacity(socket).await;
        return;
    };
    let session_id = session.session_id;
    tracing::info!(%session_id, "session connected");

    let (sink, stream) = socket.split();
    let writer = spawn_writer(sink, queue_rx);
    let relay = spawn_relay(state.clone(), session_id);

    let welcome = Envelope::new(
        "connection:welcome",
        serde_json::json!({
            "sessionId": session_id,
            "capabilities": [
                "trace:subscribe",
                "breakpoint:set",
                "breakpoint:remove",
                "execution:step",
                "visualization:config",
                "ping",
            ],
            "heartbeatIntervalMs": state.config.heartbeat_interval.as_millis() as u64,
        }),
    )
    .with_session(session_id);
    state
        .sessions
        .try_send(&session_id, Outbound::Text(welcome.to_json()));

    run_session(&state, session_id, &alive, stream).await;

    state.sessions.remove(&session_id);
    relay.abort();
    writer.abort();
    tracing::info!(%session_id, "session disconnected");
}

/// Above the cap the socket is accepted, then immediately closed with 4429;
/// existing connections are untouched.
async fn reject_over_capacity(socket: WebSocket) {
    let (mut sink, _stream) = socket.split();
    let _ = sink
        .send(Message::Close(Some(CloseFrame {
            code: CLOSE_CAPACITY,
            reason: "connection limit reached".into(),
        })))
        .await;
    tracing::warn!("connection rejected: session limit reached");
}

fn spawn_writer(
    mut sink: futures_util::stream::SplitSink<WebSocket, Message>,
    mut queue_rx: mpsc::Receiver<Outbound>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = queue_rx.recv().await {
            let message = match frame {
                Outbound::Text(json) => Message::Text(json.into()),
                Outbound::Ping => Message::Ping(Bytes::new()),
            };
            if sink.send(message).await.is_err() {
                break;
            }
        }
    })
}

/// Forwards bus events this session should see into its send queue.
fn spawn_relay(state: AppState, session_id: SessionId) -> tokio::task::JoinHandle<()> {
    let mut bus = state.events.subscribe();
    tokio::spawn(async move {
        loop {
            match bus.recv().await {
                Ok(event) => {
                    let deliver = match event.execution_scope() {
                        Some(scope) => state.sessions.is_subscribed(&session_id, &scope),
                        // Unscoped events (breakpoint lifecycle) go to everyone.
                        None => true,
                    };
                    if !deliver {
                        continue;
                    }
                    let envelope = Envelope::from_event(&event).with_session(session_id);
                    if !state
                        .sessions
                        .try_send(&session_id, Outbound::Text(envelope.to_json()))
                    {
                        tracing::warn!(%session_id, "send queue overflow, disconnecting");
                        state.sessions.remove(&session_id);
                        break;
                    }
                    state.relayed.fetch_add(1, Ordering::Relaxed);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(%session_id, skipped, "event relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn run_session(
    state: &AppState,
    session_id: SessionId,
    alive: &Arc<AtomicBool>,
    mut stream: futures_util::stream::SplitStream<WebSocket>,
) {
    let mut heartbeat = tokio::time::interval(state.config.heartbeat_interval);
    // Consume the immediate first tick.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        state.sessions.mark_alive(&session_id);
                        handle_message(state, session_id, text.as_str());
                    }
                    Some(Ok(Message::Pong(_))) | Some(Ok(Message::Ping(_))) => {
                        state.sessions.mark_alive(&session_id);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
            _ = heartbeat.tick() => {
                // Mark-and-sweep: a session that stayed silent for a whole
                // interval is pruned.
                if !alive.swap(false, Ordering::Relaxed) {
                    tracing::info!(%session_id, "missed heartbeat, pruning");
                    break;
                }
                if !state.sessions.try_send(&session_id, Outbound::Ping) {
                    break;
                }
            }
        }
    }
}

/// Handles one typed client message. Malformed input gets an in-band
/// `error` event; the connection stays open.
fn handle_message(state: &AppState, session_id: SessionId, raw: &str) {
    let reply = match serde_json::from_str::<ClientMessage>(raw) {
        Err(err) => Some(Envelope::error(
            "BAD_MESSAGE",
            format!("malformed message: {err}"),
        )),
        Ok(message) => dispatch(state, session_id, message),
    };
    if let Some(envelope) = reply {
        state
            .sessions
            .try_send(&session_id, Outbound::Text(envelope.with_session(session_id).to_json()));
    }
}

fn dispatch(
    state: &AppState,
    session_id: SessionId,
    message: ClientMessage,
) -> Option<Envelope> {
    match message {
        ClientMessage::TraceSubscribe {
            execution_id,
            subscribe: false,
        } => {
            state.sessions.unsubscribe(&session_id, &execution_id);
            Some(Envelope::new(
                "trace:unsubscribed",
                serde_json::json!({ "executionId": execution_id }),
            ))
        }
        ClientMessage::TraceSubscribe {
            execution_id,
            subscribe: true,
        } => {
            state.sessions.subscribe(&session_id, execution_id);
            match state.store.get(&execution_id) {
                Some(trace) => Some(Envelope::new(
                    "trace:data",
                    serde_json::json!({ "trace": trace }),
                )),
                // Subscription is kept: the trace may start later.
                None => Some(Envelope::error(
                    "NOT_FOUND",
                    format!("trace {execution_id} not found"),
                )),
            }
        }
        ClientMessage::BreakpointSet(spec) => match state.engine.add_breakpoint(spec) {
            Ok(breakpoint) => {
                state.sessions.own_breakpoint(&session_id, breakpoint.id);
                Some(Envelope::new(
                    "breakpoint:set",
                    serde_json::json!({ "breakpoint": breakpoint }),
                ))
            }
            Err(err) => Some(engine_error(err)),
        },
        ClientMessage::BreakpointRemove { breakpoint_id } => {
            let removed = state.engine.remove_breakpoint(&breakpoint_id);
            Some(Envelope::new(
                "breakpoint:removed",
                serde_json::json!({ "breakpointId": breakpoint_id, "removed": removed }),
            ))
        }
        ClientMessage::ExecutionStep {
            execution_id,
            command,
        } => match state.steppers.send(execution_id, command) {
            Ok(()) => None,
            Err(err) => Some(engine_error(err)),
        },
        ClientMessage::VisualizationConfig(patch) => {
            match state.sessions.apply_visualization(&session_id, &patch) {
                Some(config) => Some(Envelope::new(
                    "visualization:config-updated",
                    serde_json::json!({ "config": config }),
                )),
                None => Some(Envelope::error("NOT_FOUND", "session not found")),
            }
        }
        ClientMessage::Ping => Some(Envelope::new("pong", serde_json::json!({}))),
    }
}

fn engine_error(err: tracelens_engine::EngineError) -> Envelope {
    let api: ApiError = err.into();
    let (_, code) = api.status_and_code();
    Envelope::error(code, api.to_string())
}

//! Connected-session registry.
//!
//! Each WebSocket connection registers one [`DebugSession`] here. The
//! registry is the single source of truth for subscription filtering: the
//! per-connection relay task asks it whether a scoped event should be
//! delivered. Entries carry a mark-and-sweep alive flag driven by the
//! heartbeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use tracelens_core::debug::{DebugSession, VisualizationConfig, VisualizationConfigPatch};
use tracelens_core::ids::{BreakpointId, ExecutionId, SessionId};

/// Outbound frame queued to one connection's writer task.
#[derive(Debug)]
pub enum Outbound {
    /// A serialized JSON envelope.
    Text(String),
    /// A protocol-level heartbeat ping.
    Ping,
}

struct SessionEntry {
    session: DebugSession,
    tx: mpsc::Sender<Outbound>,
    alive: Arc<AtomicBool>,
}

/// Registry of live observer sessions keyed by session id.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionEntry>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        SessionRegistry {
            sessions: DashMap::new(),
            max_sessions,
        }
    }

    /// Registers a new session, unless the connection cap is reached.
    ///
    /// Returns the created session snapshot and its alive flag.
    pub fn register(
        &self,
        tx: mpsc::Sender<Outbound>,
    ) -> Option<(DebugSession, Arc<AtomicBool>)> {
        if self.sessions.len() >= self.max_sessions {
            return None;
        }
        let session = DebugSession::new(SessionId::new());
        let alive = Arc::new(AtomicBool::new(true));
        self.sessions.insert(
            session.session_id,
            SessionEntry {
                session: session.clone(),
                tx,
                alive: Arc::clone(&alive),
            },
        );
        Some((session, alive))
    }

    /// Removes a session; idempotent.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Subscribes a session to an execution's events.
    pub fn subscribe(&self, id: &SessionId, execution_id: ExecutionId) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.session.subscribed.insert(execution_id);
                true
            }
            None => false,
        }
    }

    /// Drops a session's subscription to an execution. Returns `false` when
    /// the session is gone or was not subscribed.
    pub fn unsubscribe(&self, id: &SessionId, execution_id: &ExecutionId) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => entry.session.subscribed.remove(execution_id),
            None => false,
        }
    }

    /// Whether the session is subscribed to the given execution.
    pub fn is_subscribed(&self, id: &SessionId, execution_id: &ExecutionId) -> bool {
        self.sessions
            .get(id)
            .map(|entry| entry.session.subscribed.contains(execution_id))
            .unwrap_or(false)
    }

    /// Records that this session created the breakpoint.
    pub fn own_breakpoint(&self, id: &SessionId, breakpoint_id: BreakpointId) {
        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.session.owned_breakpoints.insert(breakpoint_id);
        }
    }

    /// Applies a visualization patch, returning the updated config.
    pub fn apply_visualization(
        &self,
        id: &SessionId,
        patch: &VisualizationConfigPatch,
    ) -> Option<VisualizationConfig> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.session.visualization.apply(patch);
            entry.session.visualization.clone()
        })
    }

    /// Queues an outbound frame without blocking.
    ///
    /// Returns false when the session is gone or its queue is full; the
    /// caller treats either as a dead consumer.
    pub fn try_send(&self, id: &SessionId, frame: Outbound) -> bool {
        match self.sessions.get(id) {
            Some(entry) => entry.tx.try_send(frame).is_ok(),
            None => false,
        }
    }

    /// Marks a session alive, for heartbeat bookkeeping.
    pub fn mark_alive(&self, id: &SessionId) {
        if let Some(entry) = self.sessions.get(id) {
            entry.alive.store(true, Ordering::Relaxed);
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Session snapshots, for the stats surface.
    pub fn list(&self) -> Vec<DebugSession> {
        self.sessions
            .iter()
            .map(|entry| entry.session.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> mpsc::Sender<Outbound> {
        mpsc::channel(8).0
    }

    #[test]
    fn cap_rejects_extra_sessions() {
        let registry = SessionRegistry::new(2);
        assert!(registry.register(channel()).is_some());
        assert!(registry.register(channel()).is_some());
        assert!(registry.register(channel()).is_none());
    }

    #[test]
    fn removing_frees_a_slot() {
        let registry = SessionRegistry::new(1);
        let (session, _alive) = registry.register(channel()).unwrap();
        assert!(registry.register(channel()).is_none());
        assert!(registry.remove(&session.session_id));
        assert!(registry.register(channel()).is_some());
    }

    #[test]
    fn subscriptions_filter_per_session() {
        let registry = SessionRegistry::new(4);
        let (a, _) = registry.register(channel()).unwrap();
        let (b, _) = registry.register(channel()).unwrap();
        let execution = ExecutionId::new();

        assert!(registry.subscribe(&a.session_id, execution));
        assert!(registry.is_subscribed(&a.session_id, &execution));
        assert!(!registry.is_subscribed(&b.session_id, &execution));
    }

    #[test]
    fn unsubscribe_drops_only_that_subscription() {
        let registry = SessionRegistry::new(4);
        let (session, _) = registry.register(channel()).unwrap();
        let kept = ExecutionId::new();
        let dropped = ExecutionId::new();
        registry.subscribe(&session.session_id, kept);
        registry.subscribe(&session.session_id, dropped);

        assert!(registry.unsubscribe(&session.session_id, &dropped));
        assert!(!registry.is_subscribed(&session.session_id, &dropped));
        assert!(registry.is_subscribed(&session.session_id, &kept));
        // Idempotent, and safe for unknown sessions.
        assert!(!registry.unsubscribe(&session.session_id, &dropped));
        assert!(!registry.unsubscribe(&SessionId::new(), &kept));
    }

    #[test]
    fn full_queue_reports_dead_consumer() {
        let registry = SessionRegistry::new(4);
        let (tx, _rx) = mpsc::channel(1);
        let (session, _) = registry.register(tx).unwrap();
        assert!(registry.try_send(&session.session_id, Outbound::Ping));
        // Queue of one is now full; the consumer never drained it.
        assert!(!registry.try_send(&session.session_id, Outbound::Ping));
    }
}

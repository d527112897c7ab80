//! Advisory step-through sessions.
//!
//! Step commands are signals a cooperating execution host polls or
//! subscribes to; the engine never suspends a thread itself. Each session is
//! a `tokio::sync::watch` channel keyed by execution id: the host holds the
//! receiver and reacts to commands at its own step boundaries. A host that
//! wants hard suspension can block on the channel until the command changes.

use dashmap::DashMap;
use tokio::sync::watch;

use tracelens_core::debug::StepCommand;
use tracelens_core::ids::ExecutionId;

use crate::error::EngineError;

/// Registry of advisory step sessions.
pub struct StepSessions {
    sessions: DashMap<ExecutionId, watch::Sender<StepCommand>>,
}

impl StepSessions {
    pub fn new() -> Self {
        StepSessions {
            sessions: DashMap::new(),
        }
    }

    /// Starts a step session for an execution, returning the receiver the
    /// execution host should subscribe to. Starting a session that already
    /// exists replaces it.
    pub fn start(&self, execution_id: ExecutionId) -> watch::Receiver<StepCommand> {
        let (tx, rx) = watch::channel(StepCommand::Pause);
        self.sessions.insert(execution_id, tx);
        rx
    }

    /// Sends a step command to an active session.
    pub fn send(
        &self,
        execution_id: ExecutionId,
        command: StepCommand,
    ) -> Result<(), EngineError> {
        let entry = self
            .sessions
            .get(&execution_id)
            .ok_or(EngineError::NoStepSession(execution_id))?;
        // A closed channel means the host dropped its receiver; the session
        // is dead either way.
        entry
            .send(command)
            .map_err(|_| EngineError::NoStepSession(execution_id))
    }

    /// Returns the receiver for an existing session, if any.
    pub fn subscribe(&self, execution_id: &ExecutionId) -> Option<watch::Receiver<StepCommand>> {
        self.sessions.get(execution_id).map(|tx| tx.subscribe())
    }

    /// Stops a step session. Idempotent.
    pub fn stop(&self, execution_id: &ExecutionId) -> bool {
        if let Some((_, tx)) = self.sessions.remove(execution_id) {
            // Best effort: tell the host to resume before dropping.
            let _ = tx.send(StepCommand::Run);
            true
        } else {
            false
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for StepSessions {
    fn default() -> Self {
        Self::new()
    }
}

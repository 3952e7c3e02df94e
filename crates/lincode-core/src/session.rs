//! In-memory session store.
//!
//! Maps a caller-supplied session id to its conversation history. Each
//! session sits behind its own async mutex so a chat request can hold it for
//! the whole append -> stream -> commit/rollback sequence without blocking
//! requests for other sessions.
//!
//! Sessions are created lazily and live until cleared or the process exits.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use lincode_types::chat::{Turn, TurnRole};

/// Shared, lockable handle to one session's history.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Ordered conversation history for one session.
#[derive(Debug, Default)]
pub struct Session {
    turns: Vec<Turn>,
}

impl Session {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn to the end of the history.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Remove the last turn if it is a user turn.
    ///
    /// Returns the removed turn, or `None` when the tail is an assistant
    /// turn or the history is empty.
    pub fn pop_trailing_user(&mut self) -> Option<Turn> {
        match self.turns.last() {
            Some(turn) if turn.role == TurnRole::User => self.turns.pop(),
            _ => None,
        }
    }
}

/// Process-wide mapping from session id to session.
///
/// At most one session exists per id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `session_id`, creating an empty one if absent.
    pub fn get_or_create(&self, session_id: &str) -> SessionHandle {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Remove the session if present. Clearing an unknown id is a no-op.
    ///
    /// Returns whether a session was removed.
    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Copy of the session's turns, waiting for any in-flight request on it.
    pub async fn snapshot(&self, session_id: &str) -> Option<Vec<Turn>> {
        // Clone the handle first so no map shard guard is held across the await.
        let handle = self.sessions.get(session_id)?.value().clone();
        let session = handle.lock().await;
        Some(session.turns().to_vec())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

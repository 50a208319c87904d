//! Conversation state and session storage
//!
//! A [`SessionState`] is owned by one conversation. Its history is
//! append-only; the scratch map carries intermediate results between turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use crate::{Error, Message, Result};

/// Well-known scratch keys
pub mod keys {
    /// Trace of the most recent coordinator turn
    pub const LAST_TURN: &str = "last_turn";
}

/// State accumulated over one conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    session_id: String,
    history: Vec<Message>,
    scratch: Map<String, Value>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl SessionState {
    /// Start a new, empty session
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            history: Vec::new(),
            scratch: Map::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Session identifier
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Messages exchanged so far, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Append a message to the history
    pub fn append(&mut self, message: Message) {
        self.history.push(message);
        self.touch();
    }

    /// When the session was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the session last changed
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Whether the session has been idle longer than `max_age_seconds`
    pub fn is_expired(&self, max_age_seconds: i64) -> bool {
        Utc::now() - self.last_active > chrono::Duration::seconds(max_age_seconds)
    }

    fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    // =========== Scratch Operations ===========

    /// Insert a scratch value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.scratch.insert(key.into(), value);
        self.touch();
    }

    /// Get a scratch value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scratch.get(key)
    }

    /// Insert a typed scratch value
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| Error::Session(format!("Failed to serialize scratch value: {e}")))?;
        self.insert(key, json_value);
        Ok(())
    }

    /// Get a typed scratch value
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.scratch.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Session(format!("Failed to deserialize scratch value: {e}"))),
        }
    }

    /// Remove a scratch value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.scratch.remove(key)
    }
}

/// Keyed storage of sessions
pub trait SessionStore: Send + Sync {
    /// Load a session, creating it on first use or after expiry
    fn get_or_create(&self, session_id: &str) -> Result<SessionState>;

    /// Load a session without creating it
    fn get(&self, session_id: &str) -> Result<Option<SessionState>>;

    /// Persist a session
    fn save(&self, session: SessionState) -> Result<()>;

    /// Tear a session down
    fn remove(&self, session_id: &str) -> Result<bool>;

    /// Drop sessions idle longer than the retention window
    fn cleanup_expired(&self) -> Result<usize>;
}

/// Process-local session store with a retention TTL
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
    ttl_seconds: i64,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    /// Create a store with a one hour retention window
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl_seconds: 3600,
        }
    }

    /// Set the retention window
    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Session(format!("Lock error: {e}"))
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, session_id: &str) -> Result<SessionState> {
        let mut sessions = self.sessions.write().map_err(lock_error)?;
        if let Some(session) = sessions.get(session_id) {
            if !session.is_expired(self.ttl_seconds) {
                return Ok(session.clone());
            }
            debug!(session_id, "session expired, starting over");
        }

        let session = SessionState::new(session_id);
        sessions.insert(session_id.to_string(), session.clone());
        Ok(session)
    }

    fn get(&self, session_id: &str) -> Result<Option<SessionState>> {
        let sessions = self.sessions.read().map_err(lock_error)?;
        Ok(sessions.get(session_id).cloned())
    }

    fn save(&self, session: SessionState) -> Result<()> {
        self.sessions
            .write()
            .map_err(lock_error)?
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    fn remove(&self, session_id: &str) -> Result<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(lock_error)?
            .remove(session_id)
            .is_some())
    }

    fn cleanup_expired(&self) -> Result<usize> {
        let mut sessions = self.sessions.write().map_err(lock_error)?;
        let initial_count = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl_seconds));
        let removed = initial_count - sessions.len();
        if removed > 0 {
            debug!(removed, "dropped expired sessions");
        }
        Ok(removed)
    }
}

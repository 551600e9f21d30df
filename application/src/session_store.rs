//! Session Store service.
//!
//! Holds the in-memory ordered session collection for the signed-in user
//! and persists it through the [`KeyValueStore`] port. Persistence is
//! best-effort: a full store evicts its single oldest session and retries
//! the write exactly once; a second failure is logged and swallowed.

use crate::ports::key_value_store::{KeyValueStore, StoreError};
use palaver_domain::Session;
use std::sync::Arc;
use tracing::warn;

/// Persistence key for the signed-in username.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Persistence key for a user's session collection.
pub fn history_key(user: &str) -> String {
    format!("chatHistory_{user}")
}

/// In-memory session collection for one user, ordered oldest-first,
/// persisted on every change.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    user: String,
    sessions: Vec<Session>,
}

impl SessionStore {
    /// Open the store for `user`, loading any persisted history.
    ///
    /// Records the user as the current one. A corrupt history entry is
    /// dropped and replaced with an empty collection.
    pub fn open(store: Arc<dyn KeyValueStore>, user: impl Into<String>) -> Self {
        let user = user.into();
        if let Err(e) = store.set(CURRENT_USER_KEY, &user) {
            warn!("could not persist current user: {e}");
        }
        let sessions = Self::load(store.as_ref(), &user);
        Self {
            store,
            user,
            sessions,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// All sessions, oldest first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    /// Insert or replace a session by id, then persist.
    ///
    /// The session carries its own derived title, so replacing it updates
    /// the title along with the message list.
    pub fn upsert(&mut self, session: Session) {
        match self.sessions.iter_mut().find(|s| s.id() == session.id()) {
            Some(existing) => *existing = session,
            None => self.sessions.push(session),
        }
        self.persist();
    }

    /// Remove a session by id, then persist.
    pub fn remove(&mut self, id: &str) {
        self.sessions.retain(|s| s.id() != id);
        self.persist();
    }

    /// Drop all sessions and the persisted entry.
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.store.remove(&history_key(&self.user));
    }

    /// Discard in-memory state and load the (disjoint) collection of the
    /// new user.
    pub fn switch_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
        if let Err(e) = self.store.set(CURRENT_USER_KEY, &self.user) {
            warn!("could not persist current user: {e}");
        }
        self.sessions = Self::load(self.store.as_ref(), &self.user);
    }

    fn load(store: &dyn KeyValueStore, user: &str) -> Vec<Session> {
        let key = history_key(user);
        let Some(raw) = store.get(&key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("corrupt session history for {user}: {e}; resetting");
                store.remove(&key);
                Vec::new()
            }
        }
    }

    /// Persist the collection, evicting the oldest session once on quota
    /// overflow. The in-memory update always stands.
    fn persist(&mut self) {
        let key = history_key(&self.user);
        if self.sessions.is_empty() {
            self.store.remove(&key);
            return;
        }

        match self.try_write(&key) {
            Ok(()) => {}
            Err(StoreError::QuotaExceeded) => {
                let evicted = self.sessions.remove(0);
                warn!(
                    "history over capacity; evicted oldest session '{}'",
                    evicted.title()
                );
                if self.sessions.is_empty() {
                    self.store.remove(&key);
                    return;
                }
                if let Err(e) = self.try_write(&key) {
                    warn!("history persistence failed after eviction: {e}");
                }
            }
            Err(e) => warn!("history persistence failed: {e}"),
        }
    }

    fn try_write(&self, key: &str) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.sessions)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        self.store.set(key, &json)
    }
}

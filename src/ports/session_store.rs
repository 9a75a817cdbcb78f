//! Session Store Port - Live conversation session storage.
//!
//! Unlike the sinks, session storage is load-bearing: a turn cannot proceed
//! if its session cannot be read or written, so these errors propagate to
//! the caller.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::booking::ConversationSession;

/// Port for storing live conversation sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by id.
    async fn get(&self, session_id: &str) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Insert or replace a session.
    async fn put(&self, session: ConversationSession) -> Result<(), SessionStoreError>;

    /// Remove a session. Returns true when something was removed.
    async fn remove(&self, session_id: &str) -> Result<bool, SessionStoreError>;

    /// Remove every session idle for at least `idle_for`.
    ///
    /// Returns the ids of the sessions that were expired.
    async fn sweep_idle(&self, idle_for: Duration) -> Result<Vec<String>, SessionStoreError>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize, SessionStoreError>;
}

/// Session storage errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// The backing store failed.
    #[error("session store backend error: {0}")]
    Backend(String),
}

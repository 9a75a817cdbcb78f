//! In-memory session store.
//!
//! The default store for a single-node deployment. Sessions live in a
//! process-local map and are reaped by the idle sweeper.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::booking::ConversationSession;
use crate::ports::{SessionStore, SessionStoreError};

/// Session store backed by a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, ConversationSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops everything. For tests.
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(
        &self,
        session_id: &str,
    ) -> Result<Option<ConversationSession>, SessionStoreError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn put(&self, session: ConversationSession) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(session.session_id().to_string(), session);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }

    async fn sweep_idle(&self, idle_for: Duration) -> Result<Vec<String>, SessionStoreError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .values()
            .filter(|session| session.is_idle(now, idle_for))
            .map(|session| session.session_id().to_string())
            .collect();
        for session_id in &expired {
            sessions.remove(session_id);
        }
        Ok(expired)
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let store = InMemorySessionStore::new();
        store.put(ConversationSession::new("a")).await.unwrap();
        assert!(store.get("a").await.unwrap().is_some());
        assert!(store.get("b").await.unwrap().is_none());
        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
    }

    #[tokio::test]
    async fn put_replaces_existing_session() {
        let store = InMemorySessionStore::new();
        let mut session = ConversationSession::new("a");
        store.put(session.clone()).await.unwrap();
        session.push_user("hello");
        store.put(session).await.unwrap();
        let loaded = store.get("a").await.unwrap().unwrap();
        assert_eq!(loaded.messages().len(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sweep_expires_only_idle_sessions() {
        let store = InMemorySessionStore::new();
        store.put(ConversationSession::new("fresh")).await.unwrap();
        let expired = store.sweep_idle(Duration::from_secs(3600)).await.unwrap();
        assert!(expired.is_empty());
        let expired = store.sweep_idle(Duration::ZERO).await.unwrap();
        assert_eq!(expired, vec!["fresh".to_string()]);
        assert_eq!(store.len().await, 0);
    }
}

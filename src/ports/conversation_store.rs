//! Conversation Store Port - Durable conversation transcripts.

use async_trait::async_trait;

use crate::domain::booking::{ConversationSession, MessageSource};

use super::SinkError;

/// Port for persisting conversation transcripts.
///
/// Saved after every turn so a transcript survives even if the session is
/// swept or the process restarts. Best-effort, like the other sinks.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist the session's transcript and collected data.
    async fn save_conversation(
        &self,
        session: &ConversationSession,
        source: MessageSource,
    ) -> Result<(), SinkError>;
}

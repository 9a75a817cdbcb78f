//! Reply Generator Port - Interface for conversational reply generation.
//!
//! This port abstracts the language model behind the receptionist. The
//! conversation manager hands it the current state, the collected fields and
//! a window of recent dialogue; the implementation produces the next thing
//! the receptionist says.
//!
//! Reply generation is best-effort: every error variant here is survivable,
//! and the manager falls back to a canned state prompt when generation fails.

use async_trait::async_trait;

use crate::domain::booking::{BookingFields, ChatMessage, ConversationState};

/// Everything an implementation needs to phrase the next reply.
#[derive(Debug, Clone)]
pub struct ReplyRequest<'a> {
    /// State the conversation is in after this turn's transition.
    pub state: ConversationState,
    /// Fields collected so far; lets the generator avoid re-asking.
    pub fields: &'a BookingFields,
    /// Recent dialogue window, oldest first.
    pub recent_messages: &'a [ChatMessage],
}

/// Port for generating the receptionist's replies.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate the next assistant reply for the given turn.
    async fn generate_reply(&self, request: ReplyRequest<'_>) -> Result<String, ReplyError>;
}

/// Reply generation errors. All recoverable; the caller substitutes a
/// deterministic fallback reply.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Request exceeded its deadline.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),
}

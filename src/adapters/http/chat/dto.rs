//! HTTP DTOs for the chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent
//! evolution.

use serde::{Deserialize, Serialize};

use crate::application::TurnOutcome;
use crate::domain::booking::{
    BookingFields, ChatMessage, ConversationSession, ConversationState, FieldKind, MessageSource,
};
use crate::domain::qualification::QualificationReport;

/// Request to send a message into a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageRequest {
    /// Omit to start a new conversation; the server assigns an id.
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
    /// Transport the message arrived on. Defaults to chat.
    #[serde(default = "default_source")]
    pub source: MessageSource,
}

fn default_source() -> MessageSource {
    MessageSource::Chat
}

/// Response for one processed turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub session_id: String,
    pub reply: String,
    pub state: ConversationState,
    pub data: BookingFields,
    pub missing_fields: Vec<FieldKind>,
    pub is_complete: bool,
    pub qualification: QualificationReport,
}

impl ChatMessageResponse {
    pub fn from_outcome(outcome: TurnOutcome) -> Self {
        Self {
            session_id: outcome.session_id,
            reply: outcome.reply,
            state: outcome.state,
            data: outcome.fields,
            missing_fields: outcome.missing_fields,
            is_complete: outcome.is_complete,
            qualification: outcome.qualification,
        }
    }
}

/// Full session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: ConversationState,
    pub data: BookingFields,
    pub messages: Vec<ChatMessage>,
    pub turn_count: u32,
}

impl From<ConversationSession> for SessionResponse {
    fn from(session: ConversationSession) -> Self {
        Self {
            session_id: session.session_id().to_string(),
            state: session.state(),
            data: session.fields().clone(),
            messages: session.messages().to_vec(),
            turn_count: session.turn_count(),
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

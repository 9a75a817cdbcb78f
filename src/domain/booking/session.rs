//! The conversation session aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use super::fields::BookingFields;
use super::message::{ChatMessage, MessageRole};
use super::state::ConversationState;

/// One caller's ongoing booking conversation.
///
/// Message history is append-only; only a bounded recent window is ever
/// handed to the reply generator. The set of checkpoint states already
/// logged travels with the session so a reloaded session cannot re-emit a
/// booking event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    session_id: String,
    state: ConversationState,
    fields: BookingFields,
    messages: Vec<ChatMessage>,
    turn_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    logged_checkpoints: BTreeSet<String>,
}

impl ConversationSession {
    /// Creates a fresh session in the greeting state.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            state: ConversationState::Greeting,
            fields: BookingFields::default(),
            messages: Vec::new(),
            turn_count: 0,
            created_at: now,
            updated_at: now,
            logged_checkpoints: BTreeSet::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn fields(&self) -> &BookingFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut BookingFields {
        self.updated_at = Utc::now();
        &mut self.fields
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the session to a new state.
    pub fn set_state(&mut self, state: ConversationState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Appends a user turn to the history.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    /// Appends an assistant turn to the history.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.turn_count += 1;
        self.updated_at = Utc::now();
    }

    /// The most recent `window` messages, oldest first.
    ///
    /// History itself is never truncated; this view is for reply generation.
    pub fn recent_messages(&self, window: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// The latest user message, if any.
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
    }

    /// Records that a booking event was emitted for a checkpoint state.
    ///
    /// Returns true only the first time a given checkpoint is marked; callers
    /// use this as the duplicate-emission guard.
    pub fn mark_checkpoint_logged(&mut self, state: ConversationState) -> bool {
        self.logged_checkpoints.insert(state.as_str().to_string())
    }

    /// Whether a booking event was already emitted for this checkpoint.
    pub fn checkpoint_logged(&self, state: ConversationState) -> bool {
        self.logged_checkpoints.contains(state.as_str())
    }

    /// True when the session has seen no activity for at least `idle_for`.
    pub fn is_idle(&self, now: DateTime<Utc>, idle_for: Duration) -> bool {
        match chrono::Duration::from_std(idle_for) {
            Ok(idle) => now.signed_duration_since(self.updated_at) >= idle,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_at_greeting() {
        let session = ConversationSession::new("abc");
        assert_eq!(session.session_id(), "abc");
        assert_eq!(session.state(), ConversationState::Greeting);
        assert!(session.messages().is_empty());
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn pushes_count_turns() {
        let mut session = ConversationSession::new("abc");
        session.push_user("hi");
        session.push_assistant("hello");
        assert_eq!(session.turn_count(), 2);
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn recent_window_returns_tail() {
        let mut session = ConversationSession::new("abc");
        for i in 0..12 {
            session.push_user(format!("message {i}"));
        }
        let recent = session.recent_messages(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].content, "message 2");
        assert_eq!(recent[9].content, "message 11");
    }

    #[test]
    fn recent_window_handles_short_history() {
        let mut session = ConversationSession::new("abc");
        session.push_user("only one");
        assert_eq!(session.recent_messages(10).len(), 1);
    }

    #[test]
    fn last_user_message_skips_assistant_turns() {
        let mut session = ConversationSession::new("abc");
        session.push_user("question");
        session.push_assistant("answer");
        assert_eq!(session.last_user_message().unwrap().content, "question");
    }

    #[test]
    fn checkpoint_marking_is_once_only() {
        let mut session = ConversationSession::new("abc");
        assert!(session.mark_checkpoint_logged(ConversationState::ConfirmBooking));
        assert!(!session.mark_checkpoint_logged(ConversationState::ConfirmBooking));
        assert!(session.checkpoint_logged(ConversationState::ConfirmBooking));
        assert!(!session.checkpoint_logged(ConversationState::Completed));
    }

    #[test]
    fn checkpoint_guard_survives_serialization() {
        let mut session = ConversationSession::new("abc");
        session.mark_checkpoint_logged(ConversationState::BookAppointment);
        let json = serde_json::to_string(&session).unwrap();
        let mut restored: ConversationSession = serde_json::from_str(&json).unwrap();
        assert!(!restored.mark_checkpoint_logged(ConversationState::BookAppointment));
    }

    #[test]
    fn idle_detection() {
        let session = ConversationSession::new("abc");
        let now = Utc::now();
        assert!(!session.is_idle(now, Duration::from_secs(60)));
        let later = now + chrono::Duration::seconds(120);
        assert!(session.is_idle(later, Duration::from_secs(60)));
    }
}

//! ConversationManager - orchestrates one turn of the booking dialogue.
//!
//! The manager owns the per-turn pipeline: extract fields from the message,
//! check for an emergency, run the state transition, emit booking records at
//! checkpoints, and produce the reply. Turns for the same session are
//! serialized with a per-session lock; different sessions proceed in
//! parallel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::booking::prompts::fallback_reply;
use crate::domain::booking::{
    next_state, BookingFields, BookingRecord, ConversationSession, ConversationState, FieldKind,
    MessageSource, TurnSignals,
};
use crate::domain::extraction::{correction_target, parse_confirmation, ExtractionPipeline};
use crate::domain::qualification::{is_emergency, qualify, QualificationReport};
use crate::ports::{
    BookingSink, ConversationStore, NotificationSink, ReplyGenerator, ReplyRequest, SessionStore,
    SessionStoreError,
};

/// What one processed turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: String,
    /// The receptionist's reply to show the caller.
    pub reply: String,
    /// State after this turn's transition.
    pub state: ConversationState,
    /// Collected fields after extraction.
    pub fields: BookingFields,
    /// Required fields still missing.
    pub missing_fields: Vec<FieldKind>,
    /// True when every required field is collected.
    pub is_complete: bool,
    /// Current lead qualification.
    pub qualification: QualificationReport,
}

/// Conversation manager errors.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),

    /// The message was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,
}

/// Orchestrates booking conversations over injected collaborators.
pub struct ConversationManager {
    sessions: Arc<dyn SessionStore>,
    replies: Arc<dyn ReplyGenerator>,
    bookings: Arc<dyn BookingSink>,
    notifications: Arc<dyn NotificationSink>,
    conversations: Arc<dyn ConversationStore>,
    pipeline: ExtractionPipeline,
    turn_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    history_window: usize,
}

impl ConversationManager {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        replies: Arc<dyn ReplyGenerator>,
        bookings: Arc<dyn BookingSink>,
        notifications: Arc<dyn NotificationSink>,
        conversations: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            sessions,
            replies,
            bookings,
            notifications,
            conversations,
            pipeline: ExtractionPipeline::new(),
            turn_locks: Mutex::new(HashMap::new()),
            history_window: 10,
        }
    }

    /// How many recent messages are handed to the reply generator.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    /// Processes one user message for a session.
    ///
    /// Creates the session if it does not exist. Turns for the same session
    /// run strictly one at a time.
    pub async fn handle_message(
        &self,
        session_id: &str,
        message: &str,
        source: MessageSource,
    ) -> Result<TurnOutcome, ManagerError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ManagerError::EmptyMessage);
        }

        let lock = self.lock_for(session_id).await;
        let _turn = lock.lock().await;

        let mut session = match self.sessions.get(session_id).await? {
            Some(session) => session,
            None => {
                info!(session_id, "starting new conversation");
                ConversationSession::new(session_id)
            }
        };

        let previous = session.state();
        session.push_user(message);

        // One ordered extraction pass against the state that asked the
        // question, before any transition.
        let touched = self
            .pipeline
            .run(previous, message, session.fields_mut());
        if !touched.is_empty() {
            debug!(session_id, ?touched, "extracted fields");
        }

        let emergency = is_emergency(message);
        if emergency {
            session.fields_mut().flag_emergency();
        }

        let signals = TurnSignals {
            emergency,
            confirmation: parse_confirmation(message),
            correction_target: correction_target(message),
        };
        let next = next_state(previous, session.fields(), &signals);
        session.set_state(next);
        if next != previous {
            info!(session_id, from = %previous, to = %next, "state transition");
        }

        if next != previous && next.is_booking_checkpoint() && session.mark_checkpoint_logged(next)
        {
            self.emit_booking(&session, next).await;
        }

        let reply = self.reply_for(&session, next).await;
        session.push_assistant(reply.clone());

        if let Err(error) = self.conversations.save_conversation(&session, source).await {
            warn!(session_id, %error, "failed to save conversation transcript");
        }

        let fields = session.fields().clone();
        let qualification = qualify(&fields);
        let missing_fields = fields.missing_required();
        let is_complete = missing_fields.is_empty();

        self.sessions.put(session).await?;

        Ok(TurnOutcome {
            session_id: session_id.to_string(),
            reply,
            state: next,
            fields,
            missing_fields,
            is_complete,
            qualification,
        })
    }

    /// Read-only view of a session.
    pub async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ConversationSession>, ManagerError> {
        Ok(self.sessions.get(session_id).await?)
    }

    /// Ends a conversation. Returns true when a session was removed.
    ///
    /// Takes the session's turn lock first, so a turn already in flight
    /// finishes (and saves) before the removal, and its save cannot
    /// resurrect the deleted session afterwards.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool, ManagerError> {
        let lock = self.lock_for(session_id).await;
        let guard = lock.lock().await;
        let removed = self.sessions.remove(session_id).await?;
        drop(guard);
        self.prune_lock(session_id, &lock).await;
        if removed {
            info!(session_id, "session deleted");
        }
        Ok(removed)
    }

    /// Expires sessions idle for at least `idle_for`.
    ///
    /// Holds every known session's turn lock across the sweep: a session
    /// mid-turn is never swept, and a swept session has no in-flight save
    /// left to resurrect it.
    pub async fn sweep_idle(&self, idle_for: Duration) -> Result<Vec<String>, ManagerError> {
        let entries: Vec<(String, Arc<Mutex<()>>)> = self
            .turn_locks
            .lock()
            .await
            .iter()
            .map(|(id, lock)| (id.clone(), lock.clone()))
            .collect();
        let mut guards = Vec::with_capacity(entries.len());
        for (_, lock) in &entries {
            guards.push(lock.lock().await);
        }
        let expired = self.sessions.sweep_idle(idle_for).await?;
        drop(guards);
        if !expired.is_empty() {
            for (session_id, lock) in &entries {
                if expired.contains(session_id) {
                    self.prune_lock(session_id, lock).await;
                }
            }
            info!(count = expired.len(), "expired idle sessions");
        }
        Ok(expired)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> Result<usize, ManagerError> {
        Ok(self.sessions.count().await?)
    }

    async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.turn_locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops a session's turn-lock entry, but only while nobody else holds a
    /// clone of it. A pending turn keeps the entry, so later messages queue
    /// on the same lock instead of minting a second one.
    async fn prune_lock(&self, session_id: &str, lock: &Arc<Mutex<()>>) {
        let mut locks = self.turn_locks.lock().await;
        if let Some(entry) = locks.get(session_id) {
            // Two holders: the map and our own clone.
            if Arc::ptr_eq(entry, lock) && Arc::strong_count(entry) == 2 {
                locks.remove(session_id);
            }
        }
    }

    /// Emits the booking record for a freshly entered checkpoint state.
    ///
    /// Sink failures are logged and swallowed; the conversation continues.
    async fn emit_booking(&self, session: &ConversationSession, checkpoint: ConversationState) {
        let Some(record) = BookingRecord::from_session(session, checkpoint) else {
            return;
        };
        info!(
            session_id = session.session_id(),
            status = record.status.as_str(),
            "booking checkpoint reached"
        );

        if let Err(error) = self.bookings.log_booking(&record).await {
            warn!(
                session_id = session.session_id(),
                %error,
                "failed to log booking"
            );
        }

        if let Some(phone) = record.phone.clone() {
            if let Err(error) = self.notifications.send_confirmation(&phone, &record).await {
                warn!(
                    session_id = session.session_id(),
                    %error,
                    "failed to send booking notification"
                );
            }
        }
    }

    /// Generates the reply, falling back to the canned state prompt when the
    /// generator fails or returns nothing.
    async fn reply_for(&self, session: &ConversationSession, state: ConversationState) -> String {
        // Emergencies get the deterministic safety message, never the model.
        if state == ConversationState::Emergency {
            return fallback_reply(state, session.fields());
        }

        let request = ReplyRequest {
            state,
            fields: session.fields(),
            recent_messages: session.recent_messages(self.history_window),
        };
        match self.replies.generate_reply(request).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => fallback_reply(state, session.fields()),
            Err(error) => {
                warn!(
                    session_id = session.session_id(),
                    %error,
                    "reply generation failed, using fallback"
                );
                fallback_reply(state, session.fields())
            }
        }
    }
}

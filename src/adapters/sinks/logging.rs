//! Tracing-backed sink implementations.
//!
//! The default wiring for a single-node deployment: booking records,
//! notifications and transcripts land in the structured log, where they can
//! be shipped wherever the clinic collects them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::booking::{BookingRecord, ConversationSession, MessageSource};
use crate::ports::{BookingSink, ConversationStore, NotificationSink, SinkError};

/// Writes booking records to the structured log.
#[derive(Debug, Clone, Default)]
pub struct LoggingBookingSink;

impl LoggingBookingSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BookingSink for LoggingBookingSink {
    async fn log_booking(&self, record: &BookingRecord) -> Result<(), SinkError> {
        info!(
            session_id = %record.session_id,
            status = record.status.as_str(),
            patient = %record.patient_name,
            service = record.service.as_deref().unwrap_or("-"),
            preferred_date = record.preferred_date.as_deref().unwrap_or("-"),
            preferred_time = record.preferred_time.as_deref().unwrap_or("-"),
            lead_score = record.lead_score,
            "booking record"
        );
        Ok(())
    }
}

/// Logs the confirmation that would be texted to the patient.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotificationSink;

impl LoggingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn send_confirmation(
        &self,
        phone: &str,
        record: &BookingRecord,
    ) -> Result<(), SinkError> {
        info!(
            session_id = %record.session_id,
            phone,
            status = record.status.as_str(),
            "booking confirmation notification"
        );
        Ok(())
    }
}

/// Logs a one-line summary of the transcript after each turn.
#[derive(Debug, Clone, Default)]
pub struct LoggingConversationStore;

impl LoggingConversationStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConversationStore for LoggingConversationStore {
    async fn save_conversation(
        &self,
        session: &ConversationSession,
        source: MessageSource,
    ) -> Result<(), SinkError> {
        info!(
            session_id = session.session_id(),
            source = source.as_str(),
            state = %session.state(),
            messages = session.messages().len(),
            "conversation saved"
        );
        Ok(())
    }
}

//! Recording sink doubles for tests.
//!
//! Capture everything the manager emits so assertions can inspect it, with
//! optional one-shot failure injection.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::booking::{BookingRecord, ConversationSession, MessageSource};
use crate::ports::{BookingSink, ConversationStore, NotificationSink, SinkError};

/// Captures booking records in memory.
#[derive(Debug, Default)]
pub struct RecordingBookingSink {
    records: Mutex<Vec<BookingRecord>>,
    fail_next: AtomicBool,
}

impl RecordingBookingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `log_booking` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<BookingRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingSink for RecordingBookingSink {
    async fn log_booking(&self, record: &BookingRecord) -> Result<(), SinkError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SinkError::Unavailable("injected failure".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Captures outbound notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    sent: Mutex<Vec<(String, BookingRecord)>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, BookingRecord)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn send_confirmation(
        &self,
        phone: &str,
        record: &BookingRecord,
    ) -> Result<(), SinkError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), record.clone()));
        Ok(())
    }
}

/// One captured transcript save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedConversation {
    pub session_id: String,
    pub source: MessageSource,
    pub message_count: usize,
}

/// Captures transcript saves in memory.
#[derive(Debug, Default)]
pub struct RecordingConversationStore {
    saves: Mutex<Vec<SavedConversation>>,
}

impl RecordingConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> Vec<SavedConversation> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for RecordingConversationStore {
    async fn save_conversation(
        &self,
        session: &ConversationSession,
        source: MessageSource,
    ) -> Result<(), SinkError> {
        self.saves.lock().unwrap().push(SavedConversation {
            session_id: session.session_id().to_string(),
            source,
            message_count: session.messages().len(),
        });
        Ok(())
    }
}

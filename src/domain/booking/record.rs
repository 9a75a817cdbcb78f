//! Booking records emitted at checkpoint states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::qualification::{qualify, LeadStatus, UrgencyLevel};

use super::session::ConversationSession;
use super::state::ConversationState;

/// Progress of a booking at the moment a record was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Entered the booking step; details confirmed, slot not yet accepted.
    Pending,
    /// Caller was asked for the final go-ahead.
    AwaitingConfirmation,
    /// Caller gave the final yes.
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::AwaitingConfirmation => "awaiting_confirmation",
            BookingStatus::Confirmed => "confirmed",
        }
    }

    /// Maps a checkpoint state to the status its record carries.
    pub fn for_checkpoint(state: ConversationState) -> Option<Self> {
        match state {
            ConversationState::BookAppointment => Some(BookingStatus::Pending),
            ConversationState::ConfirmBooking => Some(BookingStatus::AwaitingConfirmation),
            ConversationState::Completed => Some(BookingStatus::Confirmed),
            _ => None,
        }
    }
}

/// Snapshot of a session handed to the booking sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub session_id: String,
    pub status: BookingStatus,
    pub patient_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub insurance: Option<String>,
    pub service: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub is_new_patient: Option<bool>,
    pub urgency: Option<UrgencyLevel>,
    pub lead_status: LeadStatus,
    pub lead_score: u8,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Builds a record from the session as it stands at `checkpoint`.
    ///
    /// Returns `None` for states that are not booking checkpoints.
    pub fn from_session(
        session: &ConversationSession,
        checkpoint: ConversationState,
    ) -> Option<Self> {
        let status = BookingStatus::for_checkpoint(checkpoint)?;
        let fields = session.fields();
        let report = qualify(fields);
        Some(Self {
            session_id: session.session_id().to_string(),
            status,
            patient_name: fields
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown".to_string()),
            phone: fields.phone().map(str::to_string),
            date_of_birth: fields.date_of_birth().map(str::to_string),
            insurance: fields.insurance().map(str::to_string),
            service: fields.service().map(str::to_string),
            preferred_date: fields.preferred_date().map(str::to_string),
            preferred_time: fields.preferred_time().map(str::to_string),
            is_new_patient: fields.is_new_patient(),
            urgency: fields.urgency(),
            lead_status: report.status,
            lead_score: report.score,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::fields::FieldKind;

    fn complete_session() -> ConversationSession {
        let mut session = ConversationSession::new("s-1");
        let fields = session.fields_mut();
        fields.overwrite(FieldKind::Name, "Jane Smith");
        fields.overwrite(FieldKind::Phone, "5551234567");
        fields.overwrite(FieldKind::DateOfBirth, "03/14/1985");
        fields.overwrite(FieldKind::Insurance, "aetna");
        fields.overwrite(FieldKind::Service, "cleaning");
        fields.overwrite(FieldKind::PreferredDate, "Monday");
        fields.overwrite(FieldKind::PreferredTime, "morning");
        session
    }

    #[test]
    fn checkpoint_statuses() {
        assert_eq!(
            BookingStatus::for_checkpoint(ConversationState::BookAppointment),
            Some(BookingStatus::Pending)
        );
        assert_eq!(
            BookingStatus::for_checkpoint(ConversationState::ConfirmBooking),
            Some(BookingStatus::AwaitingConfirmation)
        );
        assert_eq!(
            BookingStatus::for_checkpoint(ConversationState::Completed),
            Some(BookingStatus::Confirmed)
        );
        assert_eq!(
            BookingStatus::for_checkpoint(ConversationState::VerifyInfo),
            None
        );
    }

    #[test]
    fn record_snapshots_session_fields() {
        let session = complete_session();
        let record =
            BookingRecord::from_session(&session, ConversationState::Completed).unwrap();
        assert_eq!(record.session_id, "s-1");
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert_eq!(record.patient_name, "Jane Smith");
        assert_eq!(record.phone.as_deref(), Some("5551234567"));
        assert_eq!(record.service.as_deref(), Some("cleaning"));
        assert_eq!(record.lead_status, LeadStatus::Qualified);
    }

    #[test]
    fn missing_name_falls_back_to_unknown() {
        let session = ConversationSession::new("s-2");
        let record =
            BookingRecord::from_session(&session, ConversationState::BookAppointment).unwrap();
        assert_eq!(record.patient_name, "Unknown");
        assert_eq!(record.status, BookingStatus::Pending);
    }

    #[test]
    fn non_checkpoint_yields_no_record() {
        let session = complete_session();
        assert!(BookingRecord::from_session(&session, ConversationState::Greeting).is_none());
    }
}

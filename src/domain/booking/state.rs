//! Conversation states for the booking flow.
//!
//! The flow is a fixed linear progression from greeting to completion, with
//! one out-of-band `Emergency` state reachable from anywhere. Each state
//! knows which fields it is responsible for collecting; the transition
//! function lives in [`super::transition`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fields::FieldKind;

/// One stage of the booking conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Greeting,
    IdentifyPatient,
    GetService,
    CheckUrgency,
    CollectName,
    CollectPhone,
    CollectDob,
    CollectInsurance,
    VerifyInfo,
    CheckAvailability,
    BookAppointment,
    ConfirmBooking,
    Completed,
    /// Out-of-band short-circuit when distress keywords are detected.
    Emergency,
}

/// The linear progression, in order. `Emergency` sits outside it.
pub const STATE_ORDER: &[ConversationState] = &[
    ConversationState::Greeting,
    ConversationState::IdentifyPatient,
    ConversationState::GetService,
    ConversationState::CheckUrgency,
    ConversationState::CollectName,
    ConversationState::CollectPhone,
    ConversationState::CollectDob,
    ConversationState::CollectInsurance,
    ConversationState::VerifyInfo,
    ConversationState::CheckAvailability,
    ConversationState::BookAppointment,
    ConversationState::ConfirmBooking,
    ConversationState::Completed,
];

impl ConversationState {
    /// The next state in the linear order, if any.
    pub fn successor(&self) -> Option<Self> {
        let idx = STATE_ORDER.iter().position(|s| s == self)?;
        STATE_ORDER.get(idx + 1).copied()
    }

    /// Position in the linear order; `Emergency` has none.
    pub fn order_index(&self) -> Option<usize> {
        STATE_ORDER.iter().position(|s| s == self)
    }

    /// Fields that must be present before this state can advance.
    pub fn required_fields(&self) -> &'static [FieldKind] {
        match self {
            ConversationState::IdentifyPatient => &[FieldKind::PatientType],
            ConversationState::GetService => &[FieldKind::Service],
            ConversationState::CheckUrgency => &[FieldKind::Urgency],
            ConversationState::CollectName => &[FieldKind::Name],
            ConversationState::CollectPhone => &[FieldKind::Phone],
            ConversationState::CollectDob => &[FieldKind::DateOfBirth],
            ConversationState::CollectInsurance => &[FieldKind::Insurance],
            ConversationState::CheckAvailability => {
                &[FieldKind::PreferredDate, FieldKind::PreferredTime]
            }
            _ => &[],
        }
    }

    /// No transitions leave a terminal state; only deletion ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConversationState::Completed | ConversationState::Emergency
        )
    }

    /// States whose first entry emits a booking-log event.
    pub fn is_booking_checkpoint(&self) -> bool {
        matches!(
            self,
            ConversationState::BookAppointment
                | ConversationState::ConfirmBooking
                | ConversationState::Completed
        )
    }

    /// The state responsible for collecting a given field.
    ///
    /// Used for the explicit backward route out of `VerifyInfo`.
    pub fn collecting_state_for(kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Name => Some(ConversationState::CollectName),
            FieldKind::Phone => Some(ConversationState::CollectPhone),
            FieldKind::DateOfBirth => Some(ConversationState::CollectDob),
            FieldKind::Insurance => Some(ConversationState::CollectInsurance),
            FieldKind::Service => Some(ConversationState::GetService),
            FieldKind::PatientType => Some(ConversationState::IdentifyPatient),
            FieldKind::Urgency => Some(ConversationState::CheckUrgency),
            FieldKind::PreferredDate | FieldKind::PreferredTime => {
                Some(ConversationState::CheckAvailability)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Greeting => "greeting",
            ConversationState::IdentifyPatient => "identify_patient",
            ConversationState::GetService => "get_service",
            ConversationState::CheckUrgency => "check_urgency",
            ConversationState::CollectName => "collect_name",
            ConversationState::CollectPhone => "collect_phone",
            ConversationState::CollectDob => "collect_dob",
            ConversationState::CollectInsurance => "collect_insurance",
            ConversationState::VerifyInfo => "verify_info",
            ConversationState::CheckAvailability => "check_availability",
            ConversationState::BookAppointment => "book_appointment",
            ConversationState::ConfirmBooking => "confirm_booking",
            ConversationState::Completed => "completed",
            ConversationState::Emergency => "emergency",
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::Greeting
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

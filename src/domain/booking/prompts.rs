//! Receptionist wording for each conversation state.
//!
//! `fallback_reply` is the deterministic utterance used when the reply
//! generator is unavailable or returns nothing; `system_prompt` is the
//! instruction handed to the generator so its wording stays on-task.

use super::fields::{BookingFields, FieldKind};
use super::state::ConversationState;

/// Deterministic receptionist reply for a state.
///
/// Always returns something sayable, so a generator outage never leaves the
/// caller without a response.
pub fn fallback_reply(state: ConversationState, fields: &BookingFields) -> String {
    match state {
        ConversationState::Greeting => {
            "Thank you for calling Bright Smile Dental! Are you looking to schedule an appointment today?".to_string()
        }
        ConversationState::IdentifyPatient => {
            "Have you visited us before, or would this be your first appointment with us?".to_string()
        }
        ConversationState::GetService => {
            "What kind of appointment can we help you with? For example a cleaning, a checkup, or something that's bothering you.".to_string()
        }
        ConversationState::CheckUrgency => {
            "Is this something urgent, or a routine visit we can schedule at your convenience?".to_string()
        }
        ConversationState::CollectName => {
            "May I have your full name, please?".to_string()
        }
        ConversationState::CollectPhone => {
            "What's the best phone number to reach you at?".to_string()
        }
        ConversationState::CollectDob => {
            "Could I get your date of birth? Month, day and year is fine.".to_string()
        }
        ConversationState::CollectInsurance => {
            "Do you have dental insurance, or would you be paying out of pocket?".to_string()
        }
        ConversationState::VerifyInfo => verification_summary(fields),
        ConversationState::CheckAvailability => {
            "What day and time of day work best for you? We have mornings and afternoons available most weekdays.".to_string()
        }
        ConversationState::BookAppointment => {
            booking_summary(fields)
        }
        ConversationState::ConfirmBooking => {
            "Shall I go ahead and lock that appointment in for you?".to_string()
        }
        ConversationState::Completed => {
            "You're all set! We'll see you then. If anything changes, just give us a call.".to_string()
        }
        ConversationState::Emergency => {
            "This sounds like it needs attention right away. Please call our emergency line at (555) 010-9999 now, or go to the nearest emergency room if you're in severe distress.".to_string()
        }
    }
}

/// Instruction for the reply generator, scoped to the current state.
pub fn system_prompt(state: ConversationState, fields: &BookingFields) -> String {
    let goal = match state {
        ConversationState::Greeting => {
            "Warmly greet the caller and ask whether they'd like to schedule an appointment."
        }
        ConversationState::IdentifyPatient => {
            "Find out whether the caller is a new or returning patient."
        }
        ConversationState::GetService => {
            "Ask what service they need (cleaning, checkup, filling, extraction, etc.)."
        }
        ConversationState::CheckUrgency => {
            "Gauge how urgent the visit is without alarming the caller."
        }
        ConversationState::CollectName => "Ask for the caller's full name.",
        ConversationState::CollectPhone => "Ask for a contact phone number.",
        ConversationState::CollectDob => "Ask for the caller's date of birth.",
        ConversationState::CollectInsurance => {
            "Ask about dental insurance; self-pay is fine too."
        }
        ConversationState::VerifyInfo => {
            "Read back the collected details and ask the caller to confirm they are correct."
        }
        ConversationState::CheckAvailability => {
            "Ask for a preferred day and time of day for the appointment."
        }
        ConversationState::BookAppointment => {
            "Summarize the appointment details you are about to book."
        }
        ConversationState::ConfirmBooking => {
            "Ask for the final go-ahead to book the appointment."
        }
        ConversationState::Completed => {
            "Confirm the booking is done and warmly close the conversation."
        }
        ConversationState::Emergency => {
            "Direct the caller to the emergency line immediately. Do not attempt scheduling."
        }
    };

    let mut prompt = format!(
        "You are the front-desk receptionist for Bright Smile Dental. \
         Be warm, concise and professional. Ask for one thing at a time. \
         Current task: {goal}"
    );
    let known = known_fields(fields);
    if !known.is_empty() {
        prompt.push_str("\nAlready collected: ");
        prompt.push_str(&known.join("; "));
        prompt.push_str(". Do not ask for these again.");
    }
    prompt
}

fn known_fields(fields: &BookingFields) -> Vec<String> {
    SUMMARY_FIELDS
        .iter()
        .filter_map(|kind| {
            fields
                .get(*kind)
                .map(|value| format!("{} = {value}", kind.label()))
        })
        .collect()
}

const SUMMARY_FIELDS: &[FieldKind] = &[
    FieldKind::Name,
    FieldKind::Phone,
    FieldKind::DateOfBirth,
    FieldKind::Insurance,
    FieldKind::Service,
    FieldKind::PreferredDate,
    FieldKind::PreferredTime,
];

fn verification_summary(fields: &BookingFields) -> String {
    let mut lines = vec!["Let me read back what I have:".to_string()];
    for kind in SUMMARY_FIELDS {
        if let Some(value) = fields.get(*kind) {
            let mut line = format!("- {}: {value}", kind.label());
            if fields.is_tentative(*kind) {
                line.push_str(" (please double-check this one)");
            }
            lines.push(line);
        }
    }
    lines.push("Is everything correct?".to_string());
    lines.join("\n")
}

fn booking_summary(fields: &BookingFields) -> String {
    let service = fields.service().unwrap_or("your appointment");
    match (
        fields.get(FieldKind::PreferredDate),
        fields.get(FieldKind::PreferredTime),
    ) {
        (Some(date), Some(time)) => format!(
            "Great news, we can fit you in for a {service} on {date} in the {time}. Does that work for you?"
        ),
        _ => format!("We have availability for a {service}. Does that work for you?"),
    }
}

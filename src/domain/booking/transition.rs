//! The pure state transition function.
//!
//! The emergency override is evaluated before anything else so a distress
//! message can never land in a partially advanced state. Ordinary progression
//! moves exactly one step per turn and only when the current state's required
//! fields are present; the single permitted backward move is an explicit
//! rejection at `VerifyInfo`.

use super::fields::{BookingFields, FieldKind};
use super::state::ConversationState;

/// A confirmation token parsed from the latest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirmative,
    Negative,
}

/// Per-turn inputs to the transition, derived from the latest message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnSignals {
    /// Distress keywords detected; forces the emergency state.
    pub emergency: bool,
    /// Yes/no token, if the message contained one.
    pub confirmation: Option<Confirmation>,
    /// Field the caller explicitly said was wrong ("my name is wrong").
    pub correction_target: Option<FieldKind>,
}

/// Computes the next conversation state.
///
/// Pure function of the current state, the collected fields and the turn
/// signals. See the module docs for the precedence rules.
pub fn next_state(
    current: ConversationState,
    fields: &BookingFields,
    signals: &TurnSignals,
) -> ConversationState {
    // Safety override first, before the ordinary transition table.
    if signals.emergency {
        return ConversationState::Emergency;
    }

    if current.is_terminal() {
        return current;
    }

    match current {
        // Advancing past verification needs an explicit yes. A no routes
        // back to the named field, or the first gap.
        ConversationState::VerifyInfo => match signals.confirmation {
            Some(Confirmation::Affirmative) => ConversationState::CheckAvailability,
            Some(Confirmation::Negative) => {
                backward_target(fields, signals.correction_target)
            }
            None => current,
        },

        // Booking needs a second, distinct yes; one "yes" can never carry
        // a caller from verification straight into a booked appointment.
        ConversationState::ConfirmBooking => match signals.confirmation {
            Some(Confirmation::Affirmative) => ConversationState::Completed,
            Some(Confirmation::Negative) => ConversationState::CheckAvailability,
            None => current,
        },

        _ => {
            let satisfied = current
                .required_fields()
                .iter()
                .all(|kind| fields.is_set(*kind));
            if satisfied {
                current.successor().unwrap_or(current)
            } else {
                current
            }
        }
    }
}

fn backward_target(
    fields: &BookingFields,
    correction: Option<FieldKind>,
) -> ConversationState {
    if let Some(state) = correction.and_then(ConversationState::collecting_state_for) {
        return state;
    }
    fields
        .missing_required()
        .first()
        .and_then(|kind| ConversationState::collecting_state_for(*kind))
        .unwrap_or(ConversationState::CollectName)
}

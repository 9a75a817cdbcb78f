//! Booking conversation domain: states, fields, sessions and records.

pub mod fields;
pub mod message;
pub mod prompts;
pub mod record;
pub mod session;
pub mod state;
pub mod transition;

pub use fields::{BookingFields, FieldKind};
pub use message::{ChatMessage, MessageRole, MessageSource};
pub use record::{BookingRecord, BookingStatus};
pub use session::ConversationSession;
pub use state::ConversationState;
pub use transition::{next_state, Confirmation, TurnSignals};

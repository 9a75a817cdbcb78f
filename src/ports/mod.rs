//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ReplyGenerator` - language model behind the receptionist's replies
//! - `SessionStore` - live conversation session storage
//! - `BookingSink` - destination for booking-progress records
//! - `NotificationSink` - outbound patient notifications
//! - `ConversationStore` - durable conversation transcripts
//!
//! The sinks are best-effort: their failures are logged and the conversation
//! continues. Session storage is load-bearing and its errors propagate.

mod booking_sink;
mod conversation_store;
mod notification_sink;
mod reply_generator;
mod session_store;

pub use booking_sink::BookingSink;
pub use conversation_store::ConversationStore;
pub use notification_sink::NotificationSink;
pub use reply_generator::{ReplyError, ReplyGenerator, ReplyRequest};
pub use session_store::{SessionStore, SessionStoreError};

/// Errors shared by the best-effort sinks.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The destination could not be reached.
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    /// The destination refused the payload.
    #[error("sink rejected payload: {0}")]
    Rejected(String),
}

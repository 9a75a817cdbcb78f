//! Sink adapters - booking log, notifications and transcript storage.

mod logging;
mod recording;

pub use logging::{LoggingBookingSink, LoggingConversationStore, LoggingNotificationSink};
pub use recording::{
    RecordingBookingSink, RecordingConversationStore, RecordingNotificationSink, SavedConversation,
};

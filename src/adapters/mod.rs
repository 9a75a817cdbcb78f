//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - reply generation (OpenAI-compatible APIs, plus a scripted mock)
//! - `http` - REST API surface
//! - `sinks` - booking log, notifications and transcript storage
//! - `storage` - live session storage

pub mod ai;
pub mod http;
pub mod sinks;
pub mod storage;

pub use ai::{MockReplyGenerator, OpenAiCompatConfig, OpenAiCompatGenerator};
pub use sinks::{LoggingBookingSink, LoggingConversationStore, LoggingNotificationSink};
pub use storage::InMemorySessionStore;

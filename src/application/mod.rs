//! Application layer - conversation orchestration.
//!
//! Coordinates the domain with the ports: one manager drives every turn of
//! every conversation.

mod manager;

pub use manager::{ConversationManager, ManagerError, TurnOutcome};

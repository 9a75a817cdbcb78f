//! AI adapters - reply generator implementations.

mod mock;
mod openai_compat;

pub use mock::MockReplyGenerator;
pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatGenerator};

//! Mock reply generator for testing.
//!
//! Configurable scripted replies, error injection and call capture, so the
//! conversation manager can be exercised without a real model behind it.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::booking::ConversationState;
use crate::ports::{ReplyError, ReplyGenerator, ReplyRequest};

/// Scripted reply generator.
///
/// Replies and failures are consumed in order; with nothing queued it
/// returns an empty string, which callers treat as "use the fallback".
#[derive(Debug, Default)]
pub struct MockReplyGenerator {
    replies: Mutex<VecDeque<String>>,
    failures: Mutex<VecDeque<ReplyError>>,
    calls: Mutex<Vec<ConversationState>>,
    delay: Option<Duration>,
}

impl MockReplyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues replies up front, builder-style.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::new();
        for reply in replies {
            generator.push_reply(reply);
        }
        generator
    }

    /// Adds simulated latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a reply for the next call.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }

    /// Queues a failure; consumed before any queued reply.
    pub fn push_failure(&self, error: ReplyError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// States the generator was called for, in order.
    pub fn calls(&self) -> Vec<ConversationState> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ReplyGenerator for MockReplyGenerator {
    async fn generate_reply(&self, request: ReplyRequest<'_>) -> Result<String, ReplyError> {
        self.calls.lock().unwrap().push(request.state);

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingFields;

    fn request(fields: &BookingFields) -> ReplyRequest<'_> {
        ReplyRequest {
            state: ConversationState::Greeting,
            fields,
            recent_messages: &[],
        }
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let generator = MockReplyGenerator::with_replies(["first", "second"]);
        let fields = BookingFields::default();
        assert_eq!(generator.generate_reply(request(&fields)).await.unwrap(), "first");
        assert_eq!(generator.generate_reply(request(&fields)).await.unwrap(), "second");
        assert_eq!(generator.generate_reply(request(&fields)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn failures_take_priority() {
        let generator = MockReplyGenerator::new();
        generator.push_reply("queued");
        generator.push_failure(ReplyError::AuthenticationFailed);
        let fields = BookingFields::default();
        assert!(generator.generate_reply(request(&fields)).await.is_err());
        assert_eq!(generator.generate_reply(request(&fields)).await.unwrap(), "queued");
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let generator = MockReplyGenerator::new();
        let fields = BookingFields::default();
        generator.generate_reply(request(&fields)).await.unwrap();
        assert_eq!(generator.calls(), vec![ConversationState::Greeting]);
        assert_eq!(generator.call_count(), 1);
    }
}

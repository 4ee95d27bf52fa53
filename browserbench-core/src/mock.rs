//! Scripted chat backend for offline tests.
//!
//! Replays a fixed sequence of replies, one per `chat` call, with optional
//! per-call latency for exercising completion-order jitter. Every received
//! request is captured for assertions.

use crate::error::ProviderError;
use crate::message::{Message, Role};
use crate::provider::{ChatBackend, ChatRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    /// Simulated latency before the reply is returned
    pub delay: Duration,
    /// The reply itself, or an error message
    pub result: Result<Message, String>,
}

impl MockReply {
    /// A plain assistant text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(Message::text(Role::Assistant, content)),
        }
    }

    /// An assistant reply whose content is the given JSON value, serialized.
    ///
    /// Useful for faking structured-output judge responses.
    pub fn json(value: &Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(Message::text(Role::Assistant, value.to_string())),
        }
    }

    /// A reply carrying a full canonical message (e.g. with tool calls).
    pub fn message(message: Message) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(message),
        }
    }

    /// A failed call.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error.into()),
        }
    }

    /// Add simulated latency to this reply.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A [`ChatBackend`] that replays scripted replies in call order.
#[derive(Debug, Default)]
pub struct MockChatBackend {
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatBackend {
    /// Create a mock with the given reply script.
    pub fn new(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    /// Number of scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, request: ChatRequest) -> Result<Message, ProviderError> {
        let reply = lock(&self.script).pop_front();
        lock(&self.requests).push(request);

        let reply =
            reply.ok_or_else(|| ProviderError::Other("mock reply script exhausted".to_string()))?;
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result.map_err(ProviderError::Other)
    }
}

//! Reply capability for the chat view.
//!
//! The controller only talks to `dyn Responder`, so the placeholder below and
//! a real inference client are interchangeable without touching the router
//! or the transcript.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::ChatMessage;

/// Fixed reply of the placeholder responder.
pub const DEFAULT_ACKNOWLEDGMENT: &str =
    "Thanks! I've noted your request and will apply it to your dataset.";

#[async_trait]
pub trait Responder: Send + Sync {
    /// Produces the assistant reply to a user message.
    async fn respond(&self, user_message: &str) -> Result<ChatMessage>;
}

/// Placeholder responder that acknowledges every message the same way.
#[derive(Debug, Clone)]
pub struct ResponseStub {
    acknowledgment: String,
}

impl ResponseStub {
    pub fn new(acknowledgment: impl Into<String>) -> Self {
        Self {
            acknowledgment: acknowledgment.into(),
        }
    }
}

impl Default for ResponseStub {
    fn default() -> Self {
        Self::new(DEFAULT_ACKNOWLEDGMENT)
    }
}

#[async_trait]
impl Responder for ResponseStub {
    async fn respond(&self, user_message: &str) -> Result<ChatMessage> {
        tracing::debug!(
            "[ResponseStub] Acknowledging message of {} chars",
            user_message.chars().count()
        );
        Ok(ChatMessage::assistant(self.acknowledgment.clone()))
    }
}

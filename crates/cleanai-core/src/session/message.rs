//! Chat message types.
//!
//! This module contains types for representing messages in the assistant
//! conversation, including roles, content and timestamps.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// Represents the role of a message in a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the visitor.
    User,
    /// Message produced by the assistant.
    Assistant,
}

/// A single message in the chat transcript.
///
/// Messages are immutable once appended; ordering is append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The raw, unescaped content of the message.
    pub content: String,
    /// Instant the message was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Creates an assistant message stamped with the current instant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, Utc::now())
    }

    /// Creates a user message stamped with the current instant.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, Utc::now())
    }
}

/// Formats an instant as a 12-hour clock label, e.g. `03:07 PM`.
pub fn clock_label<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp.format("%I:%M %p").to_string()
}

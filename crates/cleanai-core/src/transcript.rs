//! Append-only chat transcript and its bubble rendering.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{ChatMessage, MessageRole, clock_label};

/// Horizontal placement of a chat bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

/// Colour scheme of a chat bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

const USER_PALETTE: Palette = Palette {
    background: "#2563eb",
    foreground: "#ffffff",
};

const ASSISTANT_PALETTE: Palette = Palette {
    background: "#f1f5f9",
    foreground: "#0f172a",
};

/// Presentation of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    pub role: MessageRole,
    pub alignment: Alignment,
    pub palette: Palette,
    /// Message content with markup characters escaped.
    pub content_html: String,
    pub time_label: String,
}

impl Bubble {
    fn from_message(message: &ChatMessage) -> Self {
        let (alignment, palette) = match message.role {
            MessageRole::User => (Alignment::Right, USER_PALETTE),
            MessageRole::Assistant => (Alignment::Left, ASSISTANT_PALETTE),
        };
        Self {
            role: message.role,
            alignment,
            palette,
            content_html: escape_html(&message.content),
            time_label: clock_label(&message.timestamp.with_timezone(&Local)),
        }
    }
}

/// Ordered, append-only log of chat messages.
///
/// Insertion order is the only ordering guarantee. Timestamps never decrease:
/// a clock that steps backwards is clamped to the previous message's instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Creates a transcript seeded with one assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Appends a message stamped with the current instant.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) -> &ChatMessage {
        self.append_at(role, content, Utc::now())
    }

    pub fn append_at(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> &ChatMessage {
        let timestamp = match self.messages.last() {
            Some(previous) if previous.timestamp > at => previous.timestamp,
            _ => at,
        };
        let index = self.messages.len();
        self.messages.push(ChatMessage::new(role, content, timestamp));
        &self.messages[index]
    }

    pub fn render(&self) -> Vec<Bubble> {
        self.messages.iter().map(Bubble::from_message).collect()
    }
}

/// Escapes the characters that would otherwise be read as HTML markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file::FileHandle;
use super::page::PageId;
use crate::processor::ProcessingReport;
use crate::transcript::ChatTranscript;
use crate::upload::Rejection;

/// Greeting that opens every transcript unless configured otherwise.
pub const DEFAULT_GREETING: &str =
    "Hi! Your data is ready. Ask me anything about cleaning or preprocessing it.";

/// Severity of an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message shown inline above the active view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// The complete mutable state of one visitor's interaction with the app.
///
/// A session is created once at start-up and lives as long as the process.
/// It is owned by the application controller; nothing else holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Active page. Only the router writes this field.
    pub page: PageId,
    /// Accepted files of the latest upload submission, in selection order.
    pub files: Vec<FileHandle>,
    /// Files rejected by the latest upload submission.
    pub rejections: Vec<Rejection>,
    pub transcript: ChatTranscript,
    /// Latest inline notice, e.g. a backend failure.
    pub notice: Option<Notice>,
    /// Latest result returned by the dataset processor.
    pub processing: Option<ProcessingReport>,
    /// Chat messages still waiting for the assistant's reply.
    pub pending_replies: usize,
}

impl Session {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            page: PageId::Home,
            files: Vec::new(),
            rejections: Vec::new(),
            transcript: ChatTranscript::with_greeting(greeting),
            notice: None,
            processing: None,
            pending_replies: 0,
        }
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

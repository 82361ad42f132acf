//! Error types for the CleanAI assistant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the CleanAI workspace.
///
/// None of these are fatal once the application is running: the controller
/// recovers from each of them locally and reflects the outcome as inline UI
/// state (a notice, an unchanged view, or a rejected upload).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CleanAiError {
    /// The action is not available on the current page.
    #[error("Action '{action}' is not available on page '{page}'")]
    InvalidTransition { page: String, action: String },

    /// The backend collaborator (dataset processor or responder) failed.
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The controller task is gone and can no longer accept commands.
    #[error("Controller unavailable: {0}")]
    ControllerClosed(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CleanAiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidTransition error
    pub fn invalid_transition(page: impl Into<String>, action: impl Into<String>) -> Self {
        Self::InvalidTransition {
            page: page.into(),
            action: action.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidTransition error
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Check if this is a Backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CleanAiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CleanAiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CleanAiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used at the edges where collaborators report
/// loosely typed failures.
impl From<anyhow::Error> for CleanAiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, CleanAiError>`.
pub type Result<T> = std::result::Result<T, CleanAiError>;

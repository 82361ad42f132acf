//! Page identifiers for the session state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which view of the workflow is active.
///
/// Only the four named pages are reachable through the router. Values that
/// arrive from outside the state machine (a restored snapshot, a hand-edited
/// request) are parsed leniently into `Unrecognized` and are corrected to
/// `Home` on the next render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageId {
    /// Marketing landing page.
    #[default]
    Home,
    /// Dataset selection and validation.
    Upload,
    /// Interstitial screen while the upload is processed.
    Loading,
    /// Assistant conversation.
    Chat,
    /// Any other value. Never produced by a transition.
    Unrecognized(String),
}

impl PageId {
    /// The four pages the router can transition between.
    pub const ALL: [PageId; 4] = [PageId::Home, PageId::Upload, PageId::Loading, PageId::Chat];

    /// Parses a page name, keeping unknown names as `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Self::Home,
            "upload" => Self::Upload,
            "loading" => Self::Loading,
            "chat" => Self::Chat,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => "home",
            Self::Upload => "upload",
            Self::Loading => "loading",
            Self::Chat => "chat",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Returns the page that will actually be rendered.
    pub fn resolved(&self) -> PageId {
        match self {
            Self::Unrecognized(_) => Self::Home,
            other => other.clone(),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PageId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for PageId {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<PageId> for String {
    fn from(page: PageId) -> Self {
        page.as_str().to_string()
    }
}

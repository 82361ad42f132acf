//! Render-ready descriptions of each page.
//!
//! Views carry no behaviour. The web crate turns them into HTML, and the
//! JSON API exposes them as is.

use serde::Serialize;

use crate::session::{Notice, PageId};
use crate::transcript::Bubble;

pub const HOME_HEADLINE: &str = "Clean your data in minutes, not days.";
pub const HOME_TAGLINE: &str =
    "Upload a spreadsheet and let the assistant fix gaps, duplicates and messy formats for you.";
pub const HOME_CALL_TO_ACTION: &str = "Get started";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum View {
    Home(HomeView),
    Upload(UploadView),
    Loading(LoadingView),
    Chat(ChatView),
}

impl View {
    pub fn page(&self) -> PageId {
        match self {
            Self::Home(_) => PageId::Home,
            Self::Upload(_) => PageId::Upload,
            Self::Loading(_) => PageId::Loading,
            Self::Chat(_) => PageId::Chat,
        }
    }

    /// Whether the Proceed control is offered.
    pub fn can_proceed(&self) -> bool {
        matches!(self, Self::Upload(upload) if upload.can_proceed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    pub headline: String,
    pub tagline: String,
    pub call_to_action: String,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            headline: HOME_HEADLINE.to_string(),
            tagline: HOME_TAGLINE.to_string(),
            call_to_action: HOME_CALL_TO_ACTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadView {
    /// Value of the file input's `accept` attribute.
    pub accept: String,
    pub files: Vec<FileSummary>,
    /// One warning per rejected file.
    pub rejections: Vec<String>,
    pub can_proceed: bool,
    pub max_size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadingView {
    pub file_count: usize,
    pub file_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatView {
    pub bubbles: Vec<Bubble>,
    pub notice: Option<Notice>,
    /// The assistant has not answered every message yet.
    pub awaiting_reply: bool,
}

use crate::processor::ProcessingReport;
use crate::session::FileHandle;

/// User or system event submitted to the router.
#[derive(Debug, Clone)]
pub enum Action {
    /// Call to action on the home page.
    Start,
    /// A new upload selection. Replaces the previous batch.
    SelectFiles(Vec<FileHandle>),
    /// Continue from upload to loading.
    Proceed,
    /// Text entered in the chat input.
    SubmitChat(String),
    /// Raised by the controller once the loading phase is over.
    LoadingFinished(LoadingOutcome),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::SelectFiles(_) => "select_files",
            Self::Proceed => "proceed",
            Self::SubmitChat(_) => "submit_chat",
            Self::LoadingFinished(_) => "loading_finished",
        }
    }
}

/// How the backend call made during `loading` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingOutcome {
    Processed(Option<ProcessingReport>),
    Failed(String),
}

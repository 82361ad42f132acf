//! Page-routing state machine.
//!
//! `PageRouter` is the only writer of `Session::page`. It derives the view
//! for the active page and applies actions according to this table:
//!
//! | from      | action            | to        |
//! |-----------|-------------------|-----------|
//! | `home`    | `Start`           | `upload`  |
//! | `upload`  | `SelectFiles`     | `upload`  |
//! | `upload`  | `Proceed` (files) | `loading` |
//! | `loading` | `LoadingFinished` | `chat`    |
//! | `chat`    | `SubmitChat`      | `chat`    |
//!
//! Anything else is rejected and leaves the session as it was.

mod action;
mod view;

pub use action::{Action, LoadingOutcome};
pub use view::{ChatView, FileSummary, HomeView, LoadingView, UploadView, View};

use crate::config::UploadConfig;
use crate::error::{CleanAiError, Result};
use crate::session::{ChatMessage, MessageRole, Notice, PageId, Session, format_mib};
use crate::upload::FileValidator;

/// Follow-up work the caller must run after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the reveal loop and the backend call.
    BeginLoading,
    /// Ask the responder to answer this user message.
    Respond(String),
}

/// Result of a successfully applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: PageId,
    pub to: PageId,
    pub effect: Option<Effect>,
}

#[derive(Debug, Clone)]
pub struct PageRouter {
    validator: FileValidator,
    accept: String,
}

impl Default for PageRouter {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

impl PageRouter {
    pub fn new(validator: FileValidator, accept: impl Into<String>) -> Self {
        Self {
            validator,
            accept: accept.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(FileValidator::from_config(config), config.accept_attribute())
    }

    /// Derives the view for the session without touching it.
    ///
    /// An unrecognized page renders exactly like `home`.
    pub fn view(&self, session: &Session) -> View {
        match session.page.resolved() {
            PageId::Upload => View::Upload(self.upload_view(session)),
            PageId::Loading => View::Loading(LoadingView {
                file_count: session.files.len(),
                file_names: session.files.iter().map(|f| f.name().to_string()).collect(),
            }),
            PageId::Chat => View::Chat(ChatView {
                bubbles: session.transcript.render(),
                notice: session.notice.clone(),
                awaiting_reply: session.pending_replies > 0,
            }),
            PageId::Home | PageId::Unrecognized(_) => View::Home(HomeView::default()),
        }
    }

    /// Like [`view`](Self::view), but first resets an unrecognized page to
    /// `home` so the session itself is corrected.
    pub fn render(&self, session: &mut Session) -> View {
        if !session.page.is_recognized() {
            tracing::debug!("[PageRouter] Unknown page '{}', resetting to home", session.page);
            session.page = PageId::Home;
        }
        self.view(session)
    }

    /// Applies an action to the session.
    pub fn apply(&self, session: &mut Session, action: Action) -> Result<Transition> {
        let from = session.page.resolved();
        let action_name = action.name();

        let effect = match (&from, action) {
            (PageId::Home, Action::Start) => {
                session.page = PageId::Upload;
                None
            }
            (PageId::Upload, Action::SelectFiles(files)) => {
                let report = self.validator.validate_batch(files);
                session.files = report.accepted;
                session.rejections = report.rejected;
                None
            }
            (PageId::Upload, Action::Proceed) if session.has_files() => {
                session.page = PageId::Loading;
                session.notice = None;
                Some(Effect::BeginLoading)
            }
            (PageId::Loading, Action::LoadingFinished(outcome)) => {
                match outcome {
                    LoadingOutcome::Processed(Some(report)) => {
                        session
                            .transcript
                            .append(MessageRole::Assistant, report.summary());
                        session.processing = Some(report);
                    }
                    LoadingOutcome::Processed(None) => {}
                    LoadingOutcome::Failed(reason) => {
                        session.notice = Some(Notice::error(format!(
                            "We couldn't process your files: {reason}"
                        )));
                    }
                }
                session.page = PageId::Chat;
                None
            }
            (PageId::Chat, Action::SubmitChat(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    session.transcript.append(MessageRole::User, text);
                    session.pending_replies += 1;
                    Some(Effect::Respond(text.to_string()))
                }
            }
            _ => {
                return Err(CleanAiError::invalid_transition(
                    session.page.as_str(),
                    action_name,
                ));
            }
        };

        Ok(Transition {
            from,
            to: session.page.clone(),
            effect,
        })
    }

    /// Records the responder's answer to a `Respond` effect.
    pub fn complete_reply(&self, session: &mut Session, reply: Result<ChatMessage>) {
        session.pending_replies = session.pending_replies.saturating_sub(1);
        match reply {
            Ok(message) => {
                session
                    .transcript
                    .append_at(message.role, message.content, message.timestamp);
            }
            Err(err) => {
                session.notice = Some(Notice::error(format!(
                    "The assistant could not reply: {err}"
                )));
            }
        }
    }

    fn upload_view(&self, session: &Session) -> UploadView {
        UploadView {
            accept: self.accept.clone(),
            files: session
                .files
                .iter()
                .map(|file| FileSummary {
                    name: file.name().to_string(),
                    size_label: format_mib(file.size()),
                })
                .collect(),
            rejections: session
                .rejections
                .iter()
                .map(|rejection| rejection.reason.clone())
                .collect(),
            can_proceed: session.has_files(),
            max_size_label: format_mib(self.validator.max_file_bytes()),
        }
    }
}

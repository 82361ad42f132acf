pub mod config;
pub mod controller;
pub mod error;
pub mod processor;
pub mod responder;
pub mod router;
pub mod session;
pub mod transcript;
pub mod typer;
pub mod upload;

// Re-export the types most callers need
pub use config::AppConfig;
pub use controller::{AppController, AppControllerBuilder, ControllerHandle};
pub use error::{CleanAiError, Result};
pub use router::{Action, PageRouter, View};
pub use session::{PageId, Session};

//! Session domain module.
//!
//! This module contains the state of the one active visitor session and the
//! store that owns it.
//!
//! # Module Structure
//!
//! - `model`: Root aggregate (`Session`) and inline notices
//! - `page`: Page discriminator (`PageId`)
//! - `message`: Chat message types (`MessageRole`, `ChatMessage`)
//! - `file`: Selected dataset files (`FileHandle`)
//! - `store`: Revisioned owner of the session (`SessionStore`)

mod file;
mod message;
mod model;
mod page;
mod store;

pub use file::{FileHandle, MIB, format_mib};
pub use message::{ChatMessage, MessageRole, clock_label};
pub use model::{DEFAULT_GREETING, Notice, NoticeLevel, Session};
pub use page::PageId;
pub use store::{Revision, SessionStore};

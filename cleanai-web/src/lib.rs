//! HTTP frontend for the CleanAI assistant.
//!
//! The core crate decides what each page shows; this crate turns those view
//! descriptions into HTML, feeds browser events back to the controller and
//! streams the loading screen's reveal loop over server-sent events.

pub mod app;
pub mod assets;
pub mod backend;
pub mod error;
pub mod logging;
pub mod render;
pub mod routes;

pub use app::{AppState, bootstrap};

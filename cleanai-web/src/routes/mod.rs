//! HTTP routes.
//!
//! - `GET  /`               - current view as HTML
//! - `GET  /api/view`       - current view as JSON
//! - `POST /start`          - home call to action
//! - `POST /upload`         - multipart upload, repeated `files` field
//! - `POST /proceed`        - continue to the loading screen
//! - `POST /chat`           - form field `message`
//! - `GET  /loading/events` - SSE stream of the reveal loop
//! - `GET  /assets/:name`   - catalogued visual assets
//!
//! Action routes answer with `303 See Other` to `/`.

mod actions;
mod assets;
mod events;
mod pages;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::app::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/api/view", get(pages::view_json))
        .route("/start", post(actions::start))
        // Uploads are streamed and measured, so oversized files end as an
        // inline warning instead of a rejected request.
        .route(
            "/upload",
            post(actions::upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/proceed", post(actions::proceed))
        .route("/chat", post(actions::chat))
        .route("/loading/events", get(events::loading_events))
        .route("/assets/:name", get(assets::serve))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

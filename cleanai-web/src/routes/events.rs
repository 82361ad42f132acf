use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;

use cleanai_core::PageId;

use crate::app::AppState;

/// Streams reveal-loop frames while the session is on `loading`.
///
/// Emits a `frame` event for every new frame and one final `done` event as
/// soon as the controller leaves `loading`, after which the stream ends.
pub async fn loading_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut revisions = state.controller.subscribe_revisions();
    let left_loading = async move {
        let _ = revisions
            .wait_for(|revision| revision.page != PageId::Loading)
            .await;
    };

    let frames = WatchStream::new(state.controller.subscribe_typer())
        .map(|frame| {
            let json = serde_json::to_string(&frame).unwrap_or_default();
            Ok(Event::default().event("frame").data(json))
        })
        .take_until(left_loading);
    let done = stream::once(async { Ok(Event::default().event("done").data("chat")) });

    Sse::new(frames.chain(done)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

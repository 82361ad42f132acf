use axum::Form;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::response::Redirect;
use bytes::BytesMut;
use serde::Deserialize;

use cleanai_core::Action;
use cleanai_core::session::FileHandle;

use crate::app::AppState;
use crate::error::AppError;

/// Form field name of the file input.
pub const FILES_FIELD: &str = "files";

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub async fn start(State(state): State<AppState>) -> Result<Redirect, AppError> {
    dispatch(&state, Action::Start).await
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(AppError::bad_request)? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        // An empty file input still submits one part without a file name.
        let name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        files.push(read_file(field, name, state.max_file_bytes).await?);
    }

    tracing::info!("[Routes] Received {} file(s)", files.len());
    dispatch(&state, Action::SelectFiles(files)).await
}

pub async fn proceed(State(state): State<AppState>) -> Result<Redirect, AppError> {
    dispatch(&state, Action::Proceed).await
}

pub async fn chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Redirect, AppError> {
    dispatch(&state, Action::SubmitChat(form.message)).await
}

/// Streams one file part. Content is kept only while the file is still
/// below `limit`; past it the part is drained and only its size is counted,
/// so the validator can reject it without the whole file in memory.
async fn read_file(
    mut field: Field<'_>,
    name: String,
    limit: u64,
) -> Result<FileHandle, AppError> {
    let mut content = BytesMut::new();
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(AppError::bad_request)? {
        size += chunk.len() as u64;
        if size < limit {
            content.extend_from_slice(&chunk);
        } else if !content.is_empty() {
            content = BytesMut::new();
        }
    }

    if size < limit {
        Ok(FileHandle::new(name, content.freeze()))
    } else {
        tracing::debug!("[Routes] Discarded content of {} ({} bytes)", name, size);
        Ok(FileHandle::discarded(name, size))
    }
}

/// Applies the action and redirects back to the current view. An action
/// the current page does not offer leaves the view unchanged.
async fn dispatch(state: &AppState, action: Action) -> Result<Redirect, AppError> {
    match state.controller.dispatch(action).await {
        Ok(_) => {}
        Err(err) if err.is_invalid_transition() => {
            tracing::warn!("[Routes] {}", err);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to("/"))
}

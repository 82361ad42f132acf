use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::app::AppState;
use crate::assets::AssetCatalog;
use crate::error::AppError;

pub async fn serve(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let Some(path) = state.assets.resolve(&name) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let content = tokio::fs::read(&path).await?;
    Ok((
        [(header::CONTENT_TYPE, AssetCatalog::content_type(&name))],
        content,
    )
        .into_response())
}

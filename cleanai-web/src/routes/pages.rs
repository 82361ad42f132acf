use axum::Json;
use axum::extract::State;
use axum::response::Html;

use cleanai_core::View;

use crate::app::AppState;
use crate::error::AppError;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let view = state.controller.view().await?;
    let html = state.renderer.render(&view, &state.assets.links())?;
    Ok(Html(html))
}

pub async fn view_json(State(state): State<AppState>) -> Result<Json<View>, AppError> {
    Ok(Json(state.controller.view().await?))
}

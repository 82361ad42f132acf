use std::sync::Arc;

use anyhow::{Context, Result};
use cleanai_core::processor::DatasetProcessor;
use cleanai_core::{AppConfig, AppController};

use crate::app::AppState;
use crate::assets::AssetCatalog;
use crate::backend::HttpProcessor;
use crate::render::PageRenderer;

/// Builds the application state and spawns the session controller.
///
/// Must be called from within a tokio runtime.
pub fn bootstrap(config: &AppConfig) -> Result<AppState> {
    // 1. Resolve assets; missing files only produce warnings
    let assets = Arc::new(AssetCatalog::load(&config.assets));

    // 2. Compile the page templates
    let renderer = Arc::new(PageRenderer::new().context("Failed to compile page templates")?);

    // 3. Pick the dataset processor
    let mut controller = AppController::builder(config.clone());
    match HttpProcessor::from_config(&config.backend)? {
        Some(processor) => {
            tracing::info!("[Bootstrap] Using processing backend at {}", processor.endpoint());
            let processor: Arc<dyn DatasetProcessor> = Arc::new(processor);
            controller = controller.with_processor(processor);
        }
        None => {
            tracing::info!("[Bootstrap] No processing backend configured, uploads resolve locally");
        }
    }

    // 4. Start the session controller
    let controller = controller.spawn();

    Ok(AppState {
        controller,
        renderer,
        assets,
        max_file_bytes: config.upload.max_file_bytes,
    })
}

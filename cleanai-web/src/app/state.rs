use std::sync::Arc;

use cleanai_core::ControllerHandle;

use crate::assets::AssetCatalog;
use crate::render::PageRenderer;

/// Application state shared across route handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: ControllerHandle,
    pub renderer: Arc<PageRenderer>,
    pub assets: Arc<AssetCatalog>,
    /// Size at which upload intake stops buffering a file.
    pub max_file_bytes: u64,
}

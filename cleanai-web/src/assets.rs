//! Static visual assets.
//!
//! The catalog is resolved once at start-up from the configured directory.
//! A missing image is simply left out of the page. The loading animation is
//! different: its slot shows a visible warning instead, and the page still
//! renders.

use serde::Serialize;
use std::path::{Path, PathBuf};

use cleanai_core::config::AssetConfig;

/// State of the loading animation slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationSlot {
    Ready { name: String },
    Missing { warning: String },
}

/// Asset URLs handed to the templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetLinks {
    pub background: Option<String>,
    pub illustration: Option<String>,
    pub upload_icon: Option<String>,
    pub animation: Option<String>,
    pub animation_warning: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    dir: PathBuf,
    background: Option<String>,
    illustration: Option<String>,
    upload_icon: Option<String>,
    animation: AnimationSlot,
}

impl AssetCatalog {
    pub fn load(config: &AssetConfig) -> Self {
        let dir = config.dir.clone();
        let catalog = Self {
            background: Self::image(&dir, &config.background),
            illustration: Self::image(&dir, &config.illustration),
            upload_icon: Self::image(&dir, &config.upload_icon),
            animation: Self::animation(&dir, &config.animation),
            dir,
        };
        tracing::info!(
            "[AssetCatalog] Serving {} asset(s) from {}",
            catalog.names().count(),
            catalog.dir.display()
        );
        catalog
    }

    pub fn animation_slot(&self) -> &AnimationSlot {
        &self.animation
    }

    pub fn links(&self) -> AssetLinks {
        let (animation, animation_warning) = match &self.animation {
            AnimationSlot::Ready { name } => (Some(Self::url_for(name)), None),
            AnimationSlot::Missing { warning } => (None, Some(warning.clone())),
        };
        AssetLinks {
            background: self.background.as_deref().map(Self::url_for),
            illustration: self.illustration.as_deref().map(Self::url_for),
            upload_icon: self.upload_icon.as_deref().map(Self::url_for),
            animation,
            animation_warning,
        }
    }

    /// Path of a catalogued asset. Names outside the catalog resolve to
    /// nothing, so arbitrary files in the directory are never served.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.names()
            .any(|known| known == name)
            .then(|| self.dir.join(name))
    }

    pub fn content_type(name: &str) -> &'static str {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("webp") => "image/webp",
            Some("json") => "application/json",
            _ => "application/octet-stream",
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        let animation = match &self.animation {
            AnimationSlot::Ready { name } => Some(name.as_str()),
            AnimationSlot::Missing { .. } => None,
        };
        [
            self.background.as_deref(),
            self.illustration.as_deref(),
            self.upload_icon.as_deref(),
            animation,
        ]
        .into_iter()
        .flatten()
    }

    fn url_for(name: &str) -> String {
        format!("/assets/{name}")
    }

    fn image(dir: &Path, name: &str) -> Option<String> {
        if dir.join(name).is_file() {
            Some(name.to_string())
        } else {
            tracing::warn!(
                "[AssetCatalog] Image {} not found in {}, it will be omitted",
                name,
                dir.display()
            );
            None
        }
    }

    fn animation(dir: &Path, name: &str) -> AnimationSlot {
        let path = dir.join(name);
        let parsed = std::fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                serde_json::from_slice::<serde_json::Value>(&raw).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(_) => AnimationSlot::Ready {
                name: name.to_string(),
            },
            Err(reason) => {
                tracing::warn!(
                    "[AssetCatalog] Animation {} unavailable: {}",
                    path.display(),
                    reason
                );
                AnimationSlot::Missing {
                    warning: format!("Loading animation unavailable ({name})."),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &Path) -> AssetConfig {
        AssetConfig {
            dir: dir.to_path_buf(),
            ..AssetConfig::default()
        }
    }

    #[test]
    fn test_missing_assets_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::load(&config_for(dir.path()));

        let links = catalog.links();
        assert!(links.background.is_none());
        assert!(links.illustration.is_none());
        assert!(links.animation.is_none());
        assert_eq!(
            links.animation_warning.as_deref(),
            Some("Loading animation unavailable (loading.json).")
        );
        assert!(catalog.resolve("background.jpg").is_none());
    }

    #[test]
    fn test_present_assets_are_linked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("illustration.png"), b"png").unwrap();
        std::fs::write(dir.path().join("loading.json"), br#"{"v":"5.7.4"}"#).unwrap();
        let catalog = AssetCatalog::load(&config_for(dir.path()));

        let links = catalog.links();
        assert_eq!(links.illustration.as_deref(), Some("/assets/illustration.png"));
        assert_eq!(links.animation.as_deref(), Some("/assets/loading.json"));
        assert!(links.animation_warning.is_none());
        assert_eq!(
            catalog.resolve("illustration.png"),
            Some(dir.path().join("illustration.png"))
        );
    }

    #[test]
    fn test_invalid_animation_json_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("loading.json"), b"not json").unwrap();
        let catalog = AssetCatalog::load(&config_for(dir.path()));

        assert!(matches!(
            catalog.animation_slot(),
            AnimationSlot::Missing { .. }
        ));
    }

    #[test]
    fn test_only_catalogued_names_resolve() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("upload.png"), b"png").unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"nope").unwrap();
        let catalog = AssetCatalog::load(&config_for(dir.path()));

        assert!(catalog.resolve("upload.png").is_some());
        assert!(catalog.resolve("secret.txt").is_none());
        assert!(catalog.resolve("../upload.png").is_none());
    }

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(AssetCatalog::content_type("a.JPG"), "image/jpeg");
        assert_eq!(AssetCatalog::content_type("a.png"), "image/png");
        assert_eq!(AssetCatalog::content_type("a.json"), "application/json");
        assert_eq!(AssetCatalog::content_type("a"), "application/octet-stream");
    }
}

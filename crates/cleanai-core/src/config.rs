//! Application configuration.
//!
//! Configuration is read from a TOML file. Every field has a default, so a
//! missing file or a partial file is always valid:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8501"
//!
//! [upload]
//! max_file_bytes = 1048576
//! allowed_extensions = ["csv", "xlsx"]
//!
//! [backend]
//! endpoint = "http://localhost:8000/upload"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CleanAiError, Result};
use crate::responder::DEFAULT_ACKNOWLEDGMENT;
use crate::session::{DEFAULT_GREETING, MIB};
use crate::typer::default_facts;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "CLEANAI_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub typer: TyperConfig,
    pub chat: ChatConfig,
    pub assets: AssetConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Files must be strictly smaller than this.
    pub max_file_bytes: u64,
    /// Extensions offered by the selection control (without the dot).
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: MIB,
            allowed_extensions: vec!["csv".to_string(), "xlsx".to_string()],
        }
    }
}

impl UploadConfig {
    /// Value for the file input's `accept` attribute, e.g. `.csv,.xlsx`.
    pub fn accept_attribute(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TyperConfig {
    pub char_delay_ms: u64,
    pub pause_ms: u64,
    pub total_duration_ms: u64,
    pub facts_per_cycle: usize,
    pub facts: Vec<String>,
}

impl Default for TyperConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: 25,
            pause_ms: 300,
            total_duration_ms: 6_000,
            facts_per_cycle: 3,
            facts: default_facts(),
        }
    }
}

impl TyperConfig {
    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.total_duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub greeting: String,
    /// Fixed reply of the placeholder responder.
    pub acknowledgment: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            acknowledgment: DEFAULT_ACKNOWLEDGMENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub background: String,
    pub illustration: String,
    pub upload_icon: String,
    /// Loop animation descriptor (Lottie JSON).
    pub animation: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            background: "background.jpg".to_string(),
            illustration: "illustration.png".to_string(),
            upload_icon: "upload.png".to_string(),
            animation: "loading.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Processing endpoint. Without one, uploads resolve immediately.
    pub endpoint: Option<String>,
    /// Free-text instruction submitted with the files.
    pub instruction: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            instruction: "clean and preprocess".to_string(),
            timeout_secs: 120,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the first available source.
    ///
    /// Order: `explicit` path, the `CLEANAI_CONFIG` variable, then
    /// `<config_dir>/cleanai/config.toml`. When none of them exists the
    /// defaults are used. An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::info!("[AppConfig] No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CleanAiError::io(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!("[AppConfig] Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/cleanai/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cleanai").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload.max_file_bytes == 0 {
            return Err(CleanAiError::config("upload.max_file_bytes must be positive"));
        }
        if self.typer.char_delay_ms == 0 {
            return Err(CleanAiError::config("typer.char_delay_ms must be positive"));
        }
        if self.typer.facts_per_cycle == 0 {
            return Err(CleanAiError::config("typer.facts_per_cycle must be positive"));
        }
        if self.typer.facts.len() < self.typer.facts_per_cycle {
            return Err(CleanAiError::config(format!(
                "typer.facts has {} entries but facts_per_cycle is {}",
                self.typer.facts.len(),
                self.typer.facts_per_cycle
            )));
        }
        Ok(())
    }
}

use crate::error::ConfigError;
use pagesmith_editor::{FileHistoryStore, HistoryStore, MemoryHistoryStore, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_BASE_URL: &str = "https://pages.example.com";

/// Studio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioConfig {
    /// Quiet period before a slug or name availability check
    pub validation_debounce_ms: u64,

    /// Undo levels kept per document
    pub history_capacity: usize,

    /// Published pages live at `<base>/<slug>`
    pub published_base_url: String,

    /// Directory for persisted undo history; in-memory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            validation_debounce_ms: DEFAULT_DEBOUNCE_MS,
            history_capacity: DEFAULT_CAPACITY,
            published_base_url: DEFAULT_BASE_URL.to_string(),
            history_dir: None,
        }
    }
}

impl StudioConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            // Return default config if none exists
            Ok(StudioConfig::default())
        }
    }

    /// Write this config into `dir`, returning the file path
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);
        std::fs::write(&config_path, serde_json::to_string_pretty(self)?)?;
        Ok(config_path)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.validation_debounce_ms)
    }

    pub fn history_store(&self) -> Arc<dyn HistoryStore> {
        match &self.history_dir {
            Some(dir) => Arc::new(FileHistoryStore::new(dir.clone())),
            None => Arc::new(MemoryHistoryStore::new()),
        }
    }

    /// Public address of a page published under `slug`
    pub fn published_url(&self, slug: &str) -> String {
        format!("{}/{}", self.published_base_url.trim_end_matches('/'), slug)
    }
}

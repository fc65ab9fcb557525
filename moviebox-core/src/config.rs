use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::loader::{CatalogSource, LoaderConfig};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub links: LinksConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// URL or file path of the document holding `videos`.
    pub source: String,
    /// Optional second document holding `translations`.
    pub translations_source: Option<String>,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Opened in the system browser from the "apps" nav entry.
    pub external_app_url: String,
    /// Shown in the embedded-content modal from the profile view.
    pub embed_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub notice_seconds: u64,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "videos_photos.json".to_owned(),
            translations_source: None,
            request_timeout_seconds: 10,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            external_app_url: "https://wyap-pstore.vercel.app/".to_owned(),
            embed_url: "https://allkar.vercel.app/".to_owned(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_seconds: 5,
            window_width: 900.0,
            window_height: 800.0,
        }
    }
}

impl AppConfig {
    /// Path of the configuration file
    pub fn config_file_path() -> Result<PathBuf, StoreError> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        let app_config_dir = config_dir.join("moviebox");
        std::fs::create_dir_all(&app_config_dir)?;
        Ok(app_config_dir.join("config.json"))
    }

    /// Loads the configuration, or writes and returns the defaults
    pub fn load() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_or_init(&path),
            Err(e) => {
                warn!(error = %e, "no config location, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_or_init(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "could not load configuration, using defaults");
                let default_config = Self::default();
                if !path.exists() {
                    if let Err(save_err) = default_config.save_to(path) {
                        warn!(error = %save_err, "could not save default configuration");
                    }
                }
                default_config
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let config_content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let config_json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, config_json)?;
        Ok(())
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            source: CatalogSource::parse(&self.catalog.source),
            translations_source: self
                .catalog
                .translations_source
                .as_deref()
                .map(CatalogSource::parse),
            request_timeout: Duration::from_secs(self.catalog.request_timeout_seconds.max(1)),
        }
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.ui.notice_seconds)
    }
}

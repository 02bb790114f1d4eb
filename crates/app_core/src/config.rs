//! Application configuration

use crate::command::CommandId;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub server: ServerConfig,
    pub gallery: GalleryConfig,
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            gallery: GalleryConfig::default(),
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub theme: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            window_width: 1024,
            window_height: 768,
        }
    }
}

/// Where the cache server lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Grid and lazy loading behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Edge length of decoded grid thumbnails, in pixels
    pub thumbnail_size: u32,
    /// Extra space below the viewport that still counts as visible
    pub root_margin_px: f32,
    /// Minimum visible fraction of a cell before its image is fetched
    pub visibility_threshold: f32,
    /// Cap on simultaneous thumbnail fetches
    pub max_concurrent_fetches: usize,
    /// Longest edge of images decoded for the modal viewer
    pub viewer_max_dimension: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 256,
            root_margin_px: 50.0,
            visibility_threshold: 0.01,
            max_concurrent_fetches: 8,
            viewer_max_dimension: 4096,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, falling back to defaults if it is absent
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "CacheViewer", "CacheViewer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    // Modal navigation
    kb.insert(CommandId::NAV_NEXT_ITEM.into(), vec!["Right".into(), "l".into()]);
    kb.insert(CommandId::NAV_PREV_ITEM.into(), vec!["Left".into(), "h".into()]);
    kb.insert(CommandId::VIEW_CLOSE_MODAL.into(), vec!["Escape".into()]);

    // App
    kb.insert(CommandId::APP_REFRESH.into(), vec!["F5".into(), "Ctrl+r".into()]);
    kb.insert(CommandId::APP_EXIT.into(), vec!["Alt+F4".into(), "q".into()]);

    kb
}

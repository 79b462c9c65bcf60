//! Showcase configuration.
//!
//! Read from `vitrine.toml` in the working directory, or from the file named
//! by `VITRINE_CONFIG`. Every field is optional; a missing default file is the
//! same as an empty one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "VITRINE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "vitrine.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowcaseConfig {
    pub window: WindowConfig,
    /// Scene shown when the window opens.
    pub initial_scene: String,
    /// `env_logger` filter; overrides `RUST_LOG`.
    pub log_filter: Option<String>,
    pub assets: AssetConfig,
    pub dialogue: DialogueConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Directory relative paths are resolved against.
    pub root: PathBuf,
    /// Start screen backdrop. Falls back to a flat fill when the file is missing.
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialogueConfig {
    /// Location handed to the content source by the dialogue scene.
    pub location: String,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            initial_scene: "start".to_string(),
            log_filter: None,
            assets: AssetConfig::default(),
            dialogue: DialogueConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Vitrine Showcase".to_string(), width: 1280.0, height: 720.0 }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("."), background: Some("assets/bg.jpg".to_string()) }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self { location: "assets/magicwords.json".to_string() }
    }
}

impl ShowcaseConfig {
    /// Loads from `VITRINE_CONFIG` if set, otherwise from `vitrine.toml` if present.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Self::from_optional_file(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the defaults.
    pub fn from_optional_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.window.width <= 0.0 || config.window.height <= 0.0 {
            anyhow::bail!(
                "window size must be positive, got {}x{}",
                config.window.width,
                config.window.height
            );
        }
        Ok(config)
    }

    /// Resolves an asset path against `assets.root`.
    pub fn asset_path(&self, relative: &str) -> PathBuf {
        self.assets.root.join(relative)
    }

    /// Backdrop for the start screen, if configured and present on disk.
    pub fn background_image(&self) -> Option<String> {
        self.assets
            .background
            .as_ref()
            .filter(|p| self.asset_path(p).is_file())
            .cloned()
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pairflip_core::{DealConfig, SessionConfig};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_IMAGE_DIR: &str = "data/img";
pub(crate) const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "gif", "png"];

/// Everything the terminal front end can be told through a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Folder opened at startup and by `o` without an argument.
    pub image_dir: PathBuf,
    /// File extensions treated as images, compared case-insensitively.
    pub extensions: Vec<String>,
    pub reshuffle_on_restart: bool,
    /// Ring the terminal bell along with the success/fail/end cues.
    pub bell: bool,
    pub deal: DealConfig,
    pub session: SessionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            reshuffle_on_restart: false,
            bell: true,
            deal: DealConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let mut settings: Self = toml::from_str(text).context("Invalid settings")?;
        settings.deal = settings.deal.sanitized();
        Ok(settings)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("Could not parse {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

use anyhow::Result;
use cms_site_cloud::{ContentConfig, DEFAULT_POSTS_LIMIT};
use cms_site_core::SubstitutionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub content: ContentConfig,

    /// Where the language preference is kept; `None` uses the platform data dir
    pub preferences_path: Option<PathBuf>,
    /// Run without persisted preferences (language always starts at "en")
    pub ephemeral: bool,

    pub placeholder_mode: SubstitutionMode,
    pub posts_per_section: u32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            preferences_path: None,
            ephemeral: false,
            placeholder_mode: SubstitutionMode::default(),
            posts_per_section: DEFAULT_POSTS_LIMIT,
        }
    }
}

impl SiteSettings {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("cms-site");

        Ok(config_dir.join("settings.json"))
    }

    /// Settings file (if any) with the content environment variables on top
    pub fn load() -> Result<SiteSettings> {
        let mut settings = Self::load_from(&Self::get_config_path()?)?;
        settings.content = settings.content.overlay(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<SiteSettings> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: SiteSettings = serde_json::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(SiteSettings::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

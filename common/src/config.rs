use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::image::DEFAULT_IMAGE_BASE_URL;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// User-level settings, persisted as JSON in the platform config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub api_base_url: String,
    pub image_base_url: String,
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            request_timeout_secs: 120,
            log_path: None,
        }
    }
}

impl SlideConfig {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find config directory"))?
            .join("slidegen");
        Ok(config_dir.join("config.json"))
    }

    /// Load configuration from the user config file, defaults when absent
    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: SlideConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the user config file
    pub async fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path).await?;
        Ok(path)
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlideConfig::load_from(&dir.path().join("nope.json"))
            .await
            .unwrap();
        assert_eq!(config, SlideConfig::default());
        assert_eq!(config.model, "gemini-3-flash-preview");
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"model": "gemini-2.5-pro", "temperature": 0.2}"#)
            .await
            .unwrap();
        let config = SlideConfig::load_from(&path).await.unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/config.json");
        let mut config = SlideConfig::default();
        config.output_dir = PathBuf::from("decks");
        config.save_to(&path).await.unwrap();
        assert_eq!(SlideConfig::load_from(&path).await.unwrap(), config);
    }
}

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use slidegen_common::SlideConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project-level config files, first match wins.
pub const PROJECT_CONFIG_PATHS: [&str; 4] = [
    ".slidegen/config.toml",
    ".slidegen/config.json",
    "slidegen.config.toml",
    "slidegen.config.json",
];

/// Partial settings from a project file. Only present keys override.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub api_base_url: Option<String>,
    pub image_base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub log_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let invalid = |reason: String| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;

        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).map_err(|e| invalid(e.to_string()))
        } else {
            serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))
        }
    }

    /// First project file found under `dir`, if any.
    pub fn discover(dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for candidate in PROJECT_CONFIG_PATHS {
            let path = dir.join(candidate);
            if path.exists() {
                let file = Self::load_from_file(&path)?;
                tracing::info!("Loaded project configuration from {}", path.display());
                return Ok(Some((path, file)));
            }
        }
        Ok(None)
    }

    fn apply_to(self, settings: &mut SlideConfig) {
        if let Some(key) = self.api_key {
            settings.api_key = Some(key);
        }
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = temperature;
        }
        if let Some(url) = self.api_base_url {
            settings.api_base_url = url;
        }
        if let Some(url) = self.image_base_url {
            settings.image_base_url = url;
        }
        if let Some(dir) = self.output_dir {
            settings.output_dir = dir;
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout_secs = secs;
        }
        if let Some(path) = self.log_path {
            settings.log_path = Some(path);
        }
    }
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces the user config file location.
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub offline: bool,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub settings: SlideConfig,
    /// Use the built-in deck generator and skip image downloads.
    pub offline: bool,
    /// Files that contributed, in the order they were applied.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// user file -> project file -> environment -> command line
    pub async fn load(overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_layered(overrides, &cwd, |key| std::env::var(key).ok()).await
    }

    pub async fn load_layered<F>(overrides: ConfigOverrides, project_dir: &Path, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        let user_path = match overrides.config_path.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::InvalidFile {
                        path: path.display().to_string(),
                        reason: "file not found".to_string(),
                    }
                    .into());
                }
                Some(path)
            }
            None => SlideConfig::config_path().ok(),
        };
        if let Some(path) = user_path {
            if path.exists() {
                config.settings = SlideConfig::load_from(&path).await?;
                tracing::info!("Loaded user configuration from {}", path.display());
                config.sources.push(path);
            }
        }

        if let Some((path, file)) = ConfigFile::discover(project_dir)? {
            file.apply_to(&mut config.settings);
            config.sources.push(path);
        }

        config.apply_env(env);
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Temperature must lie in Gemini's 0.0..=2.0 and the timeout be non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.settings.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature".to_string(),
                value: temperature.to_string(),
            });
        }
        if self.settings.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// `GEMINI_API_KEY` wins over `SLIDEGEN_API_KEY`.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("SLIDEGEN_API_KEY")) {
            self.settings.api_key = Some(key);
        }
        if let Some(model) = non_empty("SLIDEGEN_MODEL") {
            self.settings.model = model;
        }
        if let Some(dir) = non_empty("SLIDEGEN_OUTPUT_DIR") {
            self.settings.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty("SLIDEGEN_LOG_PATH") {
            self.settings.log_path = Some(PathBuf::from(path));
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(model) = overrides.model {
            self.settings.model = model;
        }
        if let Some(dir) = overrides.output_dir {
            self.settings.output_dir = dir;
        }
        if overrides.offline {
            self.offline = true;
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.settings
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.settings.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.settings
            .log_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("slidegen.log"))
    }

    /// Settings with the API key masked, for display.
    pub fn redacted(&self) -> SlideConfig {
        let mut settings = self.settings.clone();
        settings.api_key = settings.api_key.map(|key| redact_key(&key));
        settings
    }
}

fn redact_key(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn isolated(dir: &Path) -> ConfigOverrides {
        // point the user file somewhere empty so the real home directory is ignored
        let user = dir.join("user.json");
        std::fs::write(&user, "{}").unwrap();
        ConfigOverrides {
            config_path: Some(user),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_layered(isolated(dir.path()), dir.path(), env_of(&[]))
            .await
            .unwrap();
        assert_eq!(config.settings.model, "gemini-3-flash-preview");
        assert_eq!(config.settings.temperature, 0.7);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert!(!config.has_api_key());
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_layer_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut overrides = isolated(dir.path());
        std::fs::write(
            dir.path().join("user.json"),
            r#"{"model": "user-model", "api_key": "user-key", "output_dir": "user-out"}"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join(".slidegen")).unwrap();
        std::fs::write(
            dir.path().join(".slidegen/config.toml"),
            "model = \"project-model\"\ntemperature = 0.3\n",
        )
        .unwrap();
        overrides.output_dir = Some(PathBuf::from("cli-out"));

        let config = Config::load_layered(
            overrides,
            dir.path(),
            env_of(&[("SLIDEGEN_MODEL", "env-model"), ("SLIDEGEN_API_KEY", "env-key")]),
        )
        .await
        .unwrap();

        assert_eq!(config.settings.model, "env-model");
        assert_eq!(config.settings.temperature, 0.3);
        assert_eq!(config.settings.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.settings.output_dir, PathBuf::from("cli-out"));
        assert_eq!(config.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_gemini_key_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_layered(
            isolated(dir.path()),
            dir.path(),
            env_of(&[("SLIDEGEN_API_KEY", "b"), ("GEMINI_API_KEY", "a"), ("SLIDEGEN_MODEL", "  ")]),
        )
        .await
        .unwrap();
        assert_eq!(config.api_key().unwrap(), "a");
        assert_eq!(config.settings.model, "gemini-3-flash-preview");
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = ConfigOverrides {
            config_path: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        assert!(Config::load_layered(overrides, dir.path(), env_of(&[])).await.is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slidegen.config.toml"), "temperature = 3.5\n").unwrap();
        let err = Config::load_layered(isolated(dir.path()), dir.path(), env_of(&[]))
            .await
            .unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::InvalidValue { field, value }) => {
                assert_eq!(field, "temperature");
                assert_eq!(value, "3.5");
            }
            other => panic!("expected invalid temperature, got {other:?}"),
        }

        let mut config = Config::default();
        config.settings.request_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "request_timeout_secs"
        ));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_project_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slidegen.config.json"), "{ nope").unwrap();
        assert!(matches!(
            ConfigFile::discover(dir.path()),
            Err(ConfigError::InvalidFile { .. })
        ));
    }

    #[test]
    fn test_redacted() {
        let mut config = Config::default();
        config.settings.api_key = Some("AIzaSyExample1234".to_string());
        assert_eq!(config.redacted().api_key.as_deref(), Some("****1234"));
        config.settings.api_key = Some("short".to_string());
        assert_eq!(config.redacted().api_key.as_deref(), Some("****"));
    }
}

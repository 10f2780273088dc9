//! XDG config store adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Directory name under the user's config directory
const APP_DIR: &str = "voice-auditor";

/// Config store at `$XDG_CONFIG_HOME/voice-auditor/config.toml`
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Create a store at the platform config location
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", self.path.display(), e)))?;

        Self::parse_toml(&content)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(config)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path().to_string_lossy();
        assert!(path.contains("voice-auditor"));
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn parse_nested_whisper_section() {
        let content = r#"
recognizer = "whisper"
poll_interval = "250ms"
unanswered = "replay"
extensions = ["mp3", "flac"]

[whisper]
model = "/models/ggml-base.en.bin"
language = "en"
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.recognizer, Some("whisper".to_string()));
        assert_eq!(config.poll_interval_or_default().as_millis(), 250);
        assert_eq!(config.extensions_or_default(), vec!["mp3", "flac"]);
        assert_eq!(
            config.whisper_model(),
            Some(PathBuf::from("/models/ggml-base.en.bin"))
        );
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let err = XdgConfigStore::parse_toml("extensions = \"mp3\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let config = store.load().await.unwrap();
        assert!(config.recognizer.is_none());
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested").join("config.toml"));

        store.init().await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.unanswered, Some("skip".to_string()));
        assert_eq!(loaded.poll_interval, Some("500ms".to_string()));

        let err = store.init().await.unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let config = AppConfig {
            recognizer: Some("whisper".to_string()),
            ..Default::default()
        };

        store.save(&config).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.recognizer, Some("whisper".to_string()));
        assert!(loaded.whisper.is_none());
    }
}

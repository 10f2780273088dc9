//! Configuration port interface

use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for persisted user configuration
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the stored configuration.
    ///
    /// A missing file is not an error: it yields [`AppConfig::empty`] so it
    /// merges as a no-op layer.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the stored configuration.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the configuration file
    fn path(&self) -> &Path;

    /// Whether the configuration file exists
    fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Write a file holding [`AppConfig::defaults`].
    /// Fails with [`ConfigError::AlreadyExists`] rather than overwrite.
    async fn init(&self) -> Result<(), ConfigError>;
}

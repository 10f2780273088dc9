//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::audit::UnansweredPolicy;
use crate::domain::config::{AppConfig, WhisperConfig};
use crate::domain::error::ConfigError;
use crate::domain::recognition::RecognizerKind;
use crate::domain::timing::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value);
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(get_value(&config, key).as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, get_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Store a validated value under `key`
fn set_value(config: &mut AppConfig, key: &str, value: &str) {
    match key {
        "recognizer" => config.recognizer = Some(value.to_lowercase()),
        "poll_interval" => config.poll_interval = Some(value.to_string()),
        "unanswered" => config.unanswered = Some(value.to_lowercase()),
        "extensions" => config.extensions = Some(split_list(value)),
        "whisper.model" => {
            config.whisper.get_or_insert_with(WhisperConfig::default).model = Some(value.to_string())
        }
        "whisper.language" => {
            config.whisper.get_or_insert_with(WhisperConfig::default).language =
                Some(value.to_string())
        }
        _ => unreachable!(), // Already validated
    }
}

/// Read `key` back as display text
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "recognizer" => config.recognizer.clone(),
        "poll_interval" => config.poll_interval.clone(),
        "unanswered" => config.unanswered.clone(),
        "extensions" => config.extensions.as_ref().map(|list| list.join(",")),
        "whisper.model" => config.whisper.as_ref().and_then(|w| w.model.clone()),
        "whisper.language" => config.whisper.as_ref().and_then(|w| w.language.clone()),
        _ => None,
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "recognizer" => {
            value
                .parse::<RecognizerKind>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "poll_interval" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "unanswered" => {
            value
                .parse::<UnansweredPolicy>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "extensions" => {
            if split_list(value).is_empty() {
                return Err(invalid("Expected a comma separated list, e.g. mp3,wav".to_string()));
            }
        }
        "whisper.model" | "whisper.language" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Split "mp3, .WAV" into ["mp3", "wav"]
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;

    #[test]
    fn validate_poll_interval() {
        assert!(validate_config_value("poll_interval", "500ms").is_ok());
        assert!(validate_config_value("poll_interval", "1s").is_ok());
        assert!(validate_config_value("poll_interval", "soon").is_err());
        assert!(validate_config_value("poll_interval", "0ms").is_err());
    }

    #[test]
    fn validate_enums() {
        assert!(validate_config_value("recognizer", "whisper").is_ok());
        assert!(validate_config_value("recognizer", "siri").is_err());
        assert!(validate_config_value("unanswered", "replay").is_ok());
        assert!(validate_config_value("unanswered", "later").is_err());
    }

    #[test]
    fn validate_extensions() {
        assert!(validate_config_value("extensions", "mp3,wav").is_ok());
        assert!(validate_config_value("extensions", " , ").is_err());
    }

    #[test]
    fn split_list_normalizes() {
        assert_eq!(split_list("mp3, .WAV,,flac "), vec!["mp3", "wav", "flac"]);
    }

    #[test]
    fn set_then_get_nested_key() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "whisper.model", "/models/base.bin");
        assert_eq!(
            get_value(&config, "whisper.model"),
            Some("/models/base.bin".to_string())
        );
        assert_eq!(get_value(&config, "whisper.language"), None);
    }

    #[tokio::test]
    async fn set_persists_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "extensions", "mp3,wav").await.unwrap();
        let config = store.load().await.unwrap();
        assert_eq!(config.extensions_or_default(), vec!["mp3", "wav"]);
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let err = handle_set(&store, &Presenter::new(), "api_key", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
        assert!(!store.exists());
    }
}

//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::audit::UnansweredPolicy;
use crate::domain::recognition::RecognizerKind;
use crate::domain::timing::Duration;

/// Audio file extension scanned when none is configured
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Whisper language used when none is configured
pub const DEFAULT_WHISPER_LANGUAGE: &str = "en";

/// Whisper recognizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhisperConfig {
    /// Path to a GGML Whisper model file
    pub model: Option<String>,
    /// Spoken language code (e.g. "en")
    pub language: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub recognizer: Option<String>,
    pub poll_interval: Option<String>,
    pub unanswered: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub whisper: Option<WhisperConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            recognizer: Some(RecognizerKind::default().to_string()),
            poll_interval: Some(Duration::default_poll_interval().to_string()),
            unanswered: Some(UnansweredPolicy::default().to_string()),
            extensions: Some(vec![DEFAULT_EXTENSION.to_string()]),
            whisper: Some(WhisperConfig {
                model: None,
                language: Some(DEFAULT_WHISPER_LANGUAGE.to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            recognizer: other.recognizer.or(self.recognizer),
            poll_interval: other.poll_interval.or(self.poll_interval),
            unanswered: other.unanswered.or(self.unanswered),
            extensions: other.extensions.or(self.extensions),
            whisper: Self::merge_whisper_config(self.whisper, other.whisper),
        }
    }

    /// Merge Whisper config sections
    fn merge_whisper_config(
        base: Option<WhisperConfig>,
        other: Option<WhisperConfig>,
    ) -> Option<WhisperConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(WhisperConfig {
                model: o.model.or(b.model),
                language: o.language.or(b.language),
            }),
        }
    }

    /// Get recognizer kind, or console if not set/invalid
    pub fn recognizer_or_default(&self) -> RecognizerKind {
        self.recognizer
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get poll interval as parsed Duration, or default if not set/invalid
    pub fn poll_interval_or_default(&self) -> Duration {
        self.poll_interval
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_poll_interval)
    }

    /// Get unanswered-file policy, or skip if not set/invalid
    pub fn unanswered_or_default(&self) -> UnansweredPolicy {
        self.unanswered
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get normalized audio extensions (lowercase, no leading dot), or mp3
    pub fn extensions_or_default(&self) -> Vec<String> {
        let extensions: Vec<String> = self
            .extensions
            .iter()
            .flatten()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        if extensions.is_empty() {
            vec![DEFAULT_EXTENSION.to_string()]
        } else {
            extensions
        }
    }

    /// Get the Whisper model path, if configured
    pub fn whisper_model(&self) -> Option<PathBuf> {
        self.whisper
            .as_ref()
            .and_then(|w| w.model.as_deref())
            .filter(|m| !m.is_empty())
            .map(PathBuf::from)
    }

    /// Get the Whisper language, or "en" if not set
    pub fn whisper_language_or_default(&self) -> &str {
        self.whisper
            .as_ref()
            .and_then(|w| w.language.as_deref())
            .unwrap_or(DEFAULT_WHISPER_LANGUAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.recognizer, Some("console".to_string()));
        assert_eq!(config.poll_interval, Some("500ms".to_string()));
        assert_eq!(config.unanswered, Some("skip".to_string()));
        assert_eq!(config.extensions, Some(vec!["mp3".to_string()]));
        assert!(config.whisper_model().is_none());
        assert_eq!(config.whisper_language_or_default(), "en");
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.recognizer.is_none());
        assert!(config.poll_interval.is_none());
        assert!(config.unanswered.is_none());
        assert!(config.extensions.is_none());
        assert!(config.whisper.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            recognizer: Some("console".to_string()),
            poll_interval: Some("1s".to_string()),
            unanswered: Some("skip".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            recognizer: Some("whisper".to_string()),
            poll_interval: None, // Should not override
            unanswered: Some("replay".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.recognizer, Some("whisper".to_string()));
        assert_eq!(merged.poll_interval, Some("1s".to_string())); // Kept from base
        assert_eq!(merged.unanswered, Some("replay".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            extensions: Some(vec!["wav".to_string()]),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.extensions, Some(vec!["wav".to_string()]));
    }

    #[test]
    fn poll_interval_or_default_parses() {
        let config = AppConfig {
            poll_interval: Some("250ms".to_string()),
            ..Default::default()
        };
        assert_eq!(config.poll_interval_or_default().as_millis(), 250);
    }

    #[test]
    fn poll_interval_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            poll_interval: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.poll_interval_or_default().as_millis(), 500);
    }

    #[test]
    fn recognizer_and_policy_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.recognizer_or_default(), RecognizerKind::Console);
        assert_eq!(config.unanswered_or_default(), UnansweredPolicy::Skip);
    }

    #[test]
    fn extensions_are_normalized() {
        let config = AppConfig {
            extensions: Some(vec![".MP3".to_string(), " wav ".to_string(), "".to_string()]),
            ..Default::default()
        };
        assert_eq!(config.extensions_or_default(), vec!["mp3", "wav"]);
    }

    #[test]
    fn extensions_fall_back_to_mp3() {
        let config = AppConfig {
            extensions: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(config.extensions_or_default(), vec!["mp3"]);
    }

    #[test]
    fn merge_whisper_config() {
        let base = AppConfig {
            whisper: Some(WhisperConfig {
                model: Some("/models/base.bin".to_string()),
                language: Some("en".to_string()),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            whisper: Some(WhisperConfig {
                language: Some("de".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert_eq!(merged.whisper_model(), Some(PathBuf::from("/models/base.bin")));
        assert_eq!(merged.whisper_language_or_default(), "de");
    }
}

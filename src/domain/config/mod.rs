//! Configuration domain

mod app_config;

pub use app_config::{AppConfig, WhisperConfig, DEFAULT_EXTENSION, DEFAULT_WHISPER_LANGUAGE};

//! Domain error types

use std::path::PathBuf;

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected <number> followed by ms, s or m (e.g., 500ms, 2s, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown unanswered-file policy is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid unanswered policy: \"{input}\". Valid policies are: skip, replay")]
pub struct InvalidPolicyError {
    pub input: String,
}

/// Error when an unknown recognizer backend is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid recognizer: \"{input}\". Valid recognizers are: console, whisper")]
pub struct InvalidRecognizerError {
    pub input: String,
}

/// Error when the input/output directory pair cannot be audited safely
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootsError {
    #[error("Output directory {0} does not exist")]
    OutputMissing(PathBuf),

    #[error("Output directory {output} must not be within input directory {input}")]
    OutputInsideInput { output: PathBuf, input: PathBuf },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

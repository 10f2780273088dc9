//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::audit::UnansweredPolicy;
use crate::domain::recognition::RecognizerKind;
use crate::domain::timing::Duration;
use crate::infrastructure::RecognizerOptions;

/// Voice Auditor - listen to audio files and sort them by voice
#[derive(Parser, Debug)]
#[command(name = "voice-auditor")]
#[command(version)]
#[command(about = "Play each audio file and accept, delete or skip it by voice")]
#[command(long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    /// Directory to audit, scanned recursively
    #[arg(short, long, value_name = "DIR", required = true)]
    pub input: Option<PathBuf>,

    /// Existing directory accepted files are moved into (not inside input)
    #[arg(short, long, value_name = "DIR", required = true)]
    pub output: Option<PathBuf>,

    /// Speech recognition backend
    #[arg(short, long, value_name = "BACKEND")]
    pub recognizer: Option<RecognizerArg>,

    /// Whisper GGML model file
    #[arg(short, long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Spoken language code for Whisper (e.g., en, de)
    #[arg(short, long, value_name = "CODE")]
    pub language: Option<String>,

    /// How often playback is checked (e.g., 500ms, 1s)
    #[arg(short, long, value_name = "TIME")]
    pub poll_interval: Option<String>,

    /// What to do when a file ends without a command
    #[arg(short, long, value_name = "POLICY")]
    pub unanswered: Option<PolicyArg>,

    /// Audio file extensions to audit, comma separated (default: mp3)
    #[arg(short, long, value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Show debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Recognizer argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecognizerArg {
    Console,
    Whisper,
}

impl From<RecognizerArg> for RecognizerKind {
    fn from(arg: RecognizerArg) -> Self {
        match arg {
            RecognizerArg::Console => RecognizerKind::Console,
            RecognizerArg::Whisper => RecognizerKind::Whisper,
        }
    }
}

/// Unanswered policy argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Leave the file in place and move on
    Skip,
    /// Play the file again
    Replay,
}

impl From<PolicyArg> for UnansweredPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Skip => UnansweredPolicy::Skip,
            PolicyArg::Replay => UnansweredPolicy::Replay,
        }
    }
}

/// Parsed audit options
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub recognizer: RecognizerOptions,
    pub poll_interval: Duration,
    pub unanswered: UnansweredPolicy,
    pub extensions: Vec<String>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "recognizer",
    "poll_interval",
    "unanswered",
    "extensions",
    "whisper.model",
    "whisper.language",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod player;
pub mod recognizer;
pub mod scanner;

// Re-export common types
pub use config::ConfigStore;
pub use player::{AudioPlayer, PlaybackError, PlaybackHandle};
pub use recognizer::{RecognitionError, RecognitionSink, SpeechRecognizer};
pub use scanner::{AudioFileScanner, ScanError};

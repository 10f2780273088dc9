//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! rodio playback, stdin/Whisper recognition, walkdir scanning
//! and the XDG config file.

pub mod config;
pub mod playback;
pub mod recognition;
pub mod scanner;

// Re-export adapters
pub use config::XdgConfigStore;
pub use playback::RodioPlayer;
pub use recognition::{create_recognizer, ConsoleRecognizer, RecognizerOptions};
#[cfg(feature = "whisper")]
pub use recognition::WhisperRecognizer;
pub use scanner::WalkdirScanner;

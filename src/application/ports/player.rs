//! Audio playback port interfaces

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to open {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("Failed to decode {path}: {message}")]
    DecodeFailed { path: String, message: String },

    #[error("Audio output device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Another file is already playing: {0}")]
    AlreadyActive(String),
}

/// Handle to one running playback.
///
/// Dropping the handle must release the device and decoded audio, exactly
/// like calling [`PlaybackHandle::stop`].
pub trait PlaybackHandle: Send {
    /// Non-blocking check whether audio is still being produced
    fn is_playing(&self) -> bool;

    /// Stop playback and release its resources. Calling it again is a no-op.
    fn stop(&mut self);
}

/// Port for audio file playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Open, decode and start playing a file.
    ///
    /// # Arguments
    /// * `path` - The audio file to play
    ///
    /// # Returns
    /// A handle controlling the running playback, or an error if the file
    /// cannot be opened or decoded
    async fn play(&self, path: &Path) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}

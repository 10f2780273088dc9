//! Playback controller: owns the single active playback session

use std::path::{Path, PathBuf};

use crate::domain::audit::PlaybackState;

use super::ports::{AudioPlayer, PlaybackError, PlaybackHandle};

/// The file currently loaded for playback.
///
/// Owns the playback handle; dropping the session releases the device and
/// the decoded audio.
pub struct PlaybackSession {
    path: PathBuf,
    handle: Box<dyn PlaybackHandle>,
}

impl PlaybackSession {
    /// File being played
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking playback state query
    pub fn is_playing(&self) -> bool {
        self.handle.is_playing()
    }

    /// Stop and release, returning the file that was playing
    pub fn stop(mut self) -> PathBuf {
        self.handle.stop();
        std::mem::take(&mut self.path)
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        // Handles treat a second stop as a no-op
        self.handle.stop();
    }
}

/// Controls the lifecycle of the one file being played.
///
/// State machine:
///   IDLE -> PLAYING (start)
///   PLAYING -> IDLE (stop, or playback reaching the end of the file)
pub struct PlaybackController<P: AudioPlayer> {
    player: P,
    session: Option<PlaybackSession>,
}

impl<P: AudioPlayer> PlaybackController<P> {
    /// Create an idle controller around a player
    pub fn new(player: P) -> Self {
        Self {
            player,
            session: None,
        }
    }

    /// Start playing `path`.
    ///
    /// Fails with [`PlaybackError::AlreadyActive`] if a session is still
    /// loaded; callers must `stop` first.
    pub async fn start(&mut self, path: &Path) -> Result<(), PlaybackError> {
        if let Some(active) = &self.session {
            return Err(PlaybackError::AlreadyActive(
                active.path().display().to_string(),
            ));
        }

        let handle = self.player.play(path).await?;
        tracing::debug!(path = %path.display(), "playback started");

        self.session = Some(PlaybackSession {
            path: path.to_path_buf(),
            handle,
        });
        Ok(())
    }

    /// Whether audio is still playing
    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(PlaybackSession::is_playing)
    }

    /// Current state of the controller
    pub fn state(&self) -> PlaybackState {
        if self.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// File of the loaded session, if any
    pub fn current_file(&self) -> Option<&Path> {
        self.session.as_ref().map(PlaybackSession::path)
    }

    /// Stop playback and release the session.
    ///
    /// Returns the file that was loaded, or `None` when already idle.
    pub fn stop(&mut self) -> Option<PathBuf> {
        let path = self.session.take()?.stop();
        tracing::debug!(path = %path.display(), "playback released");
        Some(path)
    }
}

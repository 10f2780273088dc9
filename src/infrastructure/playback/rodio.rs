//! Rodio-based file player
//!
//! `OutputStream` is not `Send`, so every playback session lives on its own
//! thread which owns the stream, the sink and the decoder until the file
//! ends or a stop is requested.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;

use crate::application::ports::{AudioPlayer, PlaybackError, PlaybackHandle};

/// How often the session thread checks for end-of-stream or a stop request.
///
/// `stop` joins the session thread on the caller's thread, so it blocks for
/// at most one tick. It also runs from `Drop`, which rules out handing the
/// join to a blocking task.
const SESSION_TICK: Duration = Duration::from_millis(20);

/// Plays files on the default output device
pub struct RodioPlayer;

impl RodioPlayer {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, path: &Path) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let path = path.to_path_buf();
        let playing = Arc::new(AtomicBool::new(true));
        let stop_requested = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = oneshot::channel();

        let thread = {
            let playing = Arc::clone(&playing);
            let stop_requested = Arc::clone(&stop_requested);
            thread::Builder::new()
                .name("playback".to_string())
                .spawn(move || run_session(path, ready_tx, playing, stop_requested))
                .map_err(|e| PlaybackError::PlaybackFailed(format!("Failed to spawn thread: {}", e)))?
        };

        let mut handle = RodioPlayback {
            playing,
            stop_requested,
            thread: Some(thread),
        };

        match ready_rx.await {
            Ok(Ok(())) => Ok(Box::new(handle)),
            Ok(Err(e)) => {
                handle.stop();
                Err(e)
            }
            Err(_) => {
                handle.stop();
                Err(PlaybackError::PlaybackFailed(
                    "Playback thread exited before starting".to_string(),
                ))
            }
        }
    }
}

/// Handle to a session thread
struct RodioPlayback {
    playing: Arc<AtomicBool>,
    stop_requested: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackHandle for RodioPlayback {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn stop(&mut self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("playback thread panicked");
            }
        }
        self.playing.store(false, Ordering::SeqCst);
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the session thread
fn run_session(
    path: PathBuf,
    ready: oneshot::Sender<Result<(), PlaybackError>>,
    playing: Arc<AtomicBool>,
    stop_requested: Arc<AtomicBool>,
) {
    let (_stream, sink) = match open_session(&path) {
        Ok(session) => session,
        Err(e) => {
            playing.store(false, Ordering::SeqCst);
            let _ = ready.send(Err(e));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    while !stop_requested.load(Ordering::SeqCst) && !sink.empty() {
        thread::sleep(SESSION_TICK);
    }

    sink.stop();
    playing.store(false, Ordering::SeqCst);
    tracing::debug!(path = %path.display(), "playback session released");
}

/// Decode first, then claim the device, so a broken file never opens it
fn open_session(path: &Path) -> Result<(OutputStream, Sink), PlaybackError> {
    let file = File::open(path).map_err(|e| PlaybackError::OpenFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::DecodeFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let (stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;
    sink.append(source);

    Ok((stream, sink))
}

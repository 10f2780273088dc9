//! Audit use case: startup validation and the per-file audit loop

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::audit::{
    AuditReport, AuditSession, AuditState, Command, FileOutcome, InvalidStateTransition,
    UnansweredPolicy, WorkQueue,
};
use crate::domain::error::RootsError;
use crate::domain::paths::{absolutize, validate_distinct_roots};
use crate::domain::recognition::{Recognition, Vocabulary};
use crate::domain::timing::Duration;

use super::dispatch::{CommandDispatcher, Dispatched};
use super::playback::PlaybackController;
use super::ports::{
    AudioFileScanner, AudioPlayer, RecognitionError, ScanError, SpeechRecognizer,
};

/// Pending recognitions buffered per file
const RECOGNITION_BUFFER: usize = 8;

/// Errors that stop the session before any file is touched
#[derive(Debug, Clone, Error)]
pub enum SetupError {
    #[error(transparent)]
    Roots(#[from] RootsError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Errors that abort a running session
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Speech recognition failed: {0}")]
    Recognition(#[from] RecognitionError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Validated input/output directory pair
#[derive(Debug, Clone)]
pub struct AuditRoots {
    input: PathBuf,
    output: PathBuf,
}

impl AuditRoots {
    /// Check the output directory: it must exist and must not be, or lie
    /// inside, the input directory.
    pub fn validate(input: &Path, output: &Path) -> Result<Self, RootsError> {
        if !output.is_dir() {
            return Err(RootsError::OutputMissing(output.to_path_buf()));
        }
        validate_distinct_roots(output, input)?;

        Ok(Self {
            input: absolutize(input),
            output: absolutize(output),
        })
    }

    /// Validate the roots then scan the input, in that order.
    pub fn prepare<S: AudioFileScanner>(
        input: &Path,
        output: &Path,
        scanner: &S,
    ) -> Result<(Self, WorkQueue), SetupError> {
        let roots = Self::validate(input, output)?;
        let queue = scanner.scan(&roots.input)?;
        Ok((roots, queue))
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Dispatcher moving files from this input into this output
    pub fn dispatcher(&self) -> CommandDispatcher {
        CommandDispatcher::new(&self.input, &self.output)
    }
}

/// Tunables of the audit loop
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// How often playback state is checked
    pub poll_interval: Duration,
    /// What to do when a file ends without a command
    pub unanswered: UnansweredPolicy,
    /// Words the recognizer listens for
    pub vocabulary: Vocabulary,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::default_poll_interval(),
            unanswered: UnansweredPolicy::default(),
            vocabulary: Vocabulary::default(),
        }
    }
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct AuditCallbacks {
    /// Called when a file starts playing, with the number still queued
    pub on_file_start: Option<Box<dyn Fn(&Path, usize) + Send + Sync>>,
    /// Called when a command is recognized for the playing file
    pub on_command: Option<Box<dyn Fn(&Path, Command) + Send + Sync>>,
    /// Called for speech that matched no command
    pub on_unrecognized: Option<Box<dyn Fn(Option<&str>) + Send + Sync>>,
    /// Called once per dequeued file with its outcome
    pub on_outcome: Option<Box<dyn Fn(&Path, &FileOutcome) + Send + Sync>>,
}

/// How listening to one playback ended
enum Heard {
    Command(Command),
    Nothing,
    Interrupted,
}

/// Audit loop use case.
///
/// Owns the playback controller, so only this loop ever stops a session;
/// the recognizer just sends what it hears through a per-file channel.
pub struct AuditLoop<P, R>
where
    P: AudioPlayer,
    R: SpeechRecognizer,
{
    playback: PlaybackController<P>,
    recognizer: R,
    dispatcher: CommandDispatcher,
    config: AuditConfig,
    session: AuditSession,
    shutdown: Arc<AtomicBool>,
}

impl<P, R> AuditLoop<P, R>
where
    P: AudioPlayer,
    R: SpeechRecognizer,
{
    /// Create a new audit loop
    pub fn new(player: P, recognizer: R, dispatcher: CommandDispatcher, config: AuditConfig) -> Self {
        Self {
            playback: PlaybackController::new(player),
            recognizer,
            dispatcher,
            config,
            session: AuditSession::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use an externally owned shutdown flag (e.g. set on Ctrl+C)
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    /// Get the shutdown flag for external signal handling
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Current state of the session
    pub fn state(&self) -> AuditState {
        self.session.state()
    }

    /// Drain `queue`, one file at a time, until it is empty or the
    /// session is interrupted.
    pub async fn run(
        &mut self,
        mut queue: WorkQueue,
        callbacks: &AuditCallbacks,
    ) -> Result<AuditReport, AuditError> {
        let mut report = AuditReport::default();

        loop {
            if self.shutdown_requested() {
                self.session.interrupt()?;
                report.interrupted = true;
                break;
            }

            let Some(file) = queue.dequeue() else {
                self.session.finish()?;
                break;
            };

            self.session.begin_file()?;
            tracing::debug!(path = %file.display(), remaining = queue.remaining(), "dequeued");
            if let Some(ref cb) = callbacks.on_file_start {
                cb(&file, queue.remaining());
            }

            let outcome = self.audit_file(&file, callbacks, &mut report).await?;

            if let Some(ref cb) = callbacks.on_outcome {
                cb(&file, &outcome);
            }
            report.record(&outcome);

            if outcome == FileOutcome::Interrupted {
                self.session.interrupt()?;
                break;
            }
            self.session.finish_file()?;
        }

        Ok(report)
    }

    async fn audit_file(
        &mut self,
        file: &Path,
        callbacks: &AuditCallbacks,
        report: &mut AuditReport,
    ) -> Result<FileOutcome, AuditError> {
        loop {
            if let Err(e) = self.playback.start(file).await {
                tracing::warn!(path = %file.display(), error = %e, "skipping unplayable file");
                return Ok(FileOutcome::Unplayable {
                    reason: e.to_string(),
                });
            }

            let (sink, mut recognitions) = mpsc::channel(RECOGNITION_BUFFER);
            if let Err(e) = self.recognizer.enable(&self.config.vocabulary, sink).await {
                self.playback.stop();
                return Err(e.into());
            }

            let heard = self.listen(&mut recognitions, callbacks, report).await;

            // Release the file before anything touches it
            let stopped = self.playback.stop();
            if let Err(e) = self.recognizer.disable().await {
                tracing::warn!(error = %e, "failed to disable recognizer");
            }
            // Anything still in flight belongs to this file and is discarded
            drop(recognitions);

            match heard {
                Heard::Command(command) => {
                    let target = stopped.unwrap_or_else(|| file.to_path_buf());
                    if let Some(ref cb) = callbacks.on_command {
                        cb(&target, command);
                    }
                    return Ok(self.apply(command, &target).await);
                }
                Heard::Interrupted => return Ok(FileOutcome::Interrupted),
                Heard::Nothing => match self.config.unanswered {
                    UnansweredPolicy::Skip => return Ok(FileOutcome::Unanswered),
                    UnansweredPolicy::Replay => {
                        if self.shutdown_requested() {
                            return Ok(FileOutcome::Interrupted);
                        }
                        tracing::debug!(path = %file.display(), "no command, replaying");
                    }
                },
            }
        }
    }

    /// Wait for a command while the file plays.
    ///
    /// Progress is bound to playback: the poll tick ends the wait when
    /// playback stops, recognitions can only end it early.
    async fn listen(
        &self,
        recognitions: &mut mpsc::Receiver<Recognition>,
        callbacks: &AuditCallbacks,
        report: &mut AuditReport,
    ) -> Heard {
        let mut ticker = interval(self.config.poll_interval.as_std());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut listening = true;

        loop {
            tokio::select! {
                biased;

                recognition = recognitions.recv(), if listening => match recognition {
                    Some(recognition) => {
                        let command = self.config.vocabulary.interpret(&recognition);
                        if command.is_decision() {
                            tracing::debug!(%command, "command recognized");
                            return Heard::Command(command);
                        }
                        report.unrecognized += 1;
                        tracing::info!(phrase = ?recognition.phrase(), "unrecognized command");
                        if let Some(ref cb) = callbacks.on_unrecognized {
                            cb(recognition.phrase());
                        }
                    }
                    None => {
                        tracing::debug!("recognizer closed its channel");
                        listening = false;
                    }
                },

                _ = ticker.tick() => {
                    if self.shutdown_requested() {
                        return Heard::Interrupted;
                    }
                    if !self.playback.is_playing() {
                        return Heard::Nothing;
                    }
                }
            }
        }
    }

    async fn apply(&self, command: Command, file: &Path) -> FileOutcome {
        match self.dispatcher.dispatch(command, file).await {
            Ok(Dispatched::Accepted(destination)) => FileOutcome::Accepted { destination },
            Ok(Dispatched::Deleted) => FileOutcome::Deleted,
            Ok(Dispatched::Skipped) | Ok(Dispatched::Ignored) => FileOutcome::Skipped,
            Err(e) => {
                tracing::error!(path = %file.display(), %command, error = %e, "command failed");
                FileOutcome::Failed {
                    command,
                    reason: e.to_string(),
                }
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

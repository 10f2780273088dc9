//! Whisper recognizer: microphone audio transcribed by a local model
//!
//! One worker thread owns the microphone for the whole session. Enabling
//! and disabling only swaps the sink it delivers to; a generation counter
//! discards speech that began before the current listening window.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::capture::MicrophoneCapture;
use super::resample::{resample_to_target, TARGET_SAMPLE_RATE};
use super::segmenter::{rms, SegmenterConfig, UtteranceSegmenter};
use crate::application::ports::{RecognitionError, RecognitionSink, SpeechRecognizer};
use crate::domain::recognition::{Recognition, Vocabulary};

/// Captured chunks buffered between the device and the worker
const CHUNK_BUFFER: usize = 64;

/// Below this RMS an utterance is treated as noise, not transcribed
const SILENCE_RMS: f32 = 0.001;

/// Whisper is rarely reliable on less than this much audio
const MIN_UTTERANCE_SAMPLES: usize = TARGET_SAMPLE_RATE as usize / 4;

struct Listener {
    sink: Option<RecognitionSink>,
    generation: u64,
    prompt: String,
}

struct Shared {
    listener: Mutex<Listener>,
    running: AtomicBool,
}

impl Shared {
    fn listener(&self) -> MutexGuard<'_, Listener> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Speech recognizer backed by whisper-rs
pub struct WhisperRecognizer {
    context: Arc<WhisperContext>,
    language: String,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WhisperRecognizer {
    /// Load a GGML model from disk
    pub fn load(model_path: &Path, language: &str) -> Result<Self, RecognitionError> {
        let path = model_path.to_str().ok_or_else(|| {
            RecognitionError::ModelLoadFailed("Model path is not valid UTF-8".to_string())
        })?;

        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("{}: {}", model_path.display(), e)))?;

        tracing::info!(model = %model_path.display(), language, "whisper model loaded");
        Ok(Self {
            context: Arc::new(context),
            language: language.to_string(),
            shared: Arc::new(Shared {
                listener: Mutex::new(Listener {
                    sink: None,
                    generation: 0,
                    prompt: String::new(),
                }),
                running: AtomicBool::new(false),
            }),
            worker: Mutex::new(None),
        })
    }

    async fn ensure_worker(&self) -> Result<(), RecognitionError> {
        if self.shared.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        let context = Arc::clone(&self.context);
        let language = self.language.clone();
        shared.running.store(true, Ordering::SeqCst);

        let handle = thread::Builder::new()
            .name("whisper".to_string())
            .spawn(move || run_worker(shared, context, language, ready_tx))
            .map_err(|e| RecognitionError::StartFailed(format!("Failed to spawn worker: {}", e)))?;

        let started = ready_rx.await.unwrap_or_else(|_| {
            Err(RecognitionError::StartFailed(
                "Recognition worker exited before starting".to_string(),
            ))
        });

        if let Err(e) = started {
            self.shared.running.store(false, Ordering::SeqCst);
            let _ = handle.join();
            return Err(e);
        }

        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn enable(
        &self,
        vocabulary: &Vocabulary,
        sink: RecognitionSink,
    ) -> Result<(), RecognitionError> {
        {
            let mut listener = self.shared.listener();
            listener.generation += 1;
            listener.sink = Some(sink);
            listener.prompt = vocabulary.tokens().collect::<Vec<_>>().join(", ");
        }
        self.ensure_worker().await
    }

    async fn disable(&self) -> Result<(), RecognitionError> {
        let mut listener = self.shared.listener();
        listener.generation += 1;
        listener.sink = None;
        Ok(())
    }
}

impl Drop for WhisperRecognizer {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(
    shared: Arc<Shared>,
    context: Arc<WhisperContext>,
    language: String,
    ready: oneshot::Sender<Result<(), RecognitionError>>,
) {
    let (chunk_tx, chunk_rx) = mpsc::sync_channel(CHUNK_BUFFER);
    let capture = match MicrophoneCapture::start(chunk_tx) {
        Ok(capture) => capture,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let sample_rate = capture.sample_rate();
    let mut segmenter = UtteranceSegmenter::new(sample_rate, SegmenterConfig::default());
    let mut window = 0u64;

    while shared.running.load(Ordering::SeqCst) {
        let chunk = match chunk_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(chunk) => chunk,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let (generation, listening, prompt) = {
            let listener = shared.listener();
            (listener.generation, listener.sink.is_some(), listener.prompt.clone())
        };
        if generation != window {
            segmenter.reset();
            window = generation;
        }
        if !listening {
            continue;
        }

        for utterance in segmenter.push(&chunk) {
            let recognition = match recognize(&context, &utterance, sample_rate, &language, &prompt) {
                Ok(recognition) => recognition,
                Err(e) => {
                    tracing::warn!(error = %e, "transcription failed");
                    continue;
                }
            };

            let listener = shared.listener();
            if listener.generation != window {
                tracing::debug!("utterance outlived its listening window, dropped");
                continue;
            }
            if let Some(sink) = listener.sink.as_ref() {
                let _ = sink.try_send(recognition);
            }
        }
    }

    drop(capture);
    shared.running.store(false, Ordering::SeqCst);
    tracing::debug!("whisper worker stopped");
}

fn recognize(
    context: &WhisperContext,
    utterance: &[f32],
    sample_rate: u32,
    language: &str,
    prompt: &str,
) -> Result<Recognition, RecognitionError> {
    let audio = resample_to_target(utterance, sample_rate)?;
    if audio.len() < MIN_UTTERANCE_SAMPLES || rms(&audio) < SILENCE_RMS {
        return Ok(Recognition::NoMatch);
    }

    let text = transcribe(context, &audio, language, prompt)?;
    tracing::debug!(text = %text, "transcribed utterance");

    if text.is_empty() {
        Ok(Recognition::NoMatch)
    } else {
        Ok(Recognition::Phrase(text))
    }
}

/// Transcribe 16 kHz mono audio, biased toward the vocabulary
fn transcribe(
    context: &WhisperContext,
    audio: &[f32],
    language: &str,
    prompt: &str,
) -> Result<String, RecognitionError> {
    let mut state = context
        .create_state()
        .map_err(|e| RecognitionError::ProcessingFailed(format!("Failed to create state: {}", e)))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some(language));
    params.set_initial_prompt(prompt);
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_suppress_nst(true);
    params.set_no_timestamps(true);
    params.set_single_segment(true);

    state
        .full(params, audio)
        .map_err(|e| RecognitionError::ProcessingFailed(format!("Transcription failed: {}", e)))?;

    let mut text = String::new();
    for i in 0..state.full_n_segments() {
        if let Some(segment) = state.get_segment(i) {
            if let Ok(s) = segment.to_str() {
                text.push_str(s);
            }
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = WhisperRecognizer::load(&dir.path().join("ggml-missing.bin"), "en");
        assert!(matches!(result, Err(RecognitionError::ModelLoadFailed(_))));
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware and WHISPER_MODEL"]
    async fn listens_on_microphone() {
        let model = std::env::var("WHISPER_MODEL").unwrap();
        let recognizer = WhisperRecognizer::load(Path::new(&model), "en").unwrap();
        let (tx, _rx) = tokio::sync::mpsc::channel(8);

        recognizer.enable(&Vocabulary::default(), tx).await.unwrap();
        recognizer.disable().await.unwrap();
    }
}

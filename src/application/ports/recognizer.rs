//! Speech recognition port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recognition::{Recognition, Vocabulary};

/// Recognition errors
#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    #[error("Failed to start listening: {0}")]
    StartFailed(String),

    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Failed to load speech model: {0}")]
    ModelLoadFailed(String),

    #[error("Recognizer not available: {0}")]
    Unavailable(String),

    #[error("Failed to process captured audio: {0}")]
    ProcessingFailed(String),
}

/// Channel end a recognizer delivers its results into
pub type RecognitionSink = mpsc::Sender<Recognition>;

/// Port for speech command recognition
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start listening for the vocabulary words.
    ///
    /// Every recognized phrase, or [`Recognition::NoMatch`] for speech with
    /// no confident match, is sent into `sink` until [`disable`] is called.
    ///
    /// [`disable`]: SpeechRecognizer::disable
    async fn enable(
        &self,
        vocabulary: &Vocabulary,
        sink: RecognitionSink,
    ) -> Result<(), RecognitionError>;

    /// Stop listening. Once this returns, nothing more is sent to the sink
    /// given to the last [`enable`](SpeechRecognizer::enable).
    async fn disable(&self) -> Result<(), RecognitionError>;
}

#[async_trait]
impl<T: SpeechRecognizer + ?Sized> SpeechRecognizer for Box<T> {
    async fn enable(
        &self,
        vocabulary: &Vocabulary,
        sink: RecognitionSink,
    ) -> Result<(), RecognitionError> {
        (**self).enable(vocabulary, sink).await
    }

    async fn disable(&self) -> Result<(), RecognitionError> {
        (**self).disable().await
    }
}

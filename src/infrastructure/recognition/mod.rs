//! Speech recognition adapters
//!
//! The console recognizer reads typed commands and needs no hardware. The
//! Whisper recognizer (feature `whisper`) listens on the microphone.

#[cfg(feature = "whisper")]
pub mod capture;
mod console;
#[cfg(feature = "whisper")]
pub mod resample;
#[cfg(feature = "whisper")]
pub mod segmenter;
#[cfg(feature = "whisper")]
mod whisper;

use std::path::PathBuf;

pub use console::ConsoleRecognizer;
#[cfg(feature = "whisper")]
pub use whisper::WhisperRecognizer;

use crate::application::ports::{RecognitionError, SpeechRecognizer};
use crate::domain::config::DEFAULT_WHISPER_LANGUAGE;
use crate::domain::recognition::RecognizerKind;

/// Settings for building a recognizer
#[derive(Debug, Clone)]
pub struct RecognizerOptions {
    pub kind: RecognizerKind,
    /// GGML model file, required by Whisper
    pub model: Option<PathBuf>,
    pub language: String,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self {
            kind: RecognizerKind::default(),
            model: None,
            language: DEFAULT_WHISPER_LANGUAGE.to_string(),
        }
    }
}

/// Create the recognizer selected by `options`
pub fn create_recognizer(
    options: &RecognizerOptions,
) -> Result<Box<dyn SpeechRecognizer>, RecognitionError> {
    match options.kind {
        RecognizerKind::Console => Ok(Box::new(ConsoleRecognizer::stdin())),
        RecognizerKind::Whisper => create_whisper(options),
    }
}

#[cfg(feature = "whisper")]
fn create_whisper(options: &RecognizerOptions) -> Result<Box<dyn SpeechRecognizer>, RecognitionError> {
    let model = options.model.as_deref().ok_or_else(|| {
        RecognitionError::ModelLoadFailed(
            "No model configured (use --model or `config set whisper.model`)".to_string(),
        )
    })?;
    Ok(Box::new(WhisperRecognizer::load(model, &options.language)?))
}

#[cfg(not(feature = "whisper"))]
fn create_whisper(_options: &RecognizerOptions) -> Result<Box<dyn SpeechRecognizer>, RecognitionError> {
    Err(RecognitionError::Unavailable(
        "this build does not include the `whisper` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_is_always_available() {
        assert!(create_recognizer(&RecognizerOptions::default()).is_ok());
    }

    #[test]
    #[cfg(not(feature = "whisper"))]
    fn whisper_requires_feature() {
        let options = RecognizerOptions {
            kind: RecognizerKind::Whisper,
            model: Some(PathBuf::from("/models/ggml-base.en.bin")),
            ..Default::default()
        };
        let err = create_recognizer(&options).err().unwrap();
        assert!(matches!(err, RecognitionError::Unavailable(_)));
    }

    #[test]
    #[cfg(feature = "whisper")]
    fn whisper_requires_model() {
        let options = RecognizerOptions {
            kind: RecognizerKind::Whisper,
            ..Default::default()
        };
        let err = create_recognizer(&options).err().unwrap();
        assert!(matches!(err, RecognitionError::ModelLoadFailed(_)));
    }
}

//! Recognizer backend selection

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidRecognizerError;

/// Which speech recognition backend listens for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecognizerKind {
    /// Commands typed on standard input
    #[default]
    Console,
    /// Microphone audio transcribed by a local Whisper model
    Whisper,
}

impl RecognizerKind {
    /// All recognizer kinds
    pub const ALL: [RecognizerKind; 2] = [Self::Console, Self::Whisper];

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Whisper => "whisper",
        }
    }
}

impl FromStr for RecognizerKind {
    type Err = InvalidRecognizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "whisper" => Ok(Self::Whisper),
            _ => Err(InvalidRecognizerError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecognizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Speech recognition domain types

mod kind;
mod vocabulary;

pub use kind::RecognizerKind;
pub use vocabulary::{Vocabulary, ACCEPT_WORD, DELETE_WORD, SKIP_WORD};

/// One result delivered by a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    /// Text the recognizer heard
    Phrase(String),
    /// Speech was detected but nothing matched with confidence
    NoMatch,
}

impl Recognition {
    /// Heard text, if any
    pub fn phrase(&self) -> Option<&str> {
        match self {
            Self::Phrase(text) => Some(text),
            Self::NoMatch => None,
        }
    }
}

//! Closed command vocabulary and phrase matching

use crate::domain::audit::Command;

use super::Recognition;

/// Spoken word for accepting a file
pub const ACCEPT_WORD: &str = "accept";
/// Spoken word for deleting a file
pub const DELETE_WORD: &str = "delete";
/// Spoken word for skipping a file
pub const SKIP_WORD: &str = "skip";

/// The fixed set of phrases the recognizer listens for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<(String, Command)>,
}

impl Vocabulary {
    /// Words the recognizer should listen for
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(word, _)| word.as_str())
    }

    /// Human-readable list, e.g. for prompts
    pub fn describe(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" / ")
    }

    /// Map a recognizer result to a command
    pub fn interpret(&self, recognition: &Recognition) -> Command {
        match recognition {
            Recognition::Phrase(text) => self.match_phrase(text),
            Recognition::NoMatch => Command::Unrecognized,
        }
    }

    /// Match free text against the vocabulary.
    ///
    /// Surrounding whitespace and punctuation plus case are ignored; the
    /// remaining phrase must be exactly one vocabulary word.
    pub fn match_phrase(&self, phrase: &str) -> Command {
        let word = phrase
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        self.entries
            .iter()
            .find(|(token, _)| *token == word)
            .map(|(_, command)| *command)
            .unwrap_or(Command::Unrecognized)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            entries: vec![
                (ACCEPT_WORD.to_string(), Command::Accept),
                (DELETE_WORD.to_string(), Command::Delete),
                (SKIP_WORD.to_string(), Command::Skip),
            ],
        }
    }
}

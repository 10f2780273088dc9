//! Operator commands

use std::fmt;

/// Decision taken for the file currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move the file into the output tree
    Accept,
    /// Remove the file from disk
    Delete,
    /// Leave the file where it is
    Skip,
    /// Heard something outside the vocabulary
    Unrecognized,
}

impl Command {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Delete => "delete",
            Self::Skip => "skip",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Whether this command settles the current file
    pub const fn is_decision(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Command::Accept.to_string(), "accept");
        assert_eq!(Command::Delete.to_string(), "delete");
        assert_eq!(Command::Skip.to_string(), "skip");
        assert_eq!(Command::Unrecognized.to_string(), "unrecognized");
    }

    #[test]
    fn only_unrecognized_is_not_a_decision() {
        assert!(Command::Accept.is_decision());
        assert!(Command::Delete.is_decision());
        assert!(Command::Skip.is_decision());
        assert!(!Command::Unrecognized.is_decision());
    }
}

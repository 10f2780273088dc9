//! Policy for files that finish playing without a command

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidPolicyError;

/// What happens when playback ends before any command is recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnansweredPolicy {
    /// Leave the file in place and move on (implicit skip)
    #[default]
    Skip,
    /// Play the same file again until a command is heard
    Replay,
}

impl UnansweredPolicy {
    /// All policies
    pub const ALL: [UnansweredPolicy; 2] = [Self::Skip, Self::Replay];

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Replay => "replay",
        }
    }
}

impl FromStr for UnansweredPolicy {
    type Err = InvalidPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "replay" => Ok(Self::Replay),
            _ => Err(InvalidPolicyError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for UnansweredPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_skip() {
        assert_eq!(UnansweredPolicy::default(), UnansweredPolicy::Skip);
    }

    #[test]
    fn parse_valid() {
        assert_eq!("skip".parse::<UnansweredPolicy>().unwrap(), UnansweredPolicy::Skip);
        assert_eq!(" Replay ".parse::<UnansweredPolicy>().unwrap(), UnansweredPolicy::Replay);
    }

    #[test]
    fn parse_invalid() {
        let err = "forever".parse::<UnansweredPolicy>().unwrap_err();
        assert!(err.to_string().contains("forever"));
    }

    #[test]
    fn display_parses_back() {
        for policy in UnansweredPolicy::ALL {
            assert_eq!(policy.to_string().parse::<UnansweredPolicy>().unwrap(), policy);
        }
    }
}

//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default playback poll interval (500 milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default interval between playback state polls
    pub const fn default_poll_interval() -> Self {
        Self::from_millis(DEFAULT_POLL_INTERVAL_MS)
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported units: `ms`, `s` and `m`, which can be combined
    /// ("500ms", "2s", "1m30s", "1s250ms").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError { input: s.to_string() };

        let mut total_ms: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;
        let mut chars = input.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }
            if current_num.is_empty() {
                return Err(err());
            }

            let value: u64 = current_num.parse().map_err(|_| err())?;
            let multiplier = match ch {
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                'm' => 60_000,
                's' => 1000,
                _ => return Err(err()),
            };

            total_ms = value
                .checked_mul(multiplier)
                .and_then(|v| total_ms.checked_add(v))
                .ok_or_else(err)?;
            current_num.clear();
            found_any = true;
        }

        // Leftover digits without a unit
        if !current_num.is_empty() || !found_any || total_ms == 0 {
            return Err(err());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.milliseconds % 1000;
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if total_secs == 0 {
            return write!(f, "{}ms", millis);
        }

        let mut out = String::new();
        if minutes > 0 {
            out.push_str(&format!("{}m", minutes));
        }
        if seconds > 0 {
            out.push_str(&format!("{}s", seconds));
        }
        if millis > 0 {
            out.push_str(&format!("{}ms", millis));
        }
        write!(f, "{}", out)
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_poll_interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_millis_only() {
        let d: Duration = "500ms".parse().unwrap();
        assert_eq!(d.as_millis(), 500);
    }

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30000);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_seconds_and_millis() {
        let d: Duration = "1s250ms".parse().unwrap();
        assert_eq!(d.as_millis(), 1250);
    }

    #[test]
    fn parse_case_insensitive() {
        let d: Duration = "1M30S".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
        let d: Duration = "250MS".parse().unwrap();
        assert_eq!(d.as_millis(), 250);
    }

    #[test]
    fn parse_with_whitespace() {
        let d: Duration = "  30s  ".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
    }

    #[test]
    fn parse_invalid_empty() {
        assert!("".parse::<Duration>().is_err());
    }

    #[test]
    fn parse_invalid_zero() {
        assert!("0s".parse::<Duration>().is_err());
        assert!("0ms".parse::<Duration>().is_err());
    }

    #[test]
    fn parse_invalid_format() {
        assert!("30".parse::<Duration>().is_err());
        assert!("abc".parse::<Duration>().is_err());
        assert!("30x".parse::<Duration>().is_err());
        assert!("ms".parse::<Duration>().is_err());
    }

    #[test]
    fn display_millis_only() {
        assert_eq!(Duration::from_millis(500).to_string(), "500ms");
    }

    #[test]
    fn display_mixed() {
        assert_eq!(Duration::from_secs(150).to_string(), "2m30s");
        assert_eq!(Duration::from_millis(1250).to_string(), "1s250ms");
        assert_eq!(Duration::from_secs(120).to_string(), "2m");
    }

    #[test]
    fn display_parses_back() {
        let d = Duration::from_millis(61_500);
        assert_eq!(d.to_string().parse::<Duration>().unwrap(), d);
    }

    #[test]
    fn as_std_duration() {
        let d = Duration::from_millis(500);
        assert_eq!(d.as_std(), StdDuration::from_millis(500));
    }

    #[test]
    fn default_is_poll_interval() {
        assert_eq!(Duration::default().as_millis(), 500);
    }
}

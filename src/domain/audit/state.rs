//! Audit session state machine

use std::fmt;
use thiserror::Error;

/// Audit loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuditState {
    /// Taking the next file off the queue
    #[default]
    Draining,
    /// A file is playing and the recognizer is listening
    PlayingAndListening,
    /// Queue drained, session over
    Finished,
    /// Stopped early by the operator
    Interrupted,
}

impl AuditState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draining => "draining",
            Self::PlayingAndListening => "playing",
            Self::Finished => "finished",
            Self::Interrupted => "interrupted",
        }
    }

    /// Whether the session can make no further progress
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Interrupted)
    }
}

impl fmt::Display for AuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Playback states of the current file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: AuditState,
    pub action: String,
}

/// Audit session entity.
/// Tracks where the audit loop is in its per-file cycle.
///
/// State machine:
///   DRAINING -> PLAYING (begin_file)
///   PLAYING -> DRAINING (finish_file)
///   DRAINING -> FINISHED (finish)
///   DRAINING | PLAYING -> INTERRUPTED (interrupt)
#[derive(Debug, Default)]
pub struct AuditSession {
    state: AuditState,
    files_started: usize,
}

impl AuditSession {
    /// Create a new session, ready to drain the queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> AuditState {
        self.state
    }

    /// Number of files taken off the queue so far
    pub fn files_started(&self) -> usize {
        self.files_started
    }

    /// Transition from DRAINING to PLAYING
    pub fn begin_file(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(AuditState::Draining, AuditState::PlayingAndListening, "begin a file")?;
        self.files_started += 1;
        Ok(())
    }

    /// Transition from PLAYING back to DRAINING
    pub fn finish_file(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(AuditState::PlayingAndListening, AuditState::Draining, "finish a file")
    }

    /// Transition from DRAINING to FINISHED once the queue is empty
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(AuditState::Draining, AuditState::Finished, "finish the session")
    }

    /// Stop the session early from any non-terminal state
    pub fn interrupt(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state.is_terminal() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "interrupt the session".to_string(),
            });
        }
        self.state = AuditState::Interrupted;
        Ok(())
    }

    fn transition(
        &mut self,
        from: AuditState,
        to: AuditState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != from {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_draining() {
        let session = AuditSession::new();
        assert_eq!(session.state(), AuditState::Draining);
        assert_eq!(session.files_started(), 0);
    }

    #[test]
    fn file_cycle() {
        let mut session = AuditSession::new();
        session.begin_file().unwrap();
        assert_eq!(session.state(), AuditState::PlayingAndListening);
        session.finish_file().unwrap();
        assert_eq!(session.state(), AuditState::Draining);
        assert_eq!(session.files_started(), 1);
    }

    #[test]
    fn begin_file_while_playing_fails() {
        let mut session = AuditSession::new();
        session.begin_file().unwrap();

        let err = session.begin_file().unwrap_err();
        assert_eq!(err.current_state, AuditState::PlayingAndListening);
        assert!(err.action.contains("begin a file"));
    }

    #[test]
    fn finish_while_playing_fails() {
        let mut session = AuditSession::new();
        session.begin_file().unwrap();
        assert!(session.finish().is_err());
    }

    #[test]
    fn finish_from_draining() {
        let mut session = AuditSession::new();
        session.finish().unwrap();
        assert_eq!(session.state(), AuditState::Finished);
        assert!(session.state().is_terminal());
    }

    #[test]
    fn no_file_after_finish() {
        let mut session = AuditSession::new();
        session.finish().unwrap();
        assert!(session.begin_file().is_err());
    }

    #[test]
    fn interrupt_while_playing() {
        let mut session = AuditSession::new();
        session.begin_file().unwrap();
        session.interrupt().unwrap();
        assert_eq!(session.state(), AuditState::Interrupted);
    }

    #[test]
    fn interrupt_after_finish_fails() {
        let mut session = AuditSession::new();
        session.finish().unwrap();
        assert!(session.interrupt().is_err());
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: AuditState::Finished,
            action: "begin a file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("begin a file"));
        assert!(msg.contains("finished"));
    }
}

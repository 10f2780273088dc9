//! Per-file outcomes and the session report

use std::path::PathBuf;

use super::command::Command;

/// What happened to one dequeued file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Moved into the output tree
    Accepted { destination: PathBuf },
    /// Removed from disk
    Deleted,
    /// Operator said skip
    Skipped,
    /// Playback ended before any command was recognized
    Unanswered,
    /// The file could not be opened or decoded
    Unplayable { reason: String },
    /// The command was heard but its filesystem action failed
    Failed { command: Command, reason: String },
    /// The session was stopped while this file was playing
    Interrupted,
}

impl FileOutcome {
    /// Short label for progress output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => "accepted",
            Self::Deleted => "deleted",
            Self::Skipped => "skipped",
            Self::Unanswered => "no command",
            Self::Unplayable { .. } => "unplayable",
            Self::Failed { .. } => "failed",
            Self::Interrupted => "interrupted",
        }
    }

    /// Whether the outcome is an error worth surfacing
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Unplayable { .. } | Self::Failed { .. })
    }
}

/// Tally of a whole audit session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub accepted: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub unanswered: usize,
    pub unplayable: usize,
    pub failed: usize,
    /// Utterances heard that matched no command
    pub unrecognized: usize,
    /// True when the session stopped before the queue drained
    pub interrupted: bool,
}

impl AuditReport {
    /// Count one file outcome
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Accepted { .. } => self.accepted += 1,
            FileOutcome::Deleted => self.deleted += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Unanswered => self.unanswered += 1,
            FileOutcome::Unplayable { .. } => self.unplayable += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
            FileOutcome::Interrupted => self.interrupted = true,
        }
    }

    /// Files that reached a final outcome
    pub fn processed(&self) -> usize {
        self.accepted + self.deleted + self.skipped + self.unanswered + self.unplayable + self.failed
    }

    /// Whether any file ended in error
    pub fn has_errors(&self) -> bool {
        self.unplayable + self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_each_outcome() {
        let mut report = AuditReport::default();
        report.record(&FileOutcome::Accepted {
            destination: PathBuf::from("/out/a.mp3"),
        });
        report.record(&FileOutcome::Deleted);
        report.record(&FileOutcome::Skipped);
        report.record(&FileOutcome::Unanswered);
        report.record(&FileOutcome::Unanswered);

        assert_eq!(report.accepted, 1);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.unanswered, 2);
        assert_eq!(report.processed(), 5);
        assert!(!report.has_errors());
        assert!(!report.interrupted);
    }

    #[test]
    fn errors_are_flagged() {
        let mut report = AuditReport::default();
        report.record(&FileOutcome::Failed {
            command: Command::Delete,
            reason: "permission denied".to_string(),
        });
        assert!(report.has_errors());
        assert_eq!(report.processed(), 1);
    }

    #[test]
    fn interrupted_file_is_not_processed() {
        let mut report = AuditReport::default();
        report.record(&FileOutcome::Interrupted);
        assert!(report.interrupted);
        assert_eq!(report.processed(), 0);
    }

    #[test]
    fn labels() {
        assert_eq!(FileOutcome::Unanswered.label(), "no command");
        assert!(FileOutcome::Unplayable {
            reason: "corrupt".to_string()
        }
        .is_error());
        assert!(!FileOutcome::Skipped.is_error());
    }
}

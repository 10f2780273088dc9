//! CLI presenter for output formatting

use std::path::Path;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::audit::{AuditReport, Command, FileOutcome};

/// Presenter for CLI output formatting.
///
/// Everything goes to stderr except plain values printed by `config`.
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message, replacing any previous one
    pub fn start_spinner(&mut self, message: &str) {
        self.stop_spinner();

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(format!("{} {}", "✓".green(), message)),
            None => self.success(message),
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(format!("{} {}", "✗".red(), message)),
            None => self.error(message),
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Show the file now playing
    pub fn now_playing(&mut self, file: &Path, remaining: usize) {
        self.start_spinner(&format!(
            "{} {}",
            format!("[{} left]", remaining).dimmed(),
            file.display()
        ));
    }

    /// Report a recognized command before it is carried out
    pub fn heard(&self, command: Command) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(format!("{} {}...", "heard".cyan(), command.as_str().bold()));
        }
    }

    /// Report speech that matched no command
    pub fn unrecognized(&self, phrase: Option<&str>, expected: &str) {
        let heard = match phrase {
            Some(phrase) => format!("Unrecognized command \"{}\"", phrase),
            None => "Unrecognized command".to_string(),
        };
        self.warn(&format!("{} (say {})", heard, expected));
    }

    /// Finish the current file's line with its outcome
    pub fn outcome(&mut self, file: &Path, outcome: &FileOutcome) {
        let line = format_outcome(file, outcome);
        if outcome.is_error() {
            self.spinner_fail(&line);
        } else {
            self.spinner_success(&line);
        }
    }

    /// Print the end-of-session tally
    pub fn summary(&self, report: &AuditReport) {
        self.info(&format_summary(report));
    }

    /// Print through the spinner so it is not overdrawn
    fn print(&self, line: String) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line description of what happened to a file
pub fn format_outcome(file: &Path, outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Accepted { destination } => {
            format!("Accepted {} -> {}", file.display(), destination.display())
        }
        FileOutcome::Deleted => format!("Deleted {}", file.display()),
        FileOutcome::Skipped => format!("Skipped {}", file.display()),
        FileOutcome::Unanswered => format!("No command for {}, left in place", file.display()),
        FileOutcome::Unplayable { reason } => format!("Cannot play {}: {}", file.display(), reason),
        FileOutcome::Failed { command, reason } => {
            format!("Could not {} {}: {}", command, file.display(), reason)
        }
        FileOutcome::Interrupted => format!("Interrupted {}, left in place", file.display()),
    }
}

/// Session tally, e.g. "3 processed: 1 accepted, 1 deleted, 1 skipped"
pub fn format_summary(report: &AuditReport) -> String {
    let counts = [
        (report.accepted, "accepted"),
        (report.deleted, "deleted"),
        (report.skipped, "skipped"),
        (report.unanswered, "unanswered"),
        (report.unplayable, "unplayable"),
        (report.failed, "failed"),
    ];

    let parts: Vec<String> = counts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();

    if parts.is_empty() {
        format!("{} processed", report.processed())
    } else {
        format!("{} processed: {}", report.processed(), parts.join(", "))
    }
}

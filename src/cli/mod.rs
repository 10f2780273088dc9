//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging setup,
//! signal handling and the audit runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_audit, EXIT_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{AuditOptions, Cli, Commands, ConfigAction};
pub use presenter::Presenter;

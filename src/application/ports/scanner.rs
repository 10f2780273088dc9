//! Audio file discovery port

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::audit::WorkQueue;

/// Scan errors
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    #[error("Input directory {0} does not exist")]
    NotFound(PathBuf),

    #[error("Failed to scan {path}: {message}")]
    ScanFailed { path: PathBuf, message: String },
}

/// Port for discovering the files to audit
pub trait AudioFileScanner: Send + Sync {
    /// Recursively collect audio files under `root`, in enumeration order.
    ///
    /// # Returns
    /// The work queue of absolute paths, or [`ScanError::NotFound`] when
    /// `root` is not an existing directory
    fn scan(&self, root: &Path) -> Result<WorkQueue, ScanError>;
}

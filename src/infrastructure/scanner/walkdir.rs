//! Recursive directory scanner built on walkdir

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::application::ports::{AudioFileScanner, ScanError};
use crate::domain::audit::WorkQueue;
use crate::domain::config::DEFAULT_EXTENSION;
use crate::domain::paths::absolutize;

/// Collects files whose extension is in a fixed set
pub struct WalkdirScanner {
    extensions: Vec<String>,
}

impl WalkdirScanner {
    /// Create a scanner for the given extensions (without leading dot)
    pub fn new(extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.into().to_lowercase())
                .collect(),
        }
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

impl Default for WalkdirScanner {
    fn default() -> Self {
        Self::new([DEFAULT_EXTENSION])
    }
}

impl AudioFileScanner for WalkdirScanner {
    fn scan(&self, root: &Path) -> Result<WorkQueue, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::NotFound(root.to_path_buf()));
        }

        let root = absolutize(root);
        let mut files: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(&root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_audio_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        tracing::info!(root = %root.display(), count = files.len(), "scanned input directory");
        Ok(WorkQueue::new(files))
    }
}

//! Command dispatcher: applies an operator decision to one file

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::domain::audit::Command;
use crate::domain::paths::{absolutize, relative_path};

/// Errors from filesystem actions
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("{path} is not inside the input directory {input}")]
    OutsideInput { path: PathBuf, input: PathBuf },

    #[error("Refusing to overwrite existing file {0}")]
    DestinationExists(PathBuf),

    #[error("Failed to inspect {path}: {message}")]
    InspectFailed { path: PathBuf, message: String },

    #[error("Failed to create directory {path}: {message}")]
    CreateDirFailed { path: PathBuf, message: String },

    #[error("Failed to move {from} to {to}: {message}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    #[error("Failed to delete {path}: {message}")]
    DeleteFailed { path: PathBuf, message: String },
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// File now lives at this destination
    Accepted(PathBuf),
    Deleted,
    Skipped,
    /// Unrecognized command, nothing done
    Ignored,
}

/// Performs accept/delete/skip on files from the input tree
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a dispatcher for an input/output root pair
    pub fn new(input_root: impl AsRef<Path>, output_root: impl AsRef<Path>) -> Self {
        Self {
            input_root: absolutize(input_root.as_ref()),
            output_root: absolutize(output_root.as_ref()),
        }
    }

    /// Input root, absolute
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Output root, absolute
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Apply `command` to `file`. Only `file` is ever touched.
    pub async fn dispatch(&self, command: Command, file: &Path) -> Result<Dispatched, DispatchError> {
        match command {
            Command::Accept => self.accept(file).await.map(Dispatched::Accepted),
            Command::Delete => self.delete(file).await.map(|()| Dispatched::Deleted),
            Command::Skip => Ok(Dispatched::Skipped),
            Command::Unrecognized => Ok(Dispatched::Ignored),
        }
    }

    /// Where `file` lands when accepted
    pub fn destination_for(&self, file: &Path) -> Result<PathBuf, DispatchError> {
        let relative = relative_path(&self.input_root, file);

        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(DispatchError::OutsideInput {
                path: file.to_path_buf(),
                input: self.input_root.clone(),
            });
        }

        Ok(self.output_root.join(relative))
    }

    async fn accept(&self, file: &Path) -> Result<PathBuf, DispatchError> {
        let destination = self.destination_for(file)?;

        let exists = fs::try_exists(&destination)
            .await
            .map_err(|e| DispatchError::InspectFailed {
                path: destination.clone(),
                message: e.to_string(),
            })?;
        if exists {
            return Err(DispatchError::DestinationExists(destination));
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DispatchError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
        }

        move_file(file, &destination).await.map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                DispatchError::DestinationExists(destination.clone())
            } else {
                DispatchError::MoveFailed {
                    from: file.to_path_buf(),
                    to: destination.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        tracing::info!(from = %file.display(), to = %destination.display(), "accepted");
        Ok(destination)
    }

    async fn delete(&self, file: &Path) -> Result<(), DispatchError> {
        fs::remove_file(file)
            .await
            .map_err(|e| DispatchError::DeleteFailed {
                path: file.to_path_buf(),
                message: e.to_string(),
            })?;

        tracing::info!(path = %file.display(), "deleted");
        Ok(())
    }
}

/// Move without ever replacing `to`.
///
/// Hard-links then unlinks the source; where linking is impossible (other
/// filesystem, no link support) the bytes are copied into a freshly
/// created file instead. An existing `to` fails with `AlreadyExists`.
async fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(e),
        Err(link_err) => {
            if !fs::try_exists(from).await? {
                return Err(link_err);
            }
            tracing::debug!(error = %link_err, "hard link failed, copying instead");
            copy_new(from, to).await?;
        }
    }

    if let Err(e) = fs::remove_file(from).await {
        // Keep exactly one copy
        let _ = fs::remove_file(to).await;
        return Err(e);
    }

    Ok(())
}

/// Copy into a file that must not exist yet
async fn copy_new(from: &Path, to: &Path) -> io::Result<()> {
    let mut source = fs::File::open(from).await?;
    let mut target = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .await?;

    let copied = async {
        tokio::io::copy(&mut source, &mut target).await?;
        target.sync_all().await
    }
    .await;

    if let Err(e) = copied {
        drop(target);
        let _ = fs::remove_file(to).await;
        return Err(e);
    }
    Ok(())
}

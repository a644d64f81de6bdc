//! Locating the task directory.
//!
//! Tasks live in a directory named [`TASK_DIR_NAME`] at or above the current
//! working directory. Every lookup probes the filesystem afresh; nothing is
//! cached between calls.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Conventional name of the task directory.
pub const TASK_DIR_NAME: &str = "dev_cmds";

/// Errors from task directory resolution.
#[derive(Debug, thiserror::Error)]
pub enum TaskDirError {
    #[error("No dev_cmds directory found in {} or any parent directories.", .start.display())]
    NotFound { start: PathBuf },

    #[error("failed to inspect {}: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Absolute path of an existing task directory.
///
/// Only produced by [`locate_task_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDirectory {
    path: PathBuf,
}

impl TaskDirectory {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<task dir>/<file_name>`
    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for TaskDirectory {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// `start`, then each parent up to and including the filesystem root.
pub fn ancestors_to_root(start: &Path) -> impl Iterator<Item = &Path> {
    start.ancestors().filter(|dir| !dir.as_os_str().is_empty())
}

/// Find the deepest `dev_cmds` directory at or above `start_dir`.
///
/// A relative `start_dir` is resolved against the current working directory
/// so the walk always reaches the real root.
pub fn locate_task_directory(start_dir: &Path) -> Result<TaskDirectory, TaskDirError> {
    let start = std::path::absolute(start_dir).map_err(|source| TaskDirError::Probe {
        path: start_dir.to_path_buf(),
        source,
    })?;

    for dir in ancestors_to_root(&start) {
        let candidate = dir.join(TASK_DIR_NAME);
        if is_dir(&candidate)? {
            tracing::debug!(task_dir = %candidate.display(), "Found task directory");
            return Ok(TaskDirectory { path: candidate });
        }
    }

    Err(TaskDirError::NotFound { start })
}

/// `Ok(false)` for a missing path or a non-directory; other I/O failures
/// (e.g. permission denied) are errors.
fn is_dir(path: &Path) -> Result<bool, TaskDirError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound || is_not_a_directory(&e) => Ok(false),
        Err(source) => Err(TaskDirError::Probe {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn is_not_a_directory(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(libc::ENOTDIR)
}

#[cfg(not(unix))]
fn is_not_a_directory(_e: &std::io::Error) -> bool {
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Error type for process execution.

use super::outcome::ExitStatusInfo;

/// Errors that can occur while launching or supervising a child process.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The OS could not create the process (missing executable, permissions).
    /// Raised regardless of the exit-code policy.
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and ended with a non-success status under
    /// [`ExitCodePolicy::ErrorOnNonZero`](super::spec::ExitCodePolicy::ErrorOnNonZero).
    #[error("{message}")]
    NonZeroExit {
        command: String,
        args: Vec<String>,
        status: ExitStatusInfo,
        /// The failure message that was also written to the sink.
        message: String,
    },

    /// The process exceeded its configured timeout and was killed.
    #[error("process \"{command}\" timed out after {elapsed_ms}ms")]
    Timeout { command: String, elapsed_ms: u64 },

    /// Two entries of one parallel execution share a key.
    #[error("duplicate process id in parallel execution: {0}")]
    DuplicateProcessId(String),

    /// Waiting on the child or reading its output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    /// Exit status carried by a `NonZeroExit`, if this is one.
    pub fn exit_status(&self) -> Option<&ExitStatusInfo> {
        match self {
            Self::NonZeroExit { status, .. } => Some(status),
            _ => None,
        }
    }
}

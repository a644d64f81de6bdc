//! Description of a process to launch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// How a non-zero exit (or termination by signal) is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitCodePolicy {
    /// Emit the failure message on the error channel and return
    /// [`ProcessError::NonZeroExit`](super::error::ProcessError::NonZeroExit).
    #[default]
    ErrorOnNonZero,
    /// Emit the failure message as a notice and return the outcome as data.
    ReportAndContinue,
}

/// Everything needed to launch one child process.
///
/// Executors only borrow a spec, so it stays unchanged for the whole run.
#[derive(Debug, Clone, Default)]
pub struct ProcessSpec {
    /// Executable name (looked up on `PATH`) or path.
    pub command: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory (caller's current directory if `None`).
    pub working_directory: Option<PathBuf>,
    /// Complete child environment. `None` inherits the caller's environment;
    /// `Some` replaces it entirely, nothing is merged in.
    pub env: Option<HashMap<String, String>>,
    pub exit_code_policy: ExitCodePolicy,
    /// Skip the informational start/exit notices for this run.
    pub suppress_notices: bool,
    /// Kill the child and fail with `Timeout` once this much time has passed.
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ProcessSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn exit_code_policy(mut self, policy: ExitCodePolicy) -> Self {
        self.exit_code_policy = policy;
        self
    }

    pub fn suppress_notices(mut self, suppress: bool) -> Self {
        self.suppress_notices = suppress;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

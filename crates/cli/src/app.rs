//! One CLI invocation: locate the task directory, dispatch, map the result
//! to a process exit code.

use std::path::Path;

use taskrunner_core::dispatch::{DispatchError, Dispatcher};
use taskrunner_core::process::{ExitStatusInfo, ProcessError, ProcessExecutor};
use taskrunner_core::task_dir::{locate_task_directory, TaskDirError};

use crate::config::CliConfig;

/// Exit code for every failure that is not a child's own exit status.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Errors that end a CLI invocation.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    TaskDir(#[from] TaskDirError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl CliError {
    /// The process exit code for this error.
    ///
    /// A task that exited non-zero passes its code through; a task killed by
    /// a signal maps to `128 + signal`, as shells do. Everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self.task_exit_status() {
            Some(ExitStatusInfo::Code(code)) if *code != 0 => *code,
            Some(ExitStatusInfo::Signal { number, .. }) => 128 + number,
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// Whether the executor has already written this failure to the sink.
    pub fn already_reported(&self) -> bool {
        self.task_exit_status().is_some()
    }

    fn task_exit_status(&self) -> Option<&ExitStatusInfo> {
        match self {
            Self::Dispatch(DispatchError::Process(err @ ProcessError::NonZeroExit { .. })) => {
                err.exit_status()
            }
            _ => None,
        }
    }
}

/// Run `args` (program name excluded) from `cwd`.
pub async fn run(
    cwd: &Path,
    args: &[String],
    config: &CliConfig,
    executor: ProcessExecutor,
) -> Result<(), CliError> {
    let task_dir = locate_task_directory(cwd)?;
    tracing::debug!(task_dir = %task_dir.path().display(), ?args, "Dispatching");

    Dispatcher::new(task_dir, executor)
        .quiet(config.quiet)
        .verify_interpreters(!config.skip_interpreter_check)
        .run(args)
        .await?;
    Ok(())
}

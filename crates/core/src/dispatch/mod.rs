//! Task dispatch: turn a command line into a script run or a built-in command.
//!
//! The first argument names the task. Names starting with `--` select a
//! [`ReservedCommand`]; anything else is looked up as `<name>.<ext>` in the
//! task directory for each runner of the [`ScriptRunnerBinding`], in priority
//! order, and launched with that runner's interpreter attached to the TTY.

pub mod reserved;
pub mod runners;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::platform::with_cmd_on_windows;
use crate::process::format::{command_args, command_name};
use crate::process::{ExitCodePolicy, ProcessError, ProcessExecutor, ProcessOutcome, ProcessSpec};
use crate::task_dir::TaskDirectory;

pub use reserved::{ReservedCommand, RESERVED_PREFIX};
pub use runners::{AvailabilityCheck, ScriptRunner, ScriptRunnerBinding};

/// Name of the command-line front end, used in user-facing hints.
pub const CLI_NAME: &str = "taskrunner";

/// Errors from dispatching a task request.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No script specified. Use {cli} --list to show available tasks.", cli = CLI_NAME)]
    NoScriptSpecified,

    #[error("Command {0} not found.")]
    UnknownReservedCommand(String),

    #[error(
        "No script file found for command '{name}'.\n    dev_cmds dir path: {}\n    Script files tried: {}\n\n    Use {cli} --list to show available tasks.",
        .task_dir.display(),
        .tried.join(", "),
        cli = CLI_NAME
    )]
    ScriptNotFound {
        name: String,
        task_dir: PathBuf,
        /// Every file name probed, in priority order.
        tried: Vec<String>,
    },

    #[error("No script runner for .{extension} tasks found. Did you forget to install {package}?")]
    InterpreterUnavailable {
        extension: String,
        interpreter: String,
        package: String,
    },

    #[error("failed to inspect {}: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list available tasks: {0}")]
    ListFailed(#[source] std::io::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// How the first argument is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// `--<name>`; carries `<name>`.
    Reserved(&'a str),
    /// A user task name.
    Task(&'a str),
}

impl<'a> Request<'a> {
    /// `--` on its own is not a reserved command; it is treated as a task name.
    pub fn classify(name: &'a str) -> Self {
        match name.strip_prefix(RESERVED_PREFIX) {
            Some(rest) if !rest.is_empty() => Self::Reserved(rest),
            _ => Self::Task(name),
        }
    }
}

/// A task name resolved to a script file and the runner that launches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub path: PathBuf,
    pub runner: ScriptRunner,
}

/// Runs task requests against one task directory.
pub struct Dispatcher {
    task_dir: TaskDirectory,
    executor: ProcessExecutor,
    runners: ScriptRunnerBinding,
    verify_interpreters: bool,
    quiet: bool,
}

impl Dispatcher {
    pub fn new(task_dir: TaskDirectory, executor: ProcessExecutor) -> Self {
        Self {
            task_dir,
            executor,
            runners: ScriptRunnerBinding::default(),
            verify_interpreters: true,
            quiet: false,
        }
    }

    pub fn with_runners(mut self, runners: ScriptRunnerBinding) -> Self {
        self.runners = runners;
        self
    }

    /// Run each runner's availability check before launching (default on).
    pub fn verify_interpreters(mut self, verify: bool) -> Self {
        self.verify_interpreters = verify;
        self
    }

    /// Suppress notices (task header, process start/exit).
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn task_dir(&self) -> &TaskDirectory {
        &self.task_dir
    }

    /// Dispatch `args`: `args[0]` is the task name or `--<reserved>`, the
    /// rest are passed to the script.
    pub async fn run(&self, args: &[String]) -> Result<(), DispatchError> {
        let (name, rest) = match args.split_first() {
            Some((name, rest)) if !name.is_empty() => (name.as_str(), rest),
            _ => return Err(DispatchError::NoScriptSpecified),
        };

        match Request::classify(name) {
            Request::Reserved(cmd) => {
                let cmd = ReservedCommand::lookup(cmd)
                    .ok_or_else(|| DispatchError::UnknownReservedCommand(cmd.to_string()))?;
                self.run_reserved(cmd)
            }
            Request::Task(task) => {
                self.print_header(task, rest);
                self.run_task(task, rest).await.map(|_| ())
            }
        }
    }

    fn run_reserved(&self, cmd: ReservedCommand) -> Result<(), DispatchError> {
        tracing::debug!(command = cmd.name(), "Running reserved command");
        let sink = self.executor.sink();
        match cmd {
            ReservedCommand::List => {
                let names = reserved::list_tasks(self.task_dir.path(), &self.runners)
                    .map_err(DispatchError::ListFailed)?;
                reserved::print_task_list(sink, self.task_dir.path(), &names, self.quiet);
            }
            ReservedCommand::Help => reserved::print_help(sink),
        }
        Ok(())
    }

    /// Find the script for `name`: the first runner, in priority order, whose
    /// `<name>.<ext>` is a file in the task directory.
    pub fn resolve_script(&self, name: &str) -> Result<ResolvedScript, DispatchError> {
        for runner in self.runners.iter() {
            let path = self.task_dir.join(&runner.script_file_name(name));
            if is_file(&path)? {
                return Ok(ResolvedScript {
                    path,
                    runner: runner.clone(),
                });
            }
        }

        Err(DispatchError::ScriptNotFound {
            name: name.to_string(),
            task_dir: self.task_dir.path().to_path_buf(),
            tried: self
                .runners
                .iter()
                .map(|r| r.script_file_name(name))
                .collect(),
        })
    }

    /// Resolve and launch a user task attached to the TTY, from the task
    /// directory. A non-zero exit is always an error at this layer.
    pub async fn run_task(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<ProcessOutcome, DispatchError> {
        let script = self.resolve_script(name)?;

        if self.verify_interpreters && !script.runner.is_available(self.task_dir.path()).await {
            let package = match &script.runner.check {
                AvailabilityCheck::NpmPackage(package) => package.clone(),
                AvailabilityCheck::None => script.runner.interpreter.clone(),
            };
            return Err(DispatchError::InterpreterUnavailable {
                extension: script.runner.extension,
                interpreter: script.runner.interpreter,
                package,
            });
        }

        tracing::debug!(
            task = name,
            script = %script.path.display(),
            interpreter = %script.runner.interpreter,
            "Launching task",
        );

        let spec = ProcessSpec::new(with_cmd_on_windows(&script.runner.interpreter))
            .arg(script.path.to_string_lossy())
            .args(args.iter().cloned())
            .working_directory(self.task_dir.path())
            .exit_code_policy(ExitCodePolicy::ErrorOnNonZero)
            .suppress_notices(self.quiet);

        Ok(self.executor.execute_in_tty(&spec).await?)
    }

    fn print_header(&self, name: &str, args: &[String]) {
        if self.quiet {
            return;
        }
        let mut header = format!(": cmd {}", command_name(name));
        if !args.is_empty() {
            header.push_str(&format!(" with args {}", command_args(args)));
        }
        self.executor.sink().error(&header);
    }
}

fn is_file(path: &Path) -> Result<bool, DispatchError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(DispatchError::Probe {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

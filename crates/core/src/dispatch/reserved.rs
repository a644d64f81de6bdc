//! Built-in commands, invoked as `--<name>` instead of a task name.

use std::collections::BTreeSet;
use std::path::Path;

use super::runners::ScriptRunnerBinding;
use super::CLI_NAME;
use crate::process::LogSink;

/// Marks a reserved command, e.g. `--list`.
pub const RESERVED_PREFIX: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedCommand {
    /// Print the tasks available in the task directory.
    List,
    /// Print usage.
    Help,
}

impl ReservedCommand {
    pub const ALL: [ReservedCommand; 2] = [ReservedCommand::List, ReservedCommand::Help];

    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Help => "help",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }
}

/// Base names of the runnable scripts directly inside `task_dir`, sorted
/// and without duplicates.
///
/// A file qualifies when its extension (any case) belongs to a runner.
pub fn list_tasks(task_dir: &Path, runners: &ScriptRunnerBinding) -> std::io::Result<Vec<String>> {
    let mut names = BTreeSet::new();

    for entry in std::fs::read_dir(task_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let (Some(stem), Some(ext)) = (path.file_stem(), path.extension()) else {
            continue;
        };
        if runners.handles_extension(&ext.to_string_lossy()) {
            names.insert(stem.to_string_lossy().into_owned());
        }
    }

    Ok(names.into_iter().collect())
}

/// Write the output of `--list` for `names` found in `task_dir`.
///
/// Task names go to the `log` channel one per line; the heading is a notice
/// on the `error` channel unless `quiet`.
pub fn print_task_list(sink: &dyn LogSink, task_dir: &Path, names: &[String], quiet: bool) {
    if names.is_empty() {
        sink.log(&format!("No tasks found in {}.", task_dir.display()));
        return;
    }

    if !quiet {
        sink.error(&format!("Available tasks in {}:", task_dir.display()));
    }
    for name in names {
        sink.log(name);
    }
}

/// Write the output of `--help`.
pub fn print_help(sink: &dyn LogSink) {
    sink.log(&format!("Usage: {CLI_NAME} <task> [args...]"));
    sink.log(&format!("Use {CLI_NAME} --list to show available tasks."));
}

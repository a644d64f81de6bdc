//! Script runner bindings: which interpreter launches which file extension.

use std::path::Path;
use std::sync::Arc;

use crate::platform::with_cmd_on_windows;
use crate::process::{ExitCodePolicy, NullSink, ProcessExecutor, ProcessSpec};

/// How to confirm an interpreter is installed before launching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityCheck {
    /// Assume the interpreter is on `PATH`.
    None,
    /// The interpreter ships as an npm package that must be installed for the
    /// task directory; checked with `npm ls <package>`.
    NpmPackage(String),
}

/// One `(extension, interpreter)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRunner {
    /// File extension without the dot, e.g. `ts`.
    pub extension: String,
    /// Executable invoked with the script path as first argument.
    pub interpreter: String,
    pub check: AvailabilityCheck,
}

impl ScriptRunner {
    pub fn new(extension: impl Into<String>, interpreter: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            interpreter: interpreter.into(),
            check: AvailabilityCheck::None,
        }
    }

    pub fn requires_npm_package(mut self, package: impl Into<String>) -> Self {
        self.check = AvailabilityCheck::NpmPackage(package.into());
        self
    }

    /// `<name>.<extension>`
    pub fn script_file_name(&self, task_name: &str) -> String {
        format!("{task_name}.{}", self.extension)
    }

    /// Run the availability check from `dir`.
    ///
    /// `npm ls <package>` exits 0 only when the package is installed; if npm
    /// itself cannot be spawned the interpreter counts as unavailable.
    pub async fn is_available(&self, dir: &Path) -> bool {
        let AvailabilityCheck::NpmPackage(package) = &self.check else {
            return true;
        };

        let spec = ProcessSpec::new(with_cmd_on_windows("npm"))
            .args(["ls", package.as_str()])
            .working_directory(dir)
            .exit_code_policy(ExitCodePolicy::ReportAndContinue)
            .suppress_notices(true);

        let quiet = ProcessExecutor::new(Arc::new(NullSink));
        match quiet.execute_to_string(&spec).await {
            Ok(captured) => captured.outcome.success(),
            Err(e) => {
                tracing::debug!(package = %package, error = %e, "npm availability check failed");
                false
            }
        }
    }
}

/// Priority-ordered runners; the first whose script file exists wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRunnerBinding {
    runners: Vec<ScriptRunner>,
}

impl ScriptRunnerBinding {
    pub fn new(runners: Vec<ScriptRunner>) -> Self {
        Self { runners }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptRunner> {
        self.runners.iter()
    }

    /// Whether `extension` (without dot, any case) belongs to a runner.
    pub fn handles_extension(&self, extension: &str) -> bool {
        self.runners
            .iter()
            .any(|r| r.extension.eq_ignore_ascii_case(extension))
    }
}

impl Default for ScriptRunnerBinding {
    /// TypeScript via `ts-node` (preferred), then JavaScript via `node`.
    fn default() -> Self {
        Self::new(vec![
            ScriptRunner::new("ts", "ts-node").requires_npm_package("ts-node"),
            ScriptRunner::new("js", "node"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefers_typescript() {
        let binding = ScriptRunnerBinding::default();
        let extensions: Vec<&str> = binding.iter().map(|r| r.extension.as_str()).collect();
        assert_eq!(extensions, vec!["ts", "js"]);
        assert_eq!(
            binding.iter().next().map(|r| &r.check),
            Some(&AvailabilityCheck::NpmPackage("ts-node".into()))
        );
    }

    #[test]
    fn extension_match_ignores_case() {
        let binding = ScriptRunnerBinding::default();
        assert!(binding.handles_extension("JS"));
        assert!(binding.handles_extension("ts"));
        assert!(!binding.handles_extension("txt"));
    }

    #[test]
    fn script_file_name_appends_extension() {
        assert_eq!(ScriptRunner::new("js", "node").script_file_name("build"), "build.js");
    }

    #[tokio::test]
    async fn runner_without_check_is_available() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(ScriptRunner::new("sh", "sh").is_available(dir.path()).await);
    }

    #[tokio::test]
    async fn missing_npm_package_is_unavailable() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let runner =
            ScriptRunner::new("ts", "ts-node").requires_npm_package("taskrunner-no-such-package");
        assert!(!runner.is_available(dir.path()).await);
    }
}

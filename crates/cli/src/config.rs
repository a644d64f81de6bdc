/// CLI configuration loaded from environment variables.
///
/// A `.env` file in the current directory is honoured (loaded by `main`
/// before this is read).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Suppress notices: task header, process start/exit (default: `false`).
    pub quiet: bool,
    /// Skip interpreter availability checks such as `npm ls ts-node`
    /// (default: `false`).
    pub skip_interpreter_check: bool,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                             | Default |
    /// |-------------------------------------|---------|
    /// | `TASKRUNNER_QUIET`                  | `false` |
    /// | `TASKRUNNER_SKIP_INTERPRETER_CHECK` | `false` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            quiet: flag(lookup("TASKRUNNER_QUIET")),
            skip_interpreter_check: flag(lookup("TASKRUNNER_SKIP_INTERPRETER_CHECK")),
        }
    }
}

/// `1`, `true`, `yes`, `on` (any case) are set; anything else is unset.
fn flag(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

//! `taskrunner` -- run per-project developer tasks.
//!
//! Finds the nearest `dev_cmds` directory at or above the current directory
//! and runs `<task>.ts` (via `ts-node`) or `<task>.js` (via `node`) from it,
//! attached to this terminal. The task's exit code becomes ours.
//!
//! ```text
//! taskrunner <task> [args...]
//! taskrunner --list
//! taskrunner --help
//! ```
//!
//! # Environment variables
//!
//! | Variable                            | Default | Description                         |
//! |-------------------------------------|---------|-------------------------------------|
//! | `TASKRUNNER_QUIET`                  | `false` | Suppress notices                    |
//! | `TASKRUNNER_SKIP_INTERPRETER_CHECK` | `false` | Skip the `npm ls` check for ts-node |
//! | `RUST_LOG`                          | `taskrunner=warn,taskrunner_core=warn` | Diagnostic log filter |

use taskrunner::app::{self, FAILURE_EXIT_CODE};
use taskrunner::config::CliConfig;
use taskrunner_core::process::{LogSink, ProcessExecutor};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskrunner=warn,taskrunner_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let executor = ProcessExecutor::console();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            executor
                .sink()
                .error(&format!("Cannot determine current directory: {e}"));
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    tracing::debug!(cwd = %cwd.display(), ?config, "Starting taskrunner");

    if let Err(err) = app::run(&cwd, &args, &config, executor.clone()).await {
        if !err.already_reported() {
            for line in err.to_string().lines() {
                executor.sink().error(line);
            }
        }
        std::process::exit(err.exit_code());
    }
}

//! Child process creation, supervision, and output handling.
//!
//! [`ProcessExecutor`] offers three single-process modes sharing one spawn
//! and supervision path:
//!
//! * [`execute_piped`](ProcessExecutor::execute_piped) forwards output lines
//!   to the sink as they arrive.
//! * [`execute_in_tty`](ProcessExecutor::execute_in_tty) attaches the child to
//!   the caller's terminal.
//! * [`execute_to_string`](ProcessExecutor::execute_to_string) accumulates
//!   output and returns it.
//!
//! Parallel execution lives in [`super::parallel`].

use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use tokio::process::{Child, Command};

use super::error::ProcessError;
use super::format::{command_name, invocation, non_zero_exit_message};
use super::lines::for_each_line;
use super::outcome::{CapturedOutcome, ExitStatusInfo, ProcessOutcome};
use super::sink::{ConsoleSink, LogSink, PrefixedSink};
use super::spec::{ExitCodePolicy, ProcessSpec};

/// Where the child's standard streams go.
#[derive(Debug, Clone, Copy)]
enum StreamMode {
    /// stdout/stderr into pipes read by us, stdin closed.
    Piped,
    /// All three streams shared with the calling process.
    Inherit,
}

/// Launches and supervises child processes, writing notices and forwarded
/// output to an injected [`LogSink`].
#[derive(Clone)]
pub struct ProcessExecutor {
    sink: Arc<dyn LogSink>,
}

impl ProcessExecutor {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Executor writing to the calling process's stdout/stderr.
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleSink))
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    /// Run a process with stdout/stderr piped, forwarding each line to the
    /// sink as it arrives (stdout to `log`, stderr to `error`).
    ///
    /// Waits for exit. A non-success exit is handled per
    /// [`ProcessSpec::exit_code_policy`]; a spawn failure is always an error.
    pub async fn execute_piped(&self, spec: &ProcessSpec) -> Result<ProcessOutcome, ProcessError> {
        self.execute_piped_with_prefix(spec, "").await
    }

    /// [`execute_piped`](Self::execute_piped) with every sink line prefixed.
    pub(crate) async fn execute_piped_with_prefix(
        &self,
        spec: &ProcessSpec,
        prefix: &str,
    ) -> Result<ProcessOutcome, ProcessError> {
        let sink = PrefixedSink::new(self.sink.as_ref(), prefix);
        notice(&sink, spec, &format!("Starting process: {}", invocation(spec)));

        let mut child = spawn(spec, StreamMode::Piped)?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let forward = async {
            let (out, err) = tokio::join!(
                for_each_line(stdout, |line| sink.log(&line)),
                for_each_line(stderr, |line| sink.error(&line)),
            );
            out.and(err)
        };

        let status = supervise(spec, &mut child, forward).await?;
        settle(&sink, spec, status, |status| {
            non_zero_exit_message(spec, status)
        })
    }

    /// Run a process attached to the caller's terminal.
    ///
    /// stdin, stdout and stderr are inherited, so interactive programs work;
    /// nothing is intercepted or captured. Exit-code policy applies as in
    /// [`execute_piped`](Self::execute_piped).
    pub async fn execute_in_tty(&self, spec: &ProcessSpec) -> Result<ProcessOutcome, ProcessError> {
        let sink = self.sink.as_ref();
        notice(
            sink,
            spec,
            &format!("Starting process: {} attached to TTY", invocation(spec)),
        );

        let mut child = spawn(spec, StreamMode::Inherit)?;
        let status = supervise(spec, &mut child, async { Ok(()) }).await?;
        settle(sink, spec, status, |status| non_zero_exit_message(spec, status))
    }

    /// Run a process and collect its stdout and stderr into strings.
    ///
    /// Output is not forwarded to the sink. On a non-success exit, the
    /// failure message embeds both collected streams.
    pub async fn execute_to_string(
        &self,
        spec: &ProcessSpec,
    ) -> Result<CapturedOutcome, ProcessError> {
        let sink = self.sink.as_ref();
        notice(
            sink,
            spec,
            &format!("Starting process: {} and capturing output", invocation(spec)),
        );

        let mut child = spawn(spec, StreamMode::Piped)?;
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let mut stdout = String::new();
        let mut stderr = String::new();
        let collect = async {
            let (out, err) = tokio::join!(
                for_each_line(stdout_pipe, |line| append_line(&mut stdout, &line)),
                for_each_line(stderr_pipe, |line| append_line(&mut stderr, &line)),
            );
            out.and(err)
        };

        let status = supervise(spec, &mut child, collect).await?;
        let outcome = settle(sink, spec, status, |status| {
            format!(
                "{}\n\nSTDOUT WAS:\n{stdout}\n\nSTDERR WAS:\n{stderr}\n\n",
                non_zero_exit_message(spec, status)
            )
        })?;

        Ok(CapturedOutcome {
            outcome,
            stdout,
            stderr,
        })
    }
}

fn append_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

/// Build and spawn the child described by `spec`.
///
/// `kill_on_drop(true)` ensures an abandoned execution never leaks a child.
fn spawn(spec: &ProcessSpec, mode: StreamMode) -> Result<Child, ProcessError> {
    let mut cmd = Command::new(&spec.command);
    cmd.args(&spec.args).kill_on_drop(true);

    if let Some(dir) = &spec.working_directory {
        cmd.current_dir(dir);
    }

    if let Some(env) = &spec.env {
        cmd.env_clear().envs(env);
    }

    match mode {
        StreamMode::Piped => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }
        StreamMode::Inherit => {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
    }

    let child = cmd.spawn().map_err(|source| {
        tracing::debug!(command = %spec.command, error = %source, "Spawn failed");
        ProcessError::Spawn {
            command: spec.command.clone(),
            source,
        }
    })?;

    tracing::debug!(
        command = %spec.command,
        args = ?spec.args,
        pid = child.id(),
        mode = ?mode,
        "Spawned process",
    );

    Ok(child)
}

/// Wait for `child` to exit while driving `io` (output forwarding) to
/// completion, enforcing its timeout if one is set.
async fn supervise<F>(
    spec: &ProcessSpec,
    child: &mut Child,
    io: F,
) -> Result<ExitStatusInfo, ProcessError>
where
    F: Future<Output = std::io::Result<()>>,
{
    let start = Instant::now();

    let run = async {
        let (status, io_result) = tokio::join!(child.wait(), io);
        let status = status?;
        io_result?;
        Ok::<_, std::io::Error>(status)
    };

    let status = match spec.timeout {
        None => run.await?,
        Some(limit) => {
            let waited = tokio::time::timeout(limit, run).await;
            match waited {
                Ok(result) => result?,
                Err(_elapsed) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    if let Err(e) = child.start_kill() {
                        tracing::warn!(command = %spec.command, error = %e, "Failed to kill timed-out process");
                    }
                    // Reap the child so it does not linger as a zombie.
                    let _ = child.wait().await;
                    tracing::warn!(command = %spec.command, elapsed_ms, "Process timed out");
                    return Err(ProcessError::Timeout {
                        command: spec.command.clone(),
                        elapsed_ms,
                    });
                }
            }
        }
    };

    let status = ExitStatusInfo::from(status);
    tracing::debug!(
        command = %spec.command,
        status = %status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Process exited",
    );
    Ok(status)
}

/// Apply the exit-code policy to a finished process.
///
/// Failure messages are always written, even with notices suppressed; only
/// the success notice is optional.
fn settle<F>(
    sink: &dyn LogSink,
    spec: &ProcessSpec,
    status: ExitStatusInfo,
    failure_message: F,
) -> Result<ProcessOutcome, ProcessError>
where
    F: FnOnce(&ExitStatusInfo) -> String,
{
    if status.success() {
        notice(
            sink,
            spec,
            &format!("Process {} exited successfully.", command_name(&spec.command)),
        );
        return Ok(ProcessOutcome { status });
    }

    let message = failure_message(&status);
    for line in message.lines() {
        sink.error(line);
    }

    match spec.exit_code_policy {
        ExitCodePolicy::ErrorOnNonZero => Err(ProcessError::NonZeroExit {
            command: spec.command.clone(),
            args: spec.args.clone(),
            status,
            message,
        }),
        ExitCodePolicy::ReportAndContinue => Ok(ProcessOutcome { status }),
    }
}

fn notice(sink: &dyn LogSink, spec: &ProcessSpec, message: &str) {
    if !spec.suppress_notices {
        sink.error(message);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

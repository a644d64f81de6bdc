//! Process supervision and script dispatch for `taskrunner`.
//!
//! The crate has three layers:
//!
//! * [`process`] spawns and supervises child processes (piped, TTY-attached,
//!   captured, and parallel execution) and reports their exit status.
//! * [`task_dir`] locates the `dev_cmds` task directory by walking ancestors.
//! * [`dispatch`] maps a task name to a script file and interpreter and runs it.
//!
//! Nothing here touches a process-wide console: every operation writes through
//! an injected [`process::sink::LogSink`].

pub mod dispatch;
pub mod platform;
pub mod process;
pub mod task_dir;

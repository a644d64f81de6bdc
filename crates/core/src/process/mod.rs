//! Child process execution.
//!
//! Describe a process with [`ProcessSpec`], run it through a
//! [`ProcessExecutor`], and get back a [`ProcessOutcome`] (or a
//! [`CapturedOutcome`] for captured runs). Output and notices go to the
//! executor's [`LogSink`].

pub mod error;
pub mod executor;
pub mod format;
pub mod lines;
pub mod outcome;
pub mod parallel;
pub mod sink;
pub mod spec;

pub use error::ProcessError;
pub use executor::ProcessExecutor;
pub use outcome::{CapturedOutcome, ExitStatusInfo, ProcessOutcome};
pub use parallel::ParallelOptions;
pub use sink::{CaptureSink, Channel, ConsoleSink, LogSink, NullSink, TracingSink};
pub use spec::{ExitCodePolicy, ProcessSpec};

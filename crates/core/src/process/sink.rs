//! Output targets for process notices and forwarded child output.
//!
//! Every executor writes through a [`LogSink`] handed to it at construction,
//! never to a global console. A sink has two channels: `log` for regular
//! output (child stdout) and `error` for diagnostics (child stderr, notices,
//! failure messages). Each call carries exactly one complete line.

use std::io::Write;
use std::sync::Mutex;

/// Two-channel line sink.
pub trait LogSink: Send + Sync {
    /// Write one line to the regular output channel.
    fn log(&self, line: &str);

    /// Write one line to the diagnostic channel.
    fn error(&self, line: &str);
}

/// Writes `log` lines to stdout and `error` lines to stderr.
///
/// Each line is written under the stream lock, so concurrent writers never
/// interleave within a line. Write failures (e.g. a closed pipe) are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn log(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }

    fn error(&self, line: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{line}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _line: &str) {}
    fn error(&self, _line: &str) {}
}

/// Forwards lines to `tracing`: `log` at INFO, `error` at WARN.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, line: &str) {
        tracing::info!(target: "taskrunner::output", "{line}");
    }

    fn error(&self, line: &str) {
        tracing::warn!(target: "taskrunner::output", "{line}");
    }
}

/// Which channel a captured line was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Log,
    Error,
}

/// Keeps every line in memory, in write order.
#[derive(Debug, Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<(Channel, String)>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines with their channel, in write order.
    pub fn lines(&self) -> Vec<(Channel, String)> {
        self.lock().clone()
    }

    /// Lines written to the `log` channel.
    pub fn log_lines(&self) -> Vec<String> {
        self.channel(Channel::Log)
    }

    /// Lines written to the `error` channel.
    pub fn error_lines(&self) -> Vec<String> {
        self.channel(Channel::Error)
    }

    fn channel(&self, channel: Channel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Channel, String)>> {
        // A poisoned lock only means a writer panicked mid-push; the data is still usable.
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, channel: Channel, line: &str) {
        self.lock().push((channel, line.to_string()));
    }
}

impl LogSink for CaptureSink {
    fn log(&self, line: &str) {
        self.push(Channel::Log, line);
    }

    fn error(&self, line: &str) {
        self.push(Channel::Error, line);
    }
}

/// Prepends a fixed label to every line before handing it on.
pub(crate) struct PrefixedSink<'a> {
    inner: &'a dyn LogSink,
    prefix: &'a str,
}

impl<'a> PrefixedSink<'a> {
    pub(crate) fn new(inner: &'a dyn LogSink, prefix: &'a str) -> Self {
        Self { inner, prefix }
    }
}

impl LogSink for PrefixedSink<'_> {
    fn log(&self, line: &str) {
        if self.prefix.is_empty() {
            self.inner.log(line);
        } else {
            self.inner.log(&format!("{}{line}", self.prefix));
        }
    }

    fn error(&self, line: &str) {
        if self.prefix.is_empty() {
            self.inner.error(line);
        } else {
            self.inner.error(&format!("{}{line}", self.prefix));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_sink_separates_channels() {
        let sink = CaptureSink::new();
        sink.log("out");
        sink.error("err");
        sink.log("out2");

        assert_eq!(sink.log_lines(), vec!["out", "out2"]);
        assert_eq!(sink.error_lines(), vec!["err"]);
        assert_eq!(
            sink.lines(),
            vec![
                (Channel::Log, "out".to_string()),
                (Channel::Error, "err".to_string()),
                (Channel::Log, "out2".to_string()),
            ]
        );
    }

    #[test]
    fn prefixed_sink_labels_both_channels() {
        let sink = CaptureSink::new();
        let prefixed = PrefixedSink::new(&sink, "<build> ");
        prefixed.log("compiling");
        prefixed.error("warning");

        assert_eq!(sink.log_lines(), vec!["<build> compiling"]);
        assert_eq!(sink.error_lines(), vec!["<build> warning"]);
    }

    #[test]
    fn empty_prefix_passes_lines_through() {
        let sink = CaptureSink::new();
        PrefixedSink::new(&sink, "").log("plain");
        assert_eq!(sink.log_lines(), vec!["plain"]);
    }
}

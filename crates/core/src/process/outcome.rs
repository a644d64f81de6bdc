//! Exit status and output of completed processes.

use std::fmt;
use std::process::ExitStatus;

/// How a child process ended: exactly one of an exit code or a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatusInfo {
    /// The process exited on its own with this code.
    Code(i32),
    /// The process was terminated by a signal.
    Signal {
        number: i32,
        /// POSIX name, e.g. `SIGTERM`; `SIG<n>` for unknown numbers.
        name: String,
    },
}

impl ExitStatusInfo {
    pub fn success(&self) -> bool {
        matches!(self, Self::Code(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Signal { .. } => None,
        }
    }

    pub fn signal_name(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Signal { name, .. } => Some(name),
        }
    }

    pub fn from_signal(number: i32) -> Self {
        Self::Signal {
            number,
            name: signal_name(number),
        }
    }
}

impl From<ExitStatus> for ExitStatusInfo {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::from_signal(signal);
            }
        }

        // Neither a code nor a signal is only possible on exotic platforms.
        Self::Code(-1)
    }
}

impl fmt::Display for ExitStatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "status code {code}"),
            Self::Signal { name, .. } => write!(f, "signal {name}"),
        }
    }
}

#[cfg(unix)]
fn signal_name(number: i32) -> String {
    let name = match number {
        libc::SIGHUP => "SIGHUP",
        libc::SIGINT => "SIGINT",
        libc::SIGQUIT => "SIGQUIT",
        libc::SIGILL => "SIGILL",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGABRT => "SIGABRT",
        libc::SIGBUS => "SIGBUS",
        libc::SIGFPE => "SIGFPE",
        libc::SIGKILL => "SIGKILL",
        libc::SIGUSR1 => "SIGUSR1",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGUSR2 => "SIGUSR2",
        libc::SIGPIPE => "SIGPIPE",
        libc::SIGALRM => "SIGALRM",
        libc::SIGTERM => "SIGTERM",
        libc::SIGCHLD => "SIGCHLD",
        libc::SIGCONT => "SIGCONT",
        libc::SIGSTOP => "SIGSTOP",
        libc::SIGTSTP => "SIGTSTP",
        libc::SIGTTIN => "SIGTTIN",
        libc::SIGTTOU => "SIGTTOU",
        libc::SIGXCPU => "SIGXCPU",
        libc::SIGXFSZ => "SIGXFSZ",
        libc::SIGSYS => "SIGSYS",
        _ => return format!("SIG{number}"),
    };
    name.to_string()
}

#[cfg(not(unix))]
fn signal_name(number: i32) -> String {
    format!("SIG{number}")
}

/// Result of a completed process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub status: ExitStatusInfo,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, or `None` if the process was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn signal(&self) -> Option<&str> {
        self.status.signal_name()
    }
}

/// Outcome of a captured run, with both output streams.
///
/// Every received line is stored followed by `\n`, in receipt order within
/// its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutcome {
    pub outcome: ProcessOutcome,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutcome {
    pub fn exit_code(&self) -> Option<i32> {
        self.outcome.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_zero_is_success() {
        assert!(ExitStatusInfo::Code(0).success());
        assert!(!ExitStatusInfo::Code(1).success());
    }

    #[test]
    fn signal_is_never_success() {
        let status = ExitStatusInfo::Signal {
            number: 9,
            name: "SIGKILL".into(),
        };
        assert!(!status.success());
        assert_eq!(status.code(), None);
        assert_eq!(status.signal_name(), Some("SIGKILL"));
    }

    #[test]
    fn display_mentions_code_or_signal() {
        assert_eq!(ExitStatusInfo::Code(42).to_string(), "status code 42");
        let status = ExitStatusInfo::Signal {
            number: 15,
            name: "SIGTERM".into(),
        };
        assert_eq!(status.to_string(), "signal SIGTERM");
    }

    #[cfg(unix)]
    #[test]
    fn known_signals_get_posix_names() {
        assert_eq!(
            ExitStatusInfo::from_signal(libc::SIGTERM).signal_name(),
            Some("SIGTERM")
        );
        assert_eq!(
            ExitStatusInfo::from_signal(libc::SIGKILL).signal_name(),
            Some("SIGKILL")
        );
    }

    #[test]
    fn unknown_signal_falls_back_to_number() {
        assert_eq!(
            ExitStatusInfo::from_signal(200).signal_name(),
            Some("SIG200")
        );
    }

    #[cfg(unix)]
    #[test]
    fn converts_raw_exit_status() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status: exit code lives in the high byte.
        assert_eq!(
            ExitStatusInfo::from(ExitStatus::from_raw(3 << 8)),
            ExitStatusInfo::Code(3)
        );
        assert_eq!(
            ExitStatusInfo::from(ExitStatus::from_raw(libc::SIGTERM)).signal_name(),
            Some("SIGTERM")
        );
    }
}

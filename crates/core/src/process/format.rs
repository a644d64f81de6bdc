//! Plain-text rendering of commands for notices and error messages.

use super::outcome::ExitStatusInfo;
use super::spec::ProcessSpec;

/// `"cmd"`
pub fn command_name(command: &str) -> String {
    quoted(command)
}

/// `["a","b"]`, or an empty string when there are no args.
pub fn command_args(args: &[String]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let quoted_args: Vec<String> = args.iter().map(|a| quoted(a)).collect();
    format!("[{}]", quoted_args.join(","))
}

/// `"cmd" ["a","b"]`
pub fn invocation(spec: &ProcessSpec) -> String {
    let args = command_args(&spec.args);
    if args.is_empty() {
        command_name(&spec.command)
    } else {
        format!("{} {args}", command_name(&spec.command))
    }
}

pub fn non_zero_exit_message(spec: &ProcessSpec, status: &ExitStatusInfo) -> String {
    let name = command_name(&spec.command);
    match status {
        ExitStatusInfo::Code(code) => format!("Process {name} exited with status code {code}"),
        ExitStatusInfo::Signal { name: signal, .. } => {
            format!("Process {name} was terminated by signal {signal}")
        }
    }
}

fn quoted(s: &str) -> String {
    format!("\"{s}\"")
}

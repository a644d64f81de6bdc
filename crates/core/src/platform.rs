//! Platform-specific command naming.

/// `<cmd>.cmd` on Windows, `cmd` elsewhere.
///
/// Script-based launchers installed by npm (e.g. `ts-node`) are `.cmd` shims
/// on Windows but extensionless executables on other platforms.
pub fn with_cmd_on_windows(base_cmd: &str) -> String {
    if cfg!(windows) {
        format!("{base_cmd}.cmd")
    } else {
        base_cmd.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn unchanged_off_windows() {
        assert_eq!(with_cmd_on_windows("ts-node"), "ts-node");
    }

    #[cfg(windows)]
    #[test]
    fn cmd_suffix_on_windows() {
        assert_eq!(with_cmd_on_windows("ts-node"), "ts-node.cmd");
    }
}

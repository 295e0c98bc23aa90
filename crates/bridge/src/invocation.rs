//! Per-call options and tool command-line construction.

use std::{path::PathBuf, time::Duration};

use crate::{
    capability::{self, Capability},
    sanitize::shell_escape,
};

/// Per-call options for [`crate::Bridge::execute`].
///
/// A closed set: every recognized option is a named field, so there is
/// nothing for the bridge to silently ignore.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Start a fresh session even if one exists for the user.
    pub new_session: bool,
    /// Working-directory override; must lie inside the configured root.
    pub working_dir: Option<PathBuf>,
    /// Capability override; `None` means the bridge's default set.
    pub capabilities: Option<Vec<Capability>>,
    /// System-level instruction appended to the tool's own.
    pub append_system_prompt: Option<String>,
    /// Timeout override; `None` means the configured default.
    pub timeout: Option<Duration>,
}

/// Compose the tool command line.
///
/// `prompt` must already be sanitized; shell escaping happens here so
/// every interpolated value goes through it, including the resume token,
/// which originates from tool output and is still treated as untrusted.
pub fn build_command_line(
    tool: &str,
    prompt: &str,
    capabilities: &[Capability],
    append_system_prompt: Option<&str>,
    resume: Option<&str>,
) -> String {
    let mut cmd = format!(
        "{tool} -p \"{}\" --output-format json --allowedTools \"{}\"",
        shell_escape(prompt),
        capability::to_csv(capabilities),
    );
    if let Some(sys) = append_system_prompt {
        cmd.push_str(&format!(" --append-system-prompt \"{}\"", shell_escape(sys)));
    }
    if let Some(token) = resume {
        cmd.push_str(&format!(" --resume \"{}\"", shell_escape(token)));
    }
    cmd
}

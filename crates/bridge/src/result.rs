//! Invocation results and tool-output parsing.

use std::time::Duration;

use serde::Serialize;

/// Outcome of one bridge invocation, success or failure.
///
/// Invariant: `success == false` implies `output` is empty and `error` is
/// set; `success == true` implies `error` is `None`.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    pub success: bool,
    pub output: String,
    pub session_id: Option<String>,
    pub error: Option<String>,
    /// Wall-clock time for the whole operation, success or failure.
    pub elapsed: Duration,
}

impl InvocationResult {
    pub(crate) fn completed(
        output: String,
        session_id: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: true,
            output,
            session_id,
            error: None,
            elapsed,
        }
    }

    pub(crate) fn failed(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            output: String::new(),
            session_id: None,
            error: Some(error.into()),
            elapsed,
        }
    }
}

/// Recognized content fields, in priority order.
const CONTENT_FIELDS: &[&str] = &["result", "content", "response"];
/// Recognized session-token fields, in priority order.
const SESSION_FIELDS: &[&str] = &["sessionId", "session_id"];

/// Parsed tool stdout.
#[derive(Debug)]
pub struct ParsedOutput {
    pub content: String,
    pub session_id: Option<String>,
    /// True when stdout was not JSON and the raw text was used as-is.
    /// A recovered condition, not an error — the tool's output contract
    /// is not guaranteed stable.
    pub degraded: bool,
}

/// Extract content and session token from tool stdout. Non-JSON output
/// falls back to the raw text with no token.
pub fn parse_tool_output(stdout: &str) -> ParsedOutput {
    match serde_json::from_str::<serde_json::Value>(stdout) {
        Ok(value) => {
            let content = CONTENT_FIELDS
                .iter()
                .find_map(|f| value.get(f).and_then(|v| v.as_str()))
                .map(str::to_string)
                .unwrap_or_else(|| stdout.to_string());
            let session_id = SESSION_FIELDS
                .iter()
                .find_map(|f| value.get(f).and_then(|v| v.as_str()))
                .map(str::to_string);
            ParsedOutput {
                content,
                session_id,
                degraded: false,
            }
        },
        Err(_) => ParsedOutput {
            content: stdout.to_string(),
            session_id: None,
            degraded: true,
        },
    }
}

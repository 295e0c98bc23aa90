//! Config schema types (bridge invocation defaults and routing patterns).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoworkConfig {
    pub bridge: BridgeConfig,
    pub routing: RoutingConfig,
}

/// Defaults for invoking the external agentic tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// The external tool's command name or path.
    pub command: String,
    /// Default invocation timeout in seconds.
    pub timeout_secs: u64,
    /// Cap on captured stdout/stderr, in bytes. Output past the cap is
    /// discarded, not buffered.
    pub max_output_bytes: usize,
    /// Default capability names granted to the tool. Empty means the
    /// bridge's built-in default set (all capabilities).
    pub default_capabilities: Vec<String>,
    /// Default working directory for the tool. When set, it also acts as
    /// the permitted root: per-call overrides must point inside it.
    pub working_dir: Option<PathBuf>,
    /// User ids allowed to invoke the tool. Empty means everyone.
    pub allowed_users: Vec<String>,
    /// Advisory per-user rate limit. The bridge is purely reactive and
    /// does not queue; enforcement belongs to the transport layer.
    pub max_requests_per_minute: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            command: "claude".into(),
            timeout_secs: 300,
            max_output_bytes: 1024 * 1024,
            default_capabilities: Vec::new(),
            working_dir: None,
            allowed_users: Vec::new(),
            max_requests_per_minute: 10,
        }
    }
}

/// Trigger patterns deciding which messages escalate to the agentic tool.
///
/// Patterns are regular expressions matched case-insensitively against the
/// message text. Empty lists fall back to the built-in pattern sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Messages matching any of these are escalated to the agent
    /// (unless a direct pattern also matches).
    pub agent_patterns: Vec<String>,
    /// Messages matching any of these are always handled directly,
    /// regardless of agent patterns.
    pub direct_patterns: Vec<String>,
    /// Where messages matching neither set go. Defaults to direct
    /// handling.
    pub default_to_agent: bool,
}

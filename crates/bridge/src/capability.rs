//! The fixed enumeration of permission scopes the external tool accepts.

use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// One permission scope passed to the tool via its allowed-tools flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Read,
    Write,
    Edit,
    Bash,
    Glob,
    Grep,
    WebFetch,
    WebSearch,
}

/// The default grant: everything the tool supports.
pub const DEFAULT_CAPABILITIES: &[Capability] = &[
    Capability::Read,
    Capability::Write,
    Capability::Edit,
    Capability::Bash,
    Capability::Glob,
    Capability::Grep,
    Capability::WebFetch,
    Capability::WebSearch,
];

/// Read-only grant for untrusted callers: no writes, no shell.
pub const SAFE_CAPABILITIES: &[Capability] = &[
    Capability::Read,
    Capability::Glob,
    Capability::Grep,
    Capability::WebSearch,
];

impl Capability {
    /// The name the external tool expects on its command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Edit => "Edit",
            Self::Bash => "Bash",
            Self::Glob => "Glob",
            Self::Grep => "Grep",
            Self::WebFetch => "WebFetch",
            Self::WebSearch => "WebSearch",
        }
    }

    /// Parse a configured capability list. Unknown names are rejected,
    /// never dropped; an empty list is rejected too.
    pub fn parse_set(names: &[String]) -> Result<Vec<Capability>> {
        if names.is_empty() {
            return Err(Error::EmptyCapabilities);
        }
        names.iter().map(|n| n.parse()).collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "edit" => Ok(Self::Edit),
            "bash" => Ok(Self::Bash),
            "glob" => Ok(Self::Glob),
            "grep" => Ok(Self::Grep),
            "webfetch" => Ok(Self::WebFetch),
            "websearch" => Ok(Self::WebSearch),
            _ => Err(Error::UnknownCapability(s.to_string())),
        }
    }
}

/// Comma-joined capability names for the tool's allowed-tools flag.
pub fn to_csv(capabilities: &[Capability]) -> String {
    capabilities
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

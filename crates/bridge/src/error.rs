use std::{path::PathBuf, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("prompt is empty after sanitization")]
    EmptyPrompt,

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user {0} is not on the allowlist")]
    UserNotAllowed(String),

    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    #[error("capability set must not be empty")]
    EmptyCapabilities,

    #[error("working directory {dir} is outside the permitted root {root}")]
    WorkingDirNotPermitted { dir: PathBuf, root: PathBuf },

    #[error("invalid sanitizer pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to spawn tool process: {0}")]
    Spawn(std::io::Error),

    #[error("tool process i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("execution timed out after {0:?}")]
    Timeout(Duration),

    #[error("execution terminated by cancel")]
    Cancelled,

    #[error("tool exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

pub type Result<T> = std::result::Result<T, Error>;

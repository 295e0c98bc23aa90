use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// One user's continuity context with the external tool.
///
/// Held in memory only; sessions do not survive a restart of the bridge
/// process.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Token issued by the tool. Replaced whenever the tool issues a new
    /// one, e.g. after a forced fresh session.
    pub session_id: String,
    /// Milliseconds since the Unix epoch.
    pub started_at: u64,
    pub last_activity: u64,
    pub message_count: u32,
}

impl Session {
    pub(crate) fn new(session_id: String) -> Self {
        let now = now_ms();
        Self {
            session_id,
            started_at: now,
            last_activity: now,
            message_count: 1,
        }
    }

    /// Record another exchange: refresh the token and activity time.
    pub(crate) fn touch(&mut self, session_id: String) {
        self.session_id = session_id;
        self.last_activity = now_ms();
        self.message_count += 1;
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

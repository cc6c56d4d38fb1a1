use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the dictation state, as rendered by a UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Whether a session is currently expected to be live
    pub is_recording: bool,

    /// Finalized text followed by the current interim fragment
    pub transcript: String,

    /// Latest user-facing error message, if any
    pub error: Option<String>,

    /// Id of the live session
    pub session_id: Option<String>,

    /// When the live session started
    pub started_at: Option<DateTime<Utc>>,

    /// Milliseconds since the live session started (diagnostic only)
    pub elapsed_ms: Option<i64>,
}

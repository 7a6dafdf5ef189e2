use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed (or still open) session row as the record-keeping service
/// returns it. The service owns these; locally they are read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: i64,
    pub start_time: DateTime<Utc>,
    /// Absent until the session has been ended.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Duration string in the service's `[D.]HH:MM:SS[.fraction]` shape.
    #[serde(default)]
    pub focus_time: Option<String>,
    #[serde(default)]
    pub break_time: Option<String>,
}

impl SessionRecord {
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }
}

pub mod client;

pub use client::ApiClient;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SessionRecord;

/// Boundary to the remote record-keeping service.
///
/// One method per endpoint. Implementations either yield parsed data or fail
/// with a human-readable message; callers treat them as a black box.
#[async_trait]
pub trait FocusApi: Send + Sync {
    /// Begin a focus session for the user.
    async fn start_focus(&self, user_id: i64) -> Result<()>;

    /// Begin a break within the active session.
    async fn start_break(&self, user_id: i64) -> Result<()>;

    /// End the current break.
    async fn end_break(&self, user_id: i64) -> Result<()>;

    /// End the active session.
    async fn end_focus(&self, user_id: i64) -> Result<()>;

    /// Fetch the user's completed sessions.
    async fn fetch_history(&self, user_id: i64) -> Result<Vec<SessionRecord>>;
}

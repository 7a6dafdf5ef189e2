use std::sync::Arc;

use anyhow::Result;
use log::info;
use tokio::sync::Mutex;

use crate::api::FocusApi;
use crate::models::SessionRecord;

/// Cache of the most recent full snapshot of completed sessions.
///
/// `None` means no refresh has succeeded yet; `Some(vec![])` means the user
/// genuinely has no completed sessions. A refresh replaces the whole
/// snapshot; there is no merging with prior contents, and concurrent
/// refreshes are the caller's problem to serialize. Last successful refresh
/// wins.
#[derive(Clone, Default)]
pub struct HistoryStore {
    records: Arc<Mutex<Option<Vec<SessionRecord>>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the complete session list and swap it in. Returns the number of
    /// sessions on success; on failure the previous snapshot stays.
    pub async fn refresh(&self, api: &dyn FocusApi, user_id: i64) -> Result<usize> {
        let sessions = api.fetch_history(user_id).await?;
        let count = sessions.len();
        *self.records.lock().await = Some(sessions);
        info!("history refreshed: {count} sessions");
        Ok(count)
    }

    pub async fn snapshot(&self) -> Option<Vec<SessionRecord>> {
        self.records.lock().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.records.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;

    /// Serves a scripted sequence of history responses.
    struct ScriptedApi {
        responses: StdMutex<VecDeque<Result<Vec<SessionRecord>>>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<Vec<SessionRecord>>>) -> Self {
            Self {
                responses: StdMutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl FocusApi for ScriptedApi {
        async fn start_focus(&self, _user_id: i64) -> Result<()> {
            Ok(())
        }

        async fn start_break(&self, _user_id: i64) -> Result<()> {
            Ok(())
        }

        async fn end_break(&self, _user_id: i64) -> Result<()> {
            Ok(())
        }

        async fn end_focus(&self, _user_id: i64) -> Result<()> {
            Ok(())
        }

        async fn fetch_history(&self, _user_id: i64) -> Result<Vec<SessionRecord>> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted response left")))
        }
    }

    fn record(id: i64) -> SessionRecord {
        SessionRecord {
            session_id: id,
            start_time: Utc::now(),
            end_time: Some(Utc::now()),
            focus_time: Some("00:25:00".into()),
            break_time: Some("00:05:00".into()),
        }
    }

    #[tokio::test]
    async fn unloaded_is_distinct_from_empty() {
        let store = HistoryStore::new();
        assert!(!store.is_loaded().await);
        assert!(store.snapshot().await.is_none());

        let api = ScriptedApi::new(vec![Ok(Vec::new())]);
        store.refresh(&api, 1).await.unwrap();

        assert!(store.is_loaded().await);
        assert_eq!(store.snapshot().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn refresh_replaces_the_whole_snapshot() {
        let store = HistoryStore::new();
        let api = ScriptedApi::new(vec![
            Ok(vec![record(1), record(2)]),
            Ok(vec![record(3)]),
        ]);

        assert_eq!(store.refresh(&api, 1).await.unwrap(), 2);
        assert_eq!(store.refresh(&api, 1).await.unwrap(), 1);

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].session_id, 3);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_snapshot() {
        let store = HistoryStore::new();
        let api = ScriptedApi::new(vec![
            Ok(vec![record(1)]),
            Err(anyhow!("service unreachable")),
        ]);

        store.refresh(&api, 1).await.unwrap();
        store.refresh(&api, 1).await.unwrap_err();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].session_id, 1);
    }
}

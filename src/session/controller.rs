use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{error, info};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::api::FocusApi;
use crate::history::HistoryStore;

use super::state::{ControllerState, Lifecycle};
use super::stopwatch::StopwatchClock;

/// The session state machine.
///
/// Owns the controller state, the stopwatch ticker and the history trigger.
/// Every transition is pessimistic: the remote call must resolve before any
/// local state is committed, and a failure leaves the lifecycle exactly
/// where it was, with the failure message parked in `last_error`.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<ControllerState>>,
    api: Arc<dyn FocusApi>,
    history: HistoryStore,
    stopwatch: Arc<Mutex<StopwatchClock>>,
    events: watch::Sender<ControllerState>,
    shutdown: CancellationToken,
    user_id: i64,
}

impl SessionController {
    pub fn new(api: Arc<dyn FocusApi>, history: HistoryStore, user_id: i64) -> Self {
        let (events, _) = watch::channel(ControllerState::new());
        Self {
            state: Arc::new(Mutex::new(ControllerState::new())),
            api,
            history,
            stopwatch: Arc::new(Mutex::new(StopwatchClock::new())),
            events,
            shutdown: CancellationToken::new(),
            user_id,
        }
    }

    pub async fn get_state(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    /// Observe state changes without polling. The receiver yields a full
    /// snapshot on every commit, tick and recorded failure.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.events.subscribe()
    }

    /// Start a new focus session. Requires `Idle`.
    pub async fn start_focus(&self) -> Result<ControllerState> {
        self.begin_attempt(&[Lifecycle::Idle], "a session is already running")
            .await?;

        match self.guarded(self.api.start_focus(self.user_id)).await {
            Ok(()) => {
                let snapshot = {
                    let mut state = self.state.lock().await;
                    state.begin_focus();
                    state.busy = false;
                    state.clone()
                };
                self.stopwatch
                    .lock()
                    .await
                    .start(self.state.clone(), self.events.clone());
                self.emit(&snapshot);
                info!("focus session started for user {}", self.user_id);
                Ok(snapshot)
            }
            Err(err) => self.record_failure(err).await,
        }
    }

    /// Pause the running focus session. Requires `Focusing`.
    pub async fn start_break(&self) -> Result<ControllerState> {
        self.begin_attempt(&[Lifecycle::Focusing], "no running focus session to pause")
            .await?;

        match self.guarded(self.api.start_break(self.user_id)).await {
            Ok(()) => {
                let snapshot = {
                    let mut state = self.state.lock().await;
                    state.begin_break();
                    state.busy = false;
                    state.clone()
                };
                // The ticker must not outlive the transition away from Focusing.
                self.stopwatch.lock().await.stop().await?;
                self.emit(&snapshot);
                info!("break started");
                Ok(snapshot)
            }
            Err(err) => self.record_failure(err).await,
        }
    }

    /// Resume focusing after a break. Requires `OnBreak`. The counter picks
    /// up where it froze; only a new session resets it.
    pub async fn end_break(&self) -> Result<ControllerState> {
        self.begin_attempt(&[Lifecycle::OnBreak], "no break to end")
            .await?;

        match self.guarded(self.api.end_break(self.user_id)).await {
            Ok(()) => {
                let snapshot = {
                    let mut state = self.state.lock().await;
                    state.resume_focus();
                    state.busy = false;
                    state.clone()
                };
                self.stopwatch
                    .lock()
                    .await
                    .start(self.state.clone(), self.events.clone());
                self.emit(&snapshot);
                info!("break ended");
                Ok(snapshot)
            }
            Err(err) => self.record_failure(err).await,
        }
    }

    /// End the active session, from focus or from a break. On success the
    /// history refresh is triggered exactly once; a refresh failure surfaces
    /// as `last_error` but never reverts the committed `Idle` state.
    pub async fn end_focus(&self) -> Result<ControllerState> {
        self.begin_attempt(
            &[Lifecycle::Focusing, Lifecycle::OnBreak],
            "no active session to end",
        )
        .await?;

        match self.guarded(self.api.end_focus(self.user_id)).await {
            Ok(()) => {
                let snapshot = {
                    let mut state = self.state.lock().await;
                    state.finish();
                    state.busy = false;
                    state.clone()
                };
                self.stopwatch.lock().await.stop().await?;
                self.emit(&snapshot);
                info!("focus session ended for user {}", self.user_id);

                if let Err(err) = self.refresh_history().await {
                    error!("history refresh after session end failed: {err:#}");
                }

                Ok(self.get_state().await)
            }
            Err(err) => self.record_failure(err).await,
        }
    }

    /// Reload the history snapshot. Also runs standalone, outside the
    /// lifecycle transitions, so it clears and records `last_error` itself.
    pub async fn refresh_history(&self) -> Result<usize> {
        {
            let mut state = self.state.lock().await;
            state.last_error = None;
            self.emit(&state);
        }

        match self
            .guarded(self.history.refresh(self.api.as_ref(), self.user_id))
            .await
        {
            Ok(count) => Ok(count),
            Err(err) => {
                let mut state = self.state.lock().await;
                state.last_error = Some(format!("{err:#}"));
                self.emit(&state);
                Err(err)
            }
        }
    }

    /// Tear down the controller: stop the ticker and abandon any in-flight
    /// remote call without committing its transition.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();
        self.stopwatch.lock().await.stop().await
    }

    /// Precondition gate shared by all transitions: reject when busy or in
    /// the wrong lifecycle, otherwise claim the busy flag and clear the
    /// previous error. Check-and-set happens under the state lock, so two
    /// near-simultaneous calls cannot both pass.
    async fn begin_attempt(&self, allowed: &[Lifecycle], denial: &'static str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.busy {
            return Err(anyhow!("another request is still in flight"));
        }
        if !allowed.contains(&state.lifecycle) {
            return Err(anyhow!(denial));
        }
        state.busy = true;
        state.last_error = None;
        self.emit(&state);
        Ok(())
    }

    /// Race a remote call against controller shutdown.
    async fn guarded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            result = call => result,
            () = self.shutdown.cancelled() => Err(anyhow!("controller was shut down")),
        }
    }

    /// A transport failure: park the message, release the busy flag, leave
    /// the lifecycle untouched.
    async fn record_failure(&self, err: anyhow::Error) -> Result<ControllerState> {
        error!("remote call failed: {err:#}");
        {
            let mut state = self.state.lock().await;
            state.busy = false;
            state.last_error = Some(format!("{err:#}"));
            self.emit(&state);
        }
        Err(err)
    }

    fn emit(&self, state: &ControllerState) {
        let _ = self.events.send(state.clone());
    }
}

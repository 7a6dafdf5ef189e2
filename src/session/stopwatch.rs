use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;

use super::state::{ControllerState, Lifecycle};

/// Cancellable 1 Hz ticker behind the live elapsed-focus display.
///
/// The worker holds no state of its own; it increments the shared counter
/// under the state lock and exits as soon as the observed lifecycle is no
/// longer `Focusing`, so a tick that lost the race with a transition never
/// lands an increment.
pub struct StopwatchClock {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    tick_interval: Duration,
}

impl StopwatchClock {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Spawn the ticker. Any previous ticker is torn down first so two
    /// workers can never double-count.
    pub fn start(
        &mut self,
        state: Arc<Mutex<ControllerState>>,
        events: watch::Sender<ControllerState>,
    ) {
        self.cancel();

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(tick_loop(state, events, token, tick_interval));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }

    /// Idempotent; safe to call with no ticker running. The worker exits on
    /// its own once it observes the cancellation.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }

    /// Cancel and wait for the worker to finish.
    pub async fn stop(&mut self) -> Result<()> {
        self.cancel();

        if let Some(handle) = self.handle.take() {
            handle.await.context("stopwatch ticker failed to join")?;
        }
        Ok(())
    }
}

impl Default for StopwatchClock {
    fn default() -> Self {
        Self::new()
    }
}

async fn tick_loop(
    state: Arc<Mutex<ControllerState>>,
    events: watch::Sender<ControllerState>,
    cancel_token: CancellationToken,
    tick_interval: Duration,
) {
    let mut ticker = time::interval(tick_interval);
    // The first interval tick completes immediately; consume it so the first
    // increment lands a full period after start.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = {
                    let mut guard = state.lock().await;
                    if guard.lifecycle != Lifecycle::Focusing {
                        break;
                    }
                    guard.tick();
                    guard.clone()
                };
                let _ = events.send(snapshot);
            }
            _ = cancel_token.cancelled() => {
                break;
            }
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    Idle,
    Focusing,
    OnBreak,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Idle
    }
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Idle => "Idle",
            Lifecycle::Focusing => "Focusing",
            Lifecycle::OnBreak => "OnBreak",
        }
    }
}

/// The controller's entire observable state. Transient, never persisted,
/// mutated only through the methods below and the controller's busy/error
/// bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub lifecycle: Lifecycle,
    pub stopwatch_seconds: u64,
    pub busy: bool,
    pub last_error: Option<String>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            stopwatch_seconds: 0,
            busy: false,
            last_error: None,
        }
    }
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new focus session begins; the counter resets here and only here.
    pub fn begin_focus(&mut self) {
        self.lifecycle = Lifecycle::Focusing;
        self.stopwatch_seconds = 0;
    }

    /// The counter is frozen, not reset, for the duration of the break.
    pub fn begin_break(&mut self) {
        self.lifecycle = Lifecycle::OnBreak;
    }

    pub fn resume_focus(&mut self) {
        self.lifecycle = Lifecycle::Focusing;
    }

    pub fn finish(&mut self) {
        self.lifecycle = Lifecycle::Idle;
    }

    /// One elapsed second. Counts only while focusing.
    pub fn tick(&mut self) {
        if self.lifecycle == Lifecycle::Focusing {
            self.stopwatch_seconds = self.stopwatch_seconds.saturating_add(1);
        }
    }
}

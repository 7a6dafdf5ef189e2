pub mod controller;
pub mod state;
pub mod stopwatch;

pub use controller::SessionController;
pub use state::{ControllerState, Lifecycle};
pub use stopwatch::StopwatchClock;

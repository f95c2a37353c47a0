//! Timer state snapshot handed out to clients

use serde::{Deserialize, Serialize};

use super::{RunState, TimerEngine};
use crate::utils::format_display;

/// Point-in-time view of the countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub duration_seconds: Option<u64>,
    pub remaining_seconds: u64,
    pub run_state: RunState,
    /// Remaining time rendered as `MM : SS`
    pub display: String,
    pub start_label: String,
}

impl TimerState {
    /// Capture the current state of an engine
    pub fn from_engine(engine: &TimerEngine) -> Self {
        let run_state = engine.run_state();
        Self {
            duration_seconds: engine.duration(),
            remaining_seconds: engine.remaining(),
            run_state,
            display: format_display(engine.remaining()),
            start_label: run_state.start_label().to_string(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::from_engine(&TimerEngine::new())
    }
}

//! Run state of the countdown

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three states a countdown can be in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Initial state, and the state after a reset or natural expiry
    #[default]
    Idle,
    /// Counting down, a tick source is alive
    Running,
    /// Stopped mid-countdown, waiting for a resume
    Paused,
}

impl RunState {
    /// Lowercase name, as used in JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }

    /// Label of the start button for this state
    pub fn start_label(&self) -> &'static str {
        match self {
            RunState::Paused => "Resume",
            _ => "Start",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

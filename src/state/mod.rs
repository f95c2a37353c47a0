//! State management module
//!
//! This module contains the countdown state machine and the shared state that owns it.

pub mod app_state;
pub mod engine;
pub mod run_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{TickAction, TimerEngine};
pub use run_state::RunState;
pub use timer_state::TimerState;

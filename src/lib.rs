//! Countdown Timer - A countdown with a local HTTP control surface
//!
//! This library provides the countdown state machine, the shared state that owns it
//! together with its one-per-second tick task, and the HTTP endpoints that drive it.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, RunState, TimerState};
pub use api::create_router;
pub use utils::{format_display, shutdown_signal};

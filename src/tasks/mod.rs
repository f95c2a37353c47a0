//! Background tasks module
//!
//! This module contains the tick task that drives a running countdown.

pub mod tick;

// Re-export main types
pub use tick::{TickHandle, TICK_PERIOD};

//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{RunState, TimerState};

/// API response structure for timer action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Run state after the action was handled
    pub status: RunState,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response for `action`
    pub fn new(action: &str, timer: TimerState) -> Self {
        Self {
            status: timer.run_state,
            action: action.to_string(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    /// Whether a tick task is currently alive
    pub tick_source_active: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

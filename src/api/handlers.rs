//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::state::{AppState, TimerState};
use super::{
    input::parse_duration_input,
    responses::{ApiResponse, HealthResponse, StatusResponse},
};

fn respond(action: &str, result: Result<TimerState, String>) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => {
            info!("{} endpoint called - timer {} at {}", action, timer.run_state, timer.display);
            Ok(Json(ApiResponse::new(action, timer)))
        }
        Err(e) => {
            error!("Failed to handle {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /set - Set the countdown duration
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse>, StatusCode> {
    // A body that is not text is just another unset duration
    let seconds = std::str::from_utf8(&body).ok().and_then(parse_duration_input);
    respond("set", state.set_duration(seconds))
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("start", state.start())
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("pause", state.pause())
}

/// Handle POST /reset - Reset the countdown
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("reset", state.reset())
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let tick_source_active = match state.has_tick_source() {
        Ok(active) => active,
        Err(e) => {
            error!("Failed to inspect tick source: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        tick_source_active,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every timer update as a server-sent event
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let timer_rx = state.subscribe();

    // The first item is the current state, then one item per change
    let events = stream::unfold((timer_rx, true), |(mut timer_rx, first)| async move {
        if !first && timer_rx.changed().await.is_err() {
            return None;
        }

        let timer = timer_rx.borrow_and_update().clone();
        let event = Event::default()
            .event("timer")
            .json_data(&timer)
            .unwrap_or_else(|e| {
                warn!("Failed to serialize timer event: {}", e);
                Event::default().comment("unserializable timer state")
            });

        Some((Ok::<_, Infallible>(event), (timer_rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

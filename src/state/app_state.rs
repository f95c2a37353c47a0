//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::{TickAction, TimerEngine, TimerState};
use crate::{tasks::TickHandle, utils::format_uptime};

/// The engine and its tick source. They are only ever touched under one lock, so a
/// transition and the matching acquire/release happen together.
#[derive(Debug, Default)]
struct Session {
    engine: TimerEngine,
    tick: Option<TickHandle>,
}

/// Main application state that owns the countdown
#[derive(Debug)]
pub struct AppState {
    session: Mutex<Session>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last applied action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    timer_update_tx: watch::Sender<TimerState>,
}

impl AppState {
    /// Create a new AppState with an idle, unset countdown
    pub fn new(port: u16, host: String) -> Self {
        let (timer_update_tx, _) = watch::channel(TimerState::default());

        Self {
            session: Mutex::new(Session::default()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, String> {
        self.session
            .lock()
            .map_err(|e| format!("Failed to lock timer session: {}", e))
    }

    /// Run a transition on the engine and apply its tick action under the same lock
    fn update_timer<F>(self: &Arc<Self>, action: &str, transition: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut TimerEngine) -> Option<TickAction>,
    {
        let mut session = self.lock_session()?;

        let Some(tick_action) = transition(&mut session.engine) else {
            debug!("Ignoring {} while {}", action, session.engine.run_state());
            return Ok(TimerState::from_engine(&session.engine));
        };

        self.apply_tick_action(&mut session, tick_action);
        let timer_state = TimerState::from_engine(&session.engine);
        self.timer_update_tx.send_replace(timer_state.clone());
        drop(session); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(timer_state)
    }

    fn apply_tick_action(self: &Arc<Self>, session: &mut Session, tick_action: TickAction) {
        match tick_action {
            TickAction::Acquire(generation) => {
                // Dropping a handle aborts its task
                drop(session.tick.take());
                session.tick = Some(TickHandle::spawn(Arc::clone(self), generation));
                debug!("Acquired tick source (generation {})", generation);
            }
            TickAction::Release => {
                if let Some(tick) = session.tick.take() {
                    debug!("Released tick source (generation {})", tick.generation());
                }
            }
            TickAction::Keep => {}
        }
    }

    /// Set the countdown duration. `None` stands for input that was not a number.
    pub fn set_duration(self: &Arc<Self>, seconds: Option<i64>) -> Result<TimerState, String> {
        info!("Setting duration to: {:?}", seconds);
        self.update_timer("set", |engine| seconds.and_then(|s| engine.set_duration(s)))
    }

    /// Start or resume the countdown
    pub fn start(self: &Arc<Self>) -> Result<TimerState, String> {
        info!("Starting countdown");
        self.update_timer("start", TimerEngine::start)
    }

    /// Pause a running countdown
    pub fn pause(self: &Arc<Self>) -> Result<TimerState, String> {
        info!("Pausing countdown");
        self.update_timer("pause", TimerEngine::pause)
    }

    /// Stop the countdown and restore the configured duration
    pub fn reset(self: &Arc<Self>) -> Result<TimerState, String> {
        info!("Resetting countdown");
        self.update_timer("reset", |engine| Some(engine.reset()))
    }

    /// Feed one tick from the source tagged `generation`.
    ///
    /// Returns whether that source should keep ticking.
    pub fn on_tick(self: &Arc<Self>, generation: u64) -> bool {
        let mut session = match self.lock_session() {
            Ok(session) => session,
            Err(e) => {
                error!("{}", e);
                return false;
            }
        };

        let Some(tick_action) = session.engine.on_tick(generation) else {
            debug!("Discarding stale tick (generation {})", generation);
            return false;
        };

        self.apply_tick_action(&mut session, tick_action);
        let timer_state = TimerState::from_engine(&session.engine);
        self.timer_update_tx.send_replace(timer_state.clone());
        drop(session);

        if timer_state.is_running() {
            debug!("Tick: {} remaining", timer_state.display);
        } else {
            info!("Countdown finished");
        }
        timer_state.is_running()
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.lock_session()
            .map(|session| TimerState::from_engine(&session.engine))
    }

    /// Whether a tick source is currently held, reported by GET /status
    pub fn has_tick_source(&self) -> Result<bool, String> {
        self.lock_session().map(|session| session.tick.is_some())
    }

    /// Watch every published timer state, starting from the latest one
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

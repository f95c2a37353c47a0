//! Countdown tick source

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::state::AppState;

/// Interval between two ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Ownership of the one running tick task. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Spawn a tick task for `generation`. The first tick fires one period from now.
    pub fn spawn(state: Arc<AppState>, generation: u64) -> Self {
        let first_tick = Instant::now() + TICK_PERIOD;
        let task = tokio::spawn(countdown_tick_task(state, generation, first_tick));
        Self { generation, task }
    }

    /// Generation this tick source was acquired for
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Background task that ticks the countdown once per period until told to stop
async fn countdown_tick_task(state: Arc<AppState>, generation: u64, first_tick: Instant) {
    debug!("Starting tick task (generation {})", generation);

    let mut interval = interval_at(first_tick, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if !state.on_tick(generation) {
            break;
        }
    }

    debug!("Tick task finished (generation {})", generation);
}

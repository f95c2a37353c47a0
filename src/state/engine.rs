//! Countdown state machine
//!
//! The engine is synchronous and knows nothing about tasks or clocks. Every mutator
//! reports what has to happen to the tick source as a [`TickAction`], and the owner
//! applies it while still holding whatever lock guards the engine.

use super::RunState;

/// What the owner of an engine must do with its tick source after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Drop any current tick source and spawn one tagged with this generation
    Acquire(u64),
    /// Drop the current tick source, if any
    Release,
    /// Leave the tick source as it is
    Keep,
}

/// Duration, remaining time and run state of a single countdown
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    duration: Option<u64>,
    remaining: u64,
    run_state: RunState,
    /// Bumped on every acquire and release, so ticks from an old source can be told apart
    generation: u64,
}

impl TimerEngine {
    /// Create an idle engine with no duration set
    pub fn new() -> Self {
        Self::default()
    }

    /// Last duration applied by a set, if any
    pub fn duration(&self) -> Option<u64> {
        self.duration
    }

    /// Seconds left on the countdown
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Current run state
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Generation a tick must carry to be accepted
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set a new duration. Returns `None` if `seconds` is not positive.
    pub fn set_duration(&mut self, seconds: i64) -> Option<TickAction> {
        let seconds = u64::try_from(seconds).ok().filter(|&s| s > 0)?;

        self.duration = Some(seconds);
        self.remaining = seconds;
        self.run_state = RunState::Idle;
        Some(self.release())
    }

    /// Start or resume the countdown. Returns `None` if nothing is left to count down.
    pub fn start(&mut self) -> Option<TickAction> {
        if self.remaining == 0 {
            return None;
        }

        if self.run_state == RunState::Running {
            return Some(TickAction::Keep);
        }

        self.run_state = RunState::Running;
        self.generation = self.generation.wrapping_add(1);
        Some(TickAction::Acquire(self.generation))
    }

    /// Pause a running countdown. Returns `None` unless running.
    pub fn pause(&mut self) -> Option<TickAction> {
        if self.run_state != RunState::Running {
            return None;
        }

        self.run_state = RunState::Paused;
        Some(self.release())
    }

    /// Go back to the configured duration, or to zero if none was ever set
    pub fn reset(&mut self) -> TickAction {
        self.run_state = RunState::Idle;
        self.remaining = self.duration.unwrap_or(0);
        self.release()
    }

    /// Advance by one tick from the source tagged `generation`.
    ///
    /// Ticks that arrive while not running, or from a source that has since been
    /// released, are ignored and return `None`.
    pub fn on_tick(&mut self, generation: u64) -> Option<TickAction> {
        if self.run_state != RunState::Running || generation != self.generation {
            return None;
        }

        if self.remaining <= 1 {
            self.remaining = 0;
            self.run_state = RunState::Idle;
            return Some(self.release());
        }

        self.remaining -= 1;
        Some(TickAction::Keep)
    }

    fn release(&mut self) -> TickAction {
        self.generation = self.generation.wrapping_add(1);
        TickAction::Release
    }
}

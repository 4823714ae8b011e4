use tracing::{debug, info};

use crate::runtime::{Scheduler, TickHandle, TickId, TICK_PERIOD};

pub const DEFAULT_LIMIT_MINUTES: u32 = 25;
pub const MIN_LIMIT_MINUTES: u32 = 1;
const SECS_PER_MIN: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    Running,
    Paused,
}

/// What a tick did to the state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    Halted,
}

/// A user action on the widget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleRun,
    Reset,
    IncrementLimit,
    DecrementLimit,
}

/// Progress and configuration of the countdown.
///
/// `elapsed_seconds` never exceeds `limit_minutes * 60`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub is_running: bool,
    pub limit_minutes: u32,
    pub elapsed_seconds: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            is_running: false,
            limit_minutes: DEFAULT_LIMIT_MINUTES,
            elapsed_seconds: 0,
        }
    }
}

impl TimerState {
    pub fn limit_seconds(&self) -> u32 {
        self.limit_minutes.saturating_mul(SECS_PER_MIN)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.limit_seconds().saturating_sub(self.elapsed_seconds)
    }

    pub fn is_completed(&self) -> bool {
        self.elapsed_seconds == self.limit_seconds()
    }

    /// The limit may only change while the timer sits at its starting point
    pub fn limit_controls_enabled(&self) -> bool {
        self.elapsed_seconds == 0
    }

    pub fn status(&self) -> Status {
        if self.is_running {
            Status::Running
        } else {
            Status::Paused
        }
    }

    /// Remaining time as `MM:SS`
    pub fn format_remaining(&self) -> String {
        let remaining = self.remaining_seconds();
        format!(
            "{:02}:{:02}",
            remaining / SECS_PER_MIN,
            remaining % SECS_PER_MIN
        )
    }

    pub fn advance(&mut self) -> TickOutcome {
        if self.is_completed() {
            self.is_running = false;
            TickOutcome::Halted
        } else {
            self.elapsed_seconds += 1;
            TickOutcome::Advanced
        }
    }

    pub fn increment_limit(&mut self) {
        // saturate where the limit in seconds would no longer fit
        if self.limit_minutes < u32::MAX / SECS_PER_MIN {
            self.limit_minutes += 1;
        }
    }

    pub fn decrement_limit(&mut self) {
        if self.limit_minutes > MIN_LIMIT_MINUTES {
            self.limit_minutes -= 1;
        }
    }
}

/// The timer component: state plus the one periodic tick it may own.
pub struct TimerWidget<S: Scheduler> {
    state: TimerState,
    scheduler: S,
    interval: Option<S::Handle>,
}

impl<S: Scheduler> TimerWidget<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            state: TimerState::default(),
            scheduler,
            interval: None,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Id of the interval currently driving the timer
    pub fn active_tick(&self) -> Option<TickId> {
        self.interval.as_ref().map(|h| h.id())
    }

    pub fn toggle_run(&mut self) {
        if self.state.is_completed() {
            self.state.elapsed_seconds = 0;
        }

        if self.state.is_running {
            self.stop_interval();
            self.state.is_running = false;
            info!(elapsed = self.state.elapsed_seconds, "timer paused");
        } else {
            self.start_interval();
            self.state.is_running = true;
            info!(
                limit = self.state.limit_minutes,
                elapsed = self.state.elapsed_seconds,
                "timer started"
            );
        }
    }

    /// Delivers a tick. Ticks from an interval that is no longer active are dropped.
    /// Returns true if the state changed.
    pub fn on_tick(&mut self, id: TickId) -> bool {
        if self.active_tick() != Some(id) {
            debug!(tick = id.0, "stale tick ignored");
            return false;
        }

        match self.state.advance() {
            TickOutcome::Advanced => {
                debug!(elapsed = self.state.elapsed_seconds, "tick");
            }
            TickOutcome::Halted => {
                self.stop_interval();
                info!(limit = self.state.limit_minutes, "timer completed");
            }
        }
        true
    }

    pub fn reset(&mut self) {
        self.stop_interval();
        self.state = TimerState::default();
        info!("timer reset");
    }

    /// Returns false when rejected because the timer has progressed
    pub fn increment_limit(&mut self) -> bool {
        if !self.state.limit_controls_enabled() {
            return false;
        }
        let before = self.state.limit_minutes;
        self.state.increment_limit();
        self.state.limit_minutes != before
    }

    /// Returns false when rejected, or when already at the minimum limit
    pub fn decrement_limit(&mut self) -> bool {
        if !self.state.limit_controls_enabled() {
            return false;
        }
        let before = self.state.limit_minutes;
        self.state.decrement_limit();
        self.state.limit_minutes != before
    }

    /// Applies a user action, returning whether it changed anything
    pub fn dispatch(&mut self, action: Action) -> bool {
        let applied = match action {
            Action::ToggleRun => {
                self.toggle_run();
                true
            }
            Action::Reset => {
                self.reset();
                true
            }
            Action::IncrementLimit => self.increment_limit(),
            Action::DecrementLimit => self.decrement_limit(),
        };
        if matches!(action, Action::IncrementLimit | Action::DecrementLimit) {
            info!(?action, applied, limit = self.state.limit_minutes, "limit change");
        }
        applied
    }

    /// Cancels any active tick. Called when the widget goes away.
    pub fn teardown(&mut self) {
        if self.interval.is_some() {
            info!("canceling active tick on teardown");
        }
        self.stop_interval();
    }

    fn start_interval(&mut self) {
        self.stop_interval();
        self.interval = Some(self.scheduler.every(TICK_PERIOD));
    }

    fn stop_interval(&mut self) {
        if let Some(mut handle) = self.interval.take() {
            handle.cancel();
        }
    }
}

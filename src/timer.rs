//! Tick-based timers. All durations are counted in simulation ticks.

/// Duration of a timer that never expires on its own.
pub const INDEFINITE: u64 = u64::MAX;

/// The lifecycle of a [`TickTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Ready,
    Running,
    Stopped,
    Expired,
}

/// A countdown measured in ticks.
///
/// A running timer with duration `n` counts `n` ticks and expires on the following one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTimer {
    state: TimerState,
    duration: u64,
    tick_count: u64,
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TickTimer {
    pub fn new(duration: u64) -> Self {
        Self {
            state: TimerState::Ready,
            duration,
            tick_count: 0,
        }
    }

    /// Sets a new duration, clears the tick count and makes the timer ready.
    pub fn reset(&mut self, duration: u64) {
        self.duration = duration;
        self.tick_count = 0;
        self.state = TimerState::Ready;
    }

    pub fn reset_indefinite(&mut self) {
        self.reset(INDEFINITE);
    }

    /// Starts or resumes the timer. Has no effect on an expired timer.
    pub fn start(&mut self) {
        if matches!(self.state, TimerState::Ready | TimerState::Stopped) {
            self.state = TimerState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
        }
    }

    pub fn restart(&mut self, duration: u64) {
        self.reset(duration);
        self.start();
    }

    /// Advances a running timer by one tick.
    pub fn tick(&mut self) {
        if self.state == TimerState::Running {
            if self.tick_count == self.duration {
                self.state = TimerState::Expired;
            } else {
                self.tick_count += 1;
            }
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state == TimerState::Stopped
    }

    pub fn has_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks left until expiry, [`INDEFINITE`] for an unbounded timer.
    pub fn remaining(&self) -> u64 {
        if self.duration == INDEFINITE {
            INDEFINITE
        } else {
            self.duration.saturating_sub(self.tick_count)
        }
    }
}

/// A repeating on/off signal, used for the energizer blinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    ticks_per_phase: u32,
    counter: u32,
    on: bool,
    start_on: bool,
    running: bool,
}

impl Pulse {
    pub fn new(ticks_per_phase: u32, start_on: bool) -> Self {
        Self {
            ticks_per_phase: ticks_per_phase.max(1),
            counter: 0,
            on: start_on,
            start_on,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns to the initial phase and stops.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.on = self.start_on;
        self.running = false;
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.counter += 1;
        if self.counter == self.ticks_per_phase {
            self.counter = 0;
            self.on = !self.on;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

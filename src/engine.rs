//! Timer state machine.
//!
//! The engine owns the [`TimerState`] and performs every transition on it:
//! start, pause, reset, mode switch and the once-per-second tick. It knows
//! nothing about alarms, storage or sound; the [`crate::Timer`] controller
//! composes it with those.

use crate::config::MSG_ZERO_COUNTDOWN;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction the timer runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    CountDown,
    CountUp,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::CountDown => "COUNT DOWN",
            Mode::CountUp => "COUNT UP",
        }
    }
}

/// Coarse status used by the view to pick styles and enable buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerState {
    pub mode: Mode,
    pub elapsed_seconds: u32,
    /// Countdown start value, or the count-up limit (0 = unbounded).
    pub target_seconds: u32,
    pub running: bool,
    pub paused: bool,
    pub expired: bool,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Idle,
    Advanced(u32),
    /// Terminal value reached; the engine has stopped itself.
    Completed(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Countdown start requested with nothing to count down from.
    ZeroDuration,
    AlreadyRunning,
    NotRunning,
    /// Mode changes are refused while the timer is ticking.
    ModeLocked,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::ZeroDuration => write!(f, "Countdown duration must be greater than zero"),
            TimerError::AlreadyRunning => write!(f, "Timer is already running"),
            TimerError::NotRunning => write!(f, "Timer is not running"),
            TimerError::ModeLocked => write!(f, "Cannot switch mode while the timer is running"),
        }
    }
}

impl std::error::Error for TimerError {}

impl TimerError {
    /// Message for a blocking prompt, if the user needs to be told.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            TimerError::ZeroDuration => Some(MSG_ZERO_COUNTDOWN),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    pub fn new(mode: Mode) -> Self {
        Self {
            state: TimerState {
                mode,
                ..TimerState::default()
            },
        }
    }

    /// Rebuild an engine from a previously saved state.
    pub fn from_state(state: TimerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn elapsed(&self) -> u32 {
        self.state.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn status(&self) -> Status {
        let s = &self.state;
        if s.running {
            Status::Running
        } else if s.expired {
            Status::Expired
        } else if s.paused {
            Status::Paused
        } else {
            Status::Idle
        }
    }

    /// Start or resume ticking.
    ///
    /// `pending_seconds` is the duration currently entered by the user. It is
    /// only consulted on a fresh start (not paused, elapsed still at zero):
    /// in countdown mode it becomes both the start value and the target, in
    /// count-up mode it becomes the limit. A count-up that already reached its
    /// limit restarts from zero and also takes a non-zero pending limit.
    pub fn start(&mut self, pending_seconds: u32) -> Result<(), TimerError> {
        if self.state.running {
            return Err(TimerError::AlreadyRunning);
        }

        let fresh = !self.state.paused && self.state.elapsed_seconds == 0;
        match self.state.mode {
            Mode::CountDown => {
                let from = if fresh {
                    pending_seconds
                } else {
                    self.state.elapsed_seconds
                };
                if from == 0 {
                    return Err(TimerError::ZeroDuration);
                }
                if fresh {
                    self.state.elapsed_seconds = from;
                    self.state.target_seconds = from;
                }
            }
            Mode::CountUp => {
                let restart = self.reached_terminal();
                if restart {
                    self.state.elapsed_seconds = 0;
                }
                if (fresh || restart) && pending_seconds > 0 {
                    self.state.target_seconds = pending_seconds;
                }
            }
        }

        self.state.paused = false;
        self.state.expired = false;
        self.state.running = true;
        debug!(
            "Timer started: mode={:?} elapsed={} target={}",
            self.state.mode, self.state.elapsed_seconds, self.state.target_seconds
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        if !self.state.running {
            return Err(TimerError::NotRunning);
        }
        self.state.running = false;
        self.state.paused = true;
        debug!("Timer paused at {}", self.state.elapsed_seconds);
        Ok(())
    }

    /// Stop and zero everything except the mode.
    pub fn reset(&mut self) {
        self.state = TimerState {
            mode: self.state.mode,
            ..TimerState::default()
        };
    }

    pub fn switch_mode(&mut self, mode: Mode) -> Result<(), TimerError> {
        if self.state.running {
            return Err(TimerError::ModeLocked);
        }
        self.state.mode = mode;
        self.reset();
        Ok(())
    }

    /// Load a preset duration. A running timer is stopped first.
    pub fn apply_preset(&mut self, seconds: u32) {
        self.state.running = false;
        self.state.target_seconds = seconds;
        self.state.elapsed_seconds = match self.state.mode {
            Mode::CountDown => seconds,
            Mode::CountUp => 0,
        };
        self.state.paused = false;
        self.state.expired = false;
    }

    /// Clear the expired flag once the user has seen it.
    pub fn acknowledge(&mut self) {
        self.state.expired = false;
    }

    fn reached_terminal(&self) -> bool {
        let s = &self.state;
        match s.mode {
            Mode::CountDown => s.elapsed_seconds == 0,
            Mode::CountUp => s.target_seconds > 0 && s.elapsed_seconds >= s.target_seconds,
        }
    }

    fn complete(&mut self) {
        self.state.running = false;
        self.state.paused = false;
        self.state.expired = true;
        debug!("Timer completed at {}", self.state.elapsed_seconds);
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        let s = &mut self.state;
        s.elapsed_seconds = match s.mode {
            Mode::CountDown => s.elapsed_seconds.saturating_sub(1),
            Mode::CountUp => s.elapsed_seconds.saturating_add(1),
        };

        if self.reached_terminal() {
            self.complete();
            TickOutcome::Completed(self.state.elapsed_seconds)
        } else {
            TickOutcome::Advanced(self.state.elapsed_seconds)
        }
    }

    /// Advance a running timer by `seconds` that passed while nobody was
    /// ticking it, clamping at the terminal value.
    ///
    /// Returns `true` if the timer completed during the gap.
    pub fn catch_up(&mut self, seconds: u32) -> bool {
        if !self.state.running || seconds == 0 {
            return false;
        }

        let s = &mut self.state;
        s.elapsed_seconds = match s.mode {
            Mode::CountDown => s.elapsed_seconds.saturating_sub(seconds),
            Mode::CountUp if s.target_seconds > 0 => {
                s.elapsed_seconds.saturating_add(seconds).min(s.target_seconds)
            }
            Mode::CountUp => s.elapsed_seconds.saturating_add(seconds),
        };

        if self.reached_terminal() {
            self.complete();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(mode: Mode, pending: u32) -> TimerEngine {
        let mut engine = TimerEngine::new(mode);
        engine.start(pending).expect("start");
        engine
    }

    #[test]
    fn countdown_reaches_zero_after_target_ticks() {
        for target in [1, 2, 7, 60, 3_661] {
            let mut engine = started(Mode::CountDown, target);
            for _ in 1..target {
                assert!(matches!(engine.tick(), TickOutcome::Advanced(_)));
            }
            assert_eq!(engine.tick(), TickOutcome::Completed(0));
            assert_eq!(engine.elapsed(), 0);
            assert!(!engine.is_running());
            assert_eq!(engine.status(), Status::Expired);
        }
    }

    #[test]
    fn countdown_with_zero_duration_is_rejected() {
        let mut engine = TimerEngine::new(Mode::CountDown);
        assert_eq!(engine.start(0), Err(TimerError::ZeroDuration));
        assert!(!engine.is_running());
        assert_eq!(engine.status(), Status::Idle);
    }

    #[test]
    fn only_zero_duration_is_prompted() {
        assert!(TimerError::ZeroDuration.prompt().is_some());
        assert!(TimerError::ModeLocked.prompt().is_none());
    }

    #[test]
    fn acknowledge_clears_expired() {
        let mut engine = started(Mode::CountDown, 1);
        engine.tick();
        engine.acknowledge();
        assert_eq!(engine.status(), Status::Idle);
    }

    #[test]
    fn zero_start_after_finished_countdown_leaves_state_alone() {
        let mut engine = started(Mode::CountDown, 10);
        for _ in 0..10 {
            engine.tick();
        }
        let before = engine.state().clone();
        assert_eq!(before.target_seconds, 10);
        assert_eq!(engine.status(), Status::Expired);

        assert_eq!(engine.start(0), Err(TimerError::ZeroDuration));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut engine = started(Mode::CountDown, 10);
        assert_eq!(engine.start(99), Err(TimerError::AlreadyRunning));
        assert_eq!(engine.elapsed(), 10);
    }

    #[test]
    fn pause_preserves_elapsed_and_freezes_ticks() {
        let mut engine = started(Mode::CountDown, 10);
        engine.tick();
        engine.tick();
        engine.pause().expect("pause");
        assert_eq!(engine.status(), Status::Paused);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.elapsed(), 8);

        // Resuming ignores the pending input.
        engine.start(500).expect("resume");
        assert_eq!(engine.elapsed(), 8);
        assert_eq!(engine.state().target_seconds, 10);
    }

    #[test]
    fn pause_when_idle_fails() {
        let mut engine = TimerEngine::new(Mode::CountUp);
        assert_eq!(engine.pause(), Err(TimerError::NotRunning));
    }

    #[test]
    fn reset_zeroes_state_and_keeps_mode() {
        let mut engine = started(Mode::CountUp, 0);
        engine.tick();
        engine.reset();
        let s = engine.state();
        assert_eq!(s.mode, Mode::CountUp);
        assert_eq!(s.elapsed_seconds, 0);
        assert_eq!(s.target_seconds, 0);
        assert!(!s.running && !s.paused && !s.expired);
    }

    #[test]
    fn switch_mode_while_running_is_rejected() {
        let mut engine = started(Mode::CountDown, 30);
        engine.tick();
        let before = engine.state().clone();
        assert_eq!(engine.switch_mode(Mode::CountUp), Err(TimerError::ModeLocked));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn switch_mode_when_stopped_resets() {
        let mut engine = started(Mode::CountDown, 30);
        engine.tick();
        engine.pause().unwrap();
        engine.switch_mode(Mode::CountUp).expect("switch");
        assert_eq!(engine.mode(), Mode::CountUp);
        assert_eq!(engine.elapsed(), 0);
        assert_eq!(engine.status(), Status::Idle);
    }

    #[test]
    fn unbounded_count_up_never_stops() {
        let mut engine = started(Mode::CountUp, 0);
        for expected in 1..=10_000 {
            assert_eq!(engine.tick(), TickOutcome::Advanced(expected));
        }
        assert!(engine.is_running());
    }

    #[test]
    fn bounded_count_up_stops_at_target() {
        let mut engine = started(Mode::CountUp, 3);
        assert_eq!(engine.tick(), TickOutcome::Advanced(1));
        assert_eq!(engine.tick(), TickOutcome::Advanced(2));
        assert_eq!(engine.tick(), TickOutcome::Completed(3));
        assert!(!engine.is_running());

        // Starting again counts from zero towards the same limit.
        engine.start(0).unwrap();
        assert_eq!(engine.elapsed(), 0);
        assert_eq!(engine.tick(), TickOutcome::Advanced(1));
    }

    #[test]
    fn restarting_finished_count_up_takes_new_limit() {
        let mut engine = started(Mode::CountUp, 2);
        engine.tick();
        assert_eq!(engine.tick(), TickOutcome::Completed(2));

        engine.start(5).unwrap();
        assert_eq!(engine.elapsed(), 0);
        assert_eq!(engine.state().target_seconds, 5);
        for _ in 0..4 {
            assert!(matches!(engine.tick(), TickOutcome::Advanced(_)));
        }
        assert_eq!(engine.tick(), TickOutcome::Completed(5));
    }

    #[test]
    fn preset_pauses_running_timer() {
        let mut engine = started(Mode::CountDown, 100);
        engine.apply_preset(300);
        assert!(!engine.is_running());
        assert_eq!(engine.elapsed(), 300);

        // The preset value is used, not the pending input.
        engine.start(5).unwrap();
        assert_eq!(engine.elapsed(), 300);
    }

    #[test]
    fn preset_in_count_up_sets_limit() {
        let mut engine = TimerEngine::new(Mode::CountUp);
        engine.apply_preset(60);
        assert_eq!(engine.elapsed(), 0);
        assert_eq!(engine.state().target_seconds, 60);
    }

    #[test]
    fn catch_up_clamps_and_completes() {
        let mut engine = started(Mode::CountDown, 10);
        assert!(!engine.catch_up(4));
        assert_eq!(engine.elapsed(), 6);
        assert!(engine.catch_up(100));
        assert_eq!(engine.elapsed(), 0);
        assert_eq!(engine.status(), Status::Expired);

        let mut engine = started(Mode::CountUp, 20);
        assert!(engine.catch_up(25));
        assert_eq!(engine.elapsed(), 20);
    }

    #[test]
    fn catch_up_ignored_when_paused() {
        let mut engine = started(Mode::CountDown, 10);
        engine.pause().unwrap();
        assert!(!engine.catch_up(4));
        assert_eq!(engine.elapsed(), 10);
    }
}

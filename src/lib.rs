//! Countdown/count-up timer with interval alarms.
//!
//! [`TimerEngine`] runs the state machine, [`AlarmRegistry`] matches alarm
//! targets against the elapsed value, and [`Timer`] ties both to a
//! [`StateStore`] and a [`SoundPlayer`]. Everything here is free of DOM
//! access so it can be driven and tested outside the browser; the Yew view in
//! `main.rs` only forwards user actions and renders the returned state.

use log::{info, warn};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

pub mod alarms;
pub mod config;
pub mod engine;
pub mod sound;
pub mod storage;
pub mod utils;

pub use alarms::{Alarm, AlarmError, AlarmId, AlarmRegistry};
pub use engine::{Mode, Status, TickOutcome, TimerEngine, TimerError, TimerState};
pub use sound::{Signal, SoundPlayer};
pub use storage::{PersistedState, StateStore, StorageError};
pub use utils::DisplayTime;

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Something the view may want to react to after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Ticked(u32),
    AlarmReached { id: AlarmId, target_seconds: u32 },
    Completed,
}

/// Timer engine and alarm registry with their storage and sound attached.
///
/// State is written to the store after every operation that changes it.
/// Storage and playback failures are logged and otherwise ignored.
pub struct Timer<S: StateStore, P: SoundPlayer> {
    engine: TimerEngine,
    alarms: AlarmRegistry,
    store: S,
    sound: P,
}

impl<S: StateStore, P: SoundPlayer> Timer<S, P> {
    /// A fresh countdown timer with no alarms. Nothing is loaded.
    pub fn new(store: S, sound: P) -> Self {
        Self {
            engine: TimerEngine::new(Mode::CountDown),
            alarms: AlarmRegistry::new(),
            store,
            sound,
        }
    }

    /// Build a timer from whatever the store holds, as of now.
    pub fn load(store: S, sound: P) -> Self {
        let mut timer = Self::new(store, sound);
        timer.restore_at(now_ms());
        timer
    }

    /// Load saved alarms and state. A timer that was running when saved is
    /// advanced by the whole seconds elapsed since `saved_at_ms` and keeps
    /// running, unless it hit its terminal value in the meantime.
    ///
    /// Returns `true` if the timer completed while it was not being ticked.
    pub fn restore_at(&mut self, now_ms: f64) -> bool {
        match self.store.load_alarms() {
            Ok(alarms) => self.alarms = AlarmRegistry::from_alarms(alarms),
            Err(e) => warn!("Ignoring stored alarms: {}", e),
        }

        let saved = match self.store.load_state() {
            Ok(Some(saved)) => saved,
            Ok(None) => return false,
            Err(e) => {
                warn!("Ignoring stored timer state: {}", e);
                return false;
            }
        };

        self.engine = TimerEngine::from_state(saved.to_timer_state());
        let mut completed = false;
        if saved.running && !saved.paused {
            let gap = ((now_ms - saved.saved_at_ms) / 1000.0).floor().max(0.0) as u32;
            completed = self.engine.catch_up(gap);
            info!(
                "Resumed {:?} timer after {}s away (elapsed={})",
                saved.mode,
                gap,
                self.engine.elapsed()
            );
        }
        self.persist();
        completed
    }

    pub fn state(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn status(&self) -> Status {
        self.engine.status()
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn display(&self) -> DisplayTime {
        DisplayTime::from_seconds(self.engine.elapsed())
    }

    pub fn alarms(&self) -> &[Alarm] {
        self.alarms.as_slice()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sound(&self) -> &P {
        &self.sound
    }

    /// Start or resume with the duration currently typed by the user.
    pub fn start(&mut self, pending_seconds: u32) -> Result<(), TimerError> {
        self.engine.start(pending_seconds)?;
        self.persist();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        self.engine.pause()?;
        self.persist();
        Ok(())
    }

    /// Stop, zero the clock, re-arm every alarm and forget the saved state.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.clear_after_reset();
    }

    pub fn switch_mode(&mut self, mode: Mode) -> Result<(), TimerError> {
        self.engine.switch_mode(mode)?;
        self.clear_after_reset();
        Ok(())
    }

    fn clear_after_reset(&mut self) {
        self.alarms.clear_triggered();
        self.sound.stop_all();
        if let Err(e) = self.store.save_alarms(self.alarms.as_slice()) {
            warn!("Failed to save alarms: {}", e);
        }
        if let Err(e) = self.store.clear_state() {
            warn!("Failed to clear timer state: {}", e);
        }
    }

    pub fn apply_preset(&mut self, seconds: u32) {
        self.engine.apply_preset(seconds);
        self.persist();
    }

    pub fn add_alarm(&mut self, target_seconds: u32) -> Result<AlarmId, AlarmError> {
        let id = self.alarms.add(target_seconds)?;
        self.persist();
        Ok(id)
    }

    pub fn remove_alarm(&mut self, id: AlarmId) -> Result<(), AlarmError> {
        self.alarms.remove(id)?;
        self.persist();
        Ok(())
    }

    /// Silence the signals and leave the expired state.
    pub fn acknowledge(&mut self) {
        self.sound.stop_all();
        self.engine.acknowledge();
    }

    /// Silence the signals without touching the state.
    pub fn silence(&mut self) {
        self.sound.stop_all();
    }

    /// Advance one second, fire matching alarms and report what happened.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let (elapsed, completed) = match self.engine.tick() {
            TickOutcome::Idle => return Vec::new(),
            TickOutcome::Advanced(e) => (e, false),
            TickOutcome::Completed(e) => (e, true),
        };

        let mut events = vec![TimerEvent::Ticked(elapsed)];
        for alarm in self.alarms.check_and_trigger(elapsed) {
            self.sound.play(Signal::AlarmReached);
            events.push(TimerEvent::AlarmReached {
                id: alarm.id,
                target_seconds: alarm.target_seconds,
            });
        }
        if completed {
            info!("Timer complete");
            self.sound.play(Signal::Completion);
            events.push(TimerEvent::Completed);
        }

        self.persist();
        events
    }

    fn persist(&mut self) {
        let snapshot = PersistedState::capture(self.engine.state(), now_ms());
        if let Err(e) = self.store.save_state(&snapshot) {
            warn!("Failed to save timer state: {}", e);
        }
        if let Err(e) = self.store.save_alarms(self.alarms.as_slice()) {
            warn!("Failed to save alarms: {}", e);
        }
    }
}

//! Application-level configuration constants.

// Timing
pub const TICK_MS: u32 = 1_000;
pub const COMPLETION_SOUND_MS: u32 = 30_000;

// Persistence keys in window.localStorage
pub const STATE_KEY: &str = "timerState";
pub const ALARMS_KEY: &str = "timerAlarms";

// Sound assets
pub const ALARM_SOUND: &str = "alarm1.mp3";
pub const COMPLETION_SOUND: &str = "alarm2.mp3";

/// Preset buttons as (label, seconds).
pub const PRESETS: [(&str, u32); 6] = [
    ("1 min", 60),
    ("5 min", 300),
    ("10 min", 600),
    ("15 min", 900),
    ("30 min", 1_800),
    ("1 hour", 3_600),
];

// Min/Max limits for input fields
pub const MAX_HOURS: u32 = 99;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

// Prompts
pub const MSG_ZERO_COUNTDOWN: &str = "Please set a time for countdown!";
pub const MSG_ZERO_ALARM: &str = "Please set a valid alarm time!";
pub const MSG_DUPLICATE_ALARM: &str = "This alarm already exists!";
pub const MSG_COMPLETE: &str = "Timer Complete!";

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of work intervals in one cycle; the last one is followed by a
/// long break instead of a short one.
pub const CYCLE_LENGTH: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    pub const ALL: [IntervalKind; 3] = [
        IntervalKind::Work,
        IntervalKind::ShortBreak,
        IntervalKind::LongBreak,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IntervalKind::Work => "Work",
            IntervalKind::ShortBreak => "Short Break",
            IntervalKind::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, IntervalKind::Work)
    }
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IntervalKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(IntervalKind::Work),
            "short" | "short_break" | "short-break" => Ok(IntervalKind::ShortBreak),
            "long" | "long_break" | "long-break" => Ok(IntervalKind::LongBreak),
            _ => Err(ValidationError::UnknownIntervalKind(s.to_string())),
        }
    }
}

/// Duration of each interval kind, in seconds.
///
/// Immutable once built. The state machine keeps its own copy, so the
/// durations cannot shift under a running countdown. Deserializing goes
/// through [`TimerConfig::new`], so zero durations are rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimerConfig")]
pub struct TimerConfig {
    work_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
}

impl TimerConfig {
    pub const DEFAULT_WORK_SECS: u64 = 25 * 60;
    pub const DEFAULT_SHORT_BREAK_SECS: u64 = 5 * 60;
    pub const DEFAULT_LONG_BREAK_SECS: u64 = 15 * 60;

    /// Build a config from explicit durations.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDuration`] if any duration is zero.
    pub fn new(
        work_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            work_secs,
            short_break_secs,
            long_break_secs,
        };
        for kind in IntervalKind::ALL {
            if config.duration_secs(kind) == 0 {
                return Err(ValidationError::ZeroDuration { kind });
            }
        }
        Ok(config)
    }

    pub fn duration_secs(&self, kind: IntervalKind) -> u64 {
        match kind {
            IntervalKind::Work => self.work_secs,
            IntervalKind::ShortBreak => self.short_break_secs,
            IntervalKind::LongBreak => self.long_break_secs,
        }
    }

    /// Copy of this config with one duration replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDuration`] if `secs` is zero.
    pub fn with_duration(self, kind: IntervalKind, secs: u64) -> Result<Self, ValidationError> {
        let mut next = self;
        match kind {
            IntervalKind::Work => next.work_secs = secs,
            IntervalKind::ShortBreak => next.short_break_secs = secs,
            IntervalKind::LongBreak => next.long_break_secs = secs,
        }
        Self::new(next.work_secs, next.short_break_secs, next.long_break_secs)
    }
}

#[derive(Deserialize)]
struct RawTimerConfig {
    work_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
}

impl TryFrom<RawTimerConfig> for TimerConfig {
    type Error = ValidationError;

    fn try_from(raw: RawTimerConfig) -> Result<Self, Self::Error> {
        Self::new(raw.work_secs, raw.short_break_secs, raw.long_break_secs)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: Self::DEFAULT_WORK_SECS,
            short_break_secs: Self::DEFAULT_SHORT_BREAK_SECS,
            long_break_secs: Self::DEFAULT_LONG_BREAK_SECS,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::interval::{IntervalKind, TimerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

/// The live session. Only the timer module mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Session {
    pub(super) mode: IntervalKind,
    pub(super) state: RunState,
    /// Seconds left in the current interval.
    pub(super) time_left: u64,
    /// Work intervals completed in the current cycle, 1..=CYCLE_LENGTH.
    pub(super) cycle_position: u8,
    pub(super) completed_work_count: u64,
}

impl Session {
    /// Fresh session: an idle, full-length work interval at the start of a
    /// cycle.
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            mode: IntervalKind::Work,
            state: RunState::Idle,
            time_left: config.duration_secs(IntervalKind::Work),
            cycle_position: 1,
            completed_work_count: 0,
        }
    }

    pub fn mode(&self) -> IntervalKind {
        self.mode
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn cycle_position(&self) -> u8 {
        self.cycle_position
    }

    pub fn completed_work_count(&self) -> u64 {
        self.completed_work_count
    }

    pub fn snapshot(&self, config: &TimerConfig) -> Snapshot {
        Snapshot {
            mode: self.mode,
            state: self.state,
            time_left: self.time_left,
            total_secs: config.duration_secs(self.mode),
            cycle_position: self.cycle_position,
            completed_work_count: self.completed_work_count,
        }
    }
}

/// Read-only copy of the session handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: IntervalKind,
    pub state: RunState,
    pub time_left: u64,
    /// Full duration of `mode`.
    pub total_secs: u64,
    pub cycle_position: u8,
    pub completed_work_count: u64,
}

impl Snapshot {
    /// 0.0 .. 1.0 elapsed fraction of the current interval.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.time_left as f64 / self.total_secs as f64)
    }

    /// Remaining time as `MM:SS`. Minutes grow past two digits for long
    /// intervals.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Completion, IntervalKind, RunState, Snapshot};

/// Every state change of the session produces an Event.
/// The presentation layer renders snapshots; events feed logs and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: IntervalKind,
        time_left: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: IntervalKind,
        time_left: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: IntervalKind,
        time_left: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: IntervalKind,
        to: IntervalKind,
        time_left: u64,
        at: DateTime<Utc>,
    },
    IntervalCompleted {
        finished: IntervalKind,
        next: IntervalKind,
        completed_work_count: u64,
        cycle_position: u8,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: IntervalKind,
        state: RunState,
        time_left: u64,
        total_secs: u64,
        cycle_position: u8,
        completed_work_count: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn completed(completion: Completion) -> Self {
        Event::IntervalCompleted {
            finished: completion.finished,
            next: completion.next,
            completed_work_count: completion.completed_work_count,
            cycle_position: completion.cycle_position,
            at: Utc::now(),
        }
    }

    pub fn snapshot(snapshot: Snapshot) -> Self {
        Event::StateSnapshot {
            mode: snapshot.mode,
            state: snapshot.state,
            time_left: snapshot.time_left,
            total_secs: snapshot.total_secs,
            cycle_position: snapshot.cycle_position,
            completed_work_count: snapshot.completed_work_count,
            at: Utc::now(),
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::ModeChanged { at, .. }
            | Event::IntervalCompleted { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::completed(Completion {
            finished: IntervalKind::Work,
            next: IntervalKind::ShortBreak,
            completed_work_count: 1,
            cycle_position: 2,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "IntervalCompleted");
        assert_eq!(json["next"], "short_break");
        assert_eq!(json["completed_work_count"], 1);
    }
}

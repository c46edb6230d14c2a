//! Terminal rendering of snapshots and events.

use pomocycle_core::timer::CYCLE_LENGTH;
use pomocycle_core::{Event, RunState, Snapshot};

pub const HELP: &str = "\
commands:
  start | s          start or resume the countdown
  pause | p          pause the countdown
  reset | r          restart the current interval
  mode <kind> | m    switch to work, short or long (abandons the current one)
  work | short | long  shorthand for mode
  status             print the current state
  help | h | ?       show this help
  quit | q           exit";

fn state_label(state: RunState) -> &'static str {
    match state {
        RunState::Idle => "idle",
        RunState::Running => "running",
        RunState::Paused => "paused",
    }
}

pub fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "{:<11} {}  [{}]  cycle {}/{}  done {}",
        snapshot.mode.label(),
        snapshot.clock(),
        state_label(snapshot.state),
        snapshot.cycle_position,
        CYCLE_LENGTH,
        snapshot.completed_work_count,
    )
}

/// Human notice for events worth announcing; `None` for the rest.
pub fn event_line(event: &Event) -> Option<String> {
    match event {
        Event::IntervalCompleted {
            finished,
            next,
            completed_work_count,
            ..
        } => Some(format!(
            "{finished} finished, up next: {next} ({completed_work_count} completed)"
        )),
        Event::ModeChanged { from, to, .. } if from != to => {
            Some(format!("switched from {from} to {to}"))
        }
        _ => None,
    }
}

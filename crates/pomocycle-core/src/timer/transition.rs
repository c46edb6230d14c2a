//! Pure session transitions.
//!
//! Every input maps the old session to a new one in a single step, so there
//! is never a half-applied update. In particular the terminal tick goes
//! straight from the last second to the next interval's full duration;
//! `time_left == 0` is never stored.

use serde::{Deserialize, Serialize};

use super::interval::{IntervalKind, TimerConfig, CYCLE_LENGTH};
use super::session::{RunState, Session};

/// Everything that can change a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Start,
    Pause,
    Reset,
    ChangeMode(IntervalKind),
    Tick,
}

/// Produced when a running interval reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub finished: IntervalKind,
    pub next: IntervalKind,
    pub completed_work_count: u64,
    pub cycle_position: u8,
}

pub fn transition(
    session: Session,
    config: &TimerConfig,
    input: Input,
) -> (Session, Option<Completion>) {
    match input {
        Input::Start => match session.state {
            RunState::Idle | RunState::Paused => (
                Session {
                    state: RunState::Running,
                    ..session
                },
                None,
            ),
            RunState::Running => (session, None),
        },
        Input::Pause => match session.state {
            RunState::Running => (
                Session {
                    state: RunState::Paused,
                    ..session
                },
                None,
            ),
            _ => (session, None),
        },
        Input::Reset => (
            Session {
                state: RunState::Idle,
                time_left: config.duration_secs(session.mode),
                ..session
            },
            None,
        ),
        Input::ChangeMode(mode) => (
            Session {
                mode,
                state: RunState::Idle,
                time_left: config.duration_secs(mode),
                ..session
            },
            None,
        ),
        Input::Tick => tick(session, config),
    }
}

fn tick(session: Session, config: &TimerConfig) -> (Session, Option<Completion>) {
    if session.state != RunState::Running {
        return (session, None);
    }
    if session.time_left > 1 {
        return (
            Session {
                time_left: session.time_left - 1,
                ..session
            },
            None,
        );
    }

    let (next, completed_work_count, cycle_position) = match session.mode {
        IntervalKind::Work if session.cycle_position >= CYCLE_LENGTH => {
            (IntervalKind::LongBreak, session.completed_work_count + 1, 1)
        }
        IntervalKind::Work => (
            IntervalKind::ShortBreak,
            session.completed_work_count + 1,
            session.cycle_position + 1,
        ),
        IntervalKind::ShortBreak | IntervalKind::LongBreak => (
            IntervalKind::Work,
            session.completed_work_count,
            session.cycle_position,
        ),
    };

    let next_session = Session {
        mode: next,
        state: RunState::Idle,
        time_left: config.duration_secs(next),
        cycle_position,
        completed_work_count,
    };
    let completion = Completion {
        finished: session.mode,
        next,
        completed_work_count,
        cycle_position,
    };
    (next_session, Some(completion))
}

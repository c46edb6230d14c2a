//! Session state machine.
//!
//! Holds only data plus the injected notification sink. Time advances only
//! through `tick()`, which the owner calls once per elapsed second; there is
//! no internal clock.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle (next interval)
//! ```
//!
//! ## Usage
//!
//! ```
//! use pomocycle_core::notify::SilentSink;
//! use pomocycle_core::timer::{IntervalKind, SessionStateMachine, TimerConfig};
//!
//! let mut machine = SessionStateMachine::new(TimerConfig::default(), SilentSink);
//! machine.start();
//! for _ in 0..1500 {
//!     machine.tick();
//! }
//! assert_eq!(machine.snapshot().mode, IntervalKind::ShortBreak);
//! ```

use chrono::Utc;

use super::interval::{IntervalKind, TimerConfig};
use super::session::{RunState, Session, Snapshot};
use super::transition::{transition, Input};
use crate::events::Event;
use crate::notify::{NotificationSink, SilentSink};

#[derive(Debug)]
pub struct SessionStateMachine<N = SilentSink> {
    config: TimerConfig,
    session: Session,
    sink: N,
}

impl<N: NotificationSink> SessionStateMachine<N> {
    pub fn new(config: TimerConfig, sink: N) -> Self {
        Self {
            session: Session::new(&config),
            config,
            sink,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> RunState {
        self.session.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot(&self.config)
    }

    /// Full state snapshot as an event, for JSON output.
    pub fn snapshot_event(&self) -> Event {
        Event::snapshot(self.snapshot())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.apply(Input::Start)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.apply(Input::Pause)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.apply(Input::Reset)
    }

    pub fn change_mode(&mut self, mode: IntervalKind) -> Option<Event> {
        self.apply(Input::ChangeMode(mode))
    }

    /// Call once per elapsed second. Returns `Some(Event::IntervalCompleted)`
    /// when the interval finishes.
    pub fn tick(&mut self) -> Option<Event> {
        self.apply(Input::Tick)
    }

    /// Apply one input. `None` means the input was a no-op or a plain
    /// countdown tick.
    pub fn apply(&mut self, input: Input) -> Option<Event> {
        let before = self.session;
        let (after, completion) = transition(before, &self.config, input);
        self.session = after;

        if let Some(completion) = completion {
            tracing::info!(
                finished = %completion.finished,
                next = %completion.next,
                completed = completion.completed_work_count,
                cycle = completion.cycle_position,
                "interval completed"
            );
            // Committed above; a failed cue only gets logged.
            if let Err(e) = self.sink.play() {
                tracing::warn!(error = %e, "completion cue failed");
            }
            return Some(Event::completed(completion));
        }

        let at = Utc::now();
        let event = match input {
            Input::Start if before.state() != RunState::Running => Event::TimerStarted {
                mode: after.mode(),
                time_left: after.time_left(),
                at,
            },
            Input::Pause if before.state() == RunState::Running => Event::TimerPaused {
                mode: after.mode(),
                time_left: after.time_left(),
                at,
            },
            Input::Reset => Event::TimerReset {
                mode: after.mode(),
                time_left: after.time_left(),
                at,
            },
            Input::ChangeMode(to) => Event::ModeChanged {
                from: before.mode(),
                to,
                time_left: after.time_left(),
                at,
            },
            _ => return None,
        };
        tracing::debug!(?input, state = ?after.state(), time_left = after.time_left(), "session updated");
        Some(event)
    }
}

impl Default for SessionStateMachine<SilentSink> {
    fn default() -> Self {
        Self::new(TimerConfig::default(), SilentSink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;

    #[derive(Default)]
    struct CountingSink {
        plays: usize,
    }

    impl NotificationSink for CountingSink {
        fn play(&mut self) -> Result<(), NotifyError> {
            self.plays += 1;
            Ok(())
        }
    }

    struct BrokenSink;

    impl NotificationSink for BrokenSink {
        fn play(&mut self) -> Result<(), NotifyError> {
            Err(NotifyError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "speaker unplugged",
            )))
        }
    }

    fn short_config() -> TimerConfig {
        TimerConfig::new(3, 2, 4).unwrap()
    }

    #[test]
    fn start_pause_start() {
        let mut machine = SessionStateMachine::default();
        assert_eq!(machine.state(), RunState::Idle);

        assert!(matches!(machine.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(machine.state(), RunState::Running);
        assert!(machine.start().is_none());

        machine.tick();
        assert!(matches!(
            machine.pause(),
            Some(Event::TimerPaused { time_left: 1499, .. })
        ));
        assert!(machine.pause().is_none());

        assert!(machine.start().is_some());
        assert_eq!(machine.snapshot().time_left, 1499);
    }

    #[test]
    fn full_work_interval_completes_into_short_break() {
        let mut machine = SessionStateMachine::default();
        machine.start();
        let mut completions = 0;
        for _ in 0..1500 {
            if let Some(Event::IntervalCompleted { .. }) = machine.tick() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        let snap = machine.snapshot();
        assert_eq!(snap.mode, IntervalKind::ShortBreak);
        assert_eq!(snap.time_left, 300);
        assert_eq!(snap.completed_work_count, 1);
        assert_eq!(snap.cycle_position, 2);
        assert_eq!(snap.state, RunState::Idle);
    }

    #[test]
    fn sink_plays_once_per_completion() {
        let mut machine = SessionStateMachine::new(short_config(), CountingSink::default());
        machine.start();
        for _ in 0..3 {
            machine.tick();
        }
        // Idle after completion: further ticks do nothing.
        machine.tick();
        assert_eq!(machine.sink.plays, 1);
        machine.start();
        machine.tick();
        machine.tick();
        assert_eq!(machine.sink.plays, 2);
        assert_eq!(machine.snapshot().mode, IntervalKind::Work);
    }

    #[test]
    fn failing_sink_does_not_affect_transition() {
        let mut machine = SessionStateMachine::new(short_config(), BrokenSink);
        machine.start();
        machine.tick();
        machine.tick();
        let event = machine.tick();
        assert!(matches!(event, Some(Event::IntervalCompleted { .. })));
        let snap = machine.snapshot();
        assert_eq!(snap.mode, IntervalKind::ShortBreak);
        assert_eq!(snap.time_left, 2);
        assert_eq!(snap.completed_work_count, 1);
    }

    #[test]
    fn reset_restores_full_duration_of_current_mode() {
        let mut machine = SessionStateMachine::default();
        machine.change_mode(IntervalKind::LongBreak);
        machine.start();
        machine.tick();
        machine.tick();
        assert!(matches!(machine.reset(), Some(Event::TimerReset { time_left: 900, .. })));
        let once = machine.snapshot();
        machine.reset();
        assert_eq!(machine.snapshot(), once);
        assert_eq!(once.mode, IntervalKind::LongBreak);
        assert_eq!(once.state, RunState::Idle);
    }

    #[test]
    fn change_mode_reports_previous_mode() {
        let mut machine = SessionStateMachine::default();
        match machine.change_mode(IntervalKind::ShortBreak) {
            Some(Event::ModeChanged { from, to, time_left, .. }) => {
                assert_eq!(from, IntervalKind::Work);
                assert_eq!(to, IntervalKind::ShortBreak);
                assert_eq!(time_left, 300);
            }
            other => panic!("expected ModeChanged, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_event_carries_state() {
        let machine = SessionStateMachine::default();
        match machine.snapshot_event() {
            Event::StateSnapshot {
                state, time_left, ..
            } => {
                assert_eq!(state, RunState::Idle);
                assert_eq!(time_left, 1500);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}

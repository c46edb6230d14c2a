//! Single owner of the session.
//!
//! The driver serializes user commands and ticker pulses onto one
//! [`SessionStateMachine`], keeps the ticker subscribed exactly while the
//! session is running, and publishes a snapshot after every change.
//!
//! ```text
//! commands ─┐
//!           ├─> SessionDriver ─> SessionStateMachine
//! pulses  ──┘        │
//!                    ├─> watch<Snapshot>   (presentation)
//!                    └─> broadcast<Event>  (logs, JSON)
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};

use crate::events::Event;
use crate::notify::NotificationSink;
use crate::ticker::{Pulse, Ticker};
use crate::timer::{IntervalKind, RunState, SessionStateMachine, Snapshot};

const EVENT_CAPACITY: usize = 64;

/// User-facing commands. Ticks are not commands; they come from the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "mode", rename_all = "snake_case")]
pub enum Command {
    Start,
    Pause,
    Reset,
    ChangeMode(IntervalKind),
}

pub struct SessionDriver<T, N> {
    machine: SessionStateMachine<N>,
    ticker: T,
    /// Generation of the current ticker subscription.
    generation: u64,
    subscribed: bool,
    pulse_tx: mpsc::Sender<Pulse>,
    pulse_rx: mpsc::Receiver<Pulse>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<Event>,
}

enum Next {
    Command(Option<Command>),
    Pulse(Option<Pulse>),
}

impl<T: Ticker, N: NotificationSink> SessionDriver<T, N> {
    pub fn new(machine: SessionStateMachine<N>, ticker: T) -> Self {
        let (pulse_tx, pulse_rx) = mpsc::channel(1);
        let (snapshots, _) = watch::channel(machine.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            machine,
            ticker,
            generation: 0,
            subscribed: false,
            pulse_tx,
            pulse_rx,
            snapshots,
            events,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    pub fn machine(&self) -> &SessionStateMachine<N> {
        &self.machine
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn handle_command(&mut self, command: Command) -> Option<Event> {
        let event = match command {
            Command::Start => self.machine.start(),
            Command::Pause => self.machine.pause(),
            Command::Reset => self.machine.reset(),
            Command::ChangeMode(mode) => self.machine.change_mode(mode),
        };
        self.sync_ticker();
        self.publish(event.as_ref());
        event
    }

    /// Advance the session by one second, unless the pulse is stale.
    pub fn handle_pulse(&mut self, pulse: Pulse) -> Option<Event> {
        if !self.subscribed || pulse.generation != self.generation {
            tracing::debug!(
                pulse = pulse.generation,
                current = self.generation,
                subscribed = self.subscribed,
                "stale pulse rejected"
            );
            return None;
        }
        let event = self.machine.tick();
        self.sync_ticker();
        self.publish(event.as_ref());
        event
    }

    /// Handle every pulse already queued, without waiting. Returns the
    /// number of pulses taken off the queue.
    pub fn poll_pulses(&mut self) -> usize {
        let mut taken = 0;
        while let Ok(pulse) = self.pulse_rx.try_recv() {
            self.handle_pulse(pulse);
            taken += 1;
        }
        taken
    }

    /// Process commands and pulses until the command channel closes.
    ///
    /// Commands are always polled before pulses, so a pause that arrives
    /// together with a pulse wins.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Snapshot {
        loop {
            let next = tokio::select! {
                biased;
                command = commands.recv() => Next::Command(command),
                pulse = self.pulse_rx.recv() => Next::Pulse(pulse),
            };
            match next {
                Next::Command(Some(command)) => {
                    self.handle_command(command);
                }
                Next::Pulse(Some(pulse)) => {
                    self.handle_pulse(pulse);
                }
                Next::Command(None) | Next::Pulse(None) => break,
            }
        }
        self.ticker.cancel();
        self.subscribed = false;
        tracing::debug!("driver stopped");
        self.machine.snapshot()
    }

    fn sync_ticker(&mut self) {
        let running = self.machine.state() == RunState::Running;
        if running && !self.subscribed {
            self.generation += 1;
            self.ticker.subscribe(self.pulse_tx.clone(), self.generation);
            self.subscribed = true;
        } else if !running && self.subscribed {
            self.ticker.cancel();
            self.subscribed = false;
        }
    }

    fn publish(&self, event: Option<&Event>) {
        self.snapshots.send_replace(self.machine.snapshot());
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.events.send(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SilentSink;
    use crate::ticker::ManualTicker;
    use crate::timer::TimerConfig;

    fn driver(config: TimerConfig) -> (SessionDriver<ManualTicker, SilentSink>, ManualTicker) {
        let ticker = ManualTicker::new();
        let machine = SessionStateMachine::new(config, SilentSink);
        (SessionDriver::new(machine, ticker.clone()), ticker)
    }

    fn pulse(driver: &mut SessionDriver<ManualTicker, SilentSink>, ticker: &ManualTicker) {
        assert!(ticker.fire());
        assert_eq!(driver.poll_pulses(), 1);
    }

    #[test]
    fn start_subscribes_and_pause_cancels() {
        let (mut driver, ticker) = driver(TimerConfig::default());
        driver.handle_command(Command::Start);
        assert!(ticker.is_active());
        assert_eq!(ticker.generation(), 1);

        pulse(&mut driver, &ticker);
        assert_eq!(driver.snapshot().time_left, 1499);

        driver.handle_command(Command::Pause);
        assert!(!ticker.is_active());
        assert!(!ticker.fire());

        driver.handle_command(Command::Start);
        assert_eq!(ticker.generation(), 2);
        assert_eq!(ticker.subscriptions(), 2);
    }

    #[test]
    fn stale_pulses_are_rejected() {
        let (mut driver, ticker) = driver(TimerConfig::default());
        driver.handle_command(Command::Start);
        driver.handle_command(Command::Pause);

        // In flight when the ticker was cancelled.
        assert!(ticker.inject(1));
        driver.poll_pulses();
        assert_eq!(driver.snapshot().time_left, 1500);

        // Old generation after resubscribing.
        driver.handle_command(Command::Start);
        assert!(ticker.inject(1));
        driver.poll_pulses();
        assert_eq!(driver.snapshot().time_left, 1500);

        pulse(&mut driver, &ticker);
        assert_eq!(driver.snapshot().time_left, 1499);
    }

    #[test]
    fn stale_pulse_after_reset_is_rejected() {
        let (mut driver, ticker) = driver(TimerConfig::default());
        driver.handle_command(Command::Start);
        pulse(&mut driver, &ticker);
        assert_eq!(driver.snapshot().time_left, 1499);

        driver.handle_command(Command::Reset);
        assert!(!ticker.is_active());

        assert!(ticker.inject(1));
        driver.poll_pulses();
        let snap = driver.snapshot();
        assert_eq!(snap.time_left, 1500);
        assert_eq!(snap.state, RunState::Idle);
    }

    #[test]
    fn completion_cancels_ticker() {
        let (mut driver, ticker) = driver(TimerConfig::new(2, 1, 1).unwrap());
        let mut events = driver.subscribe_events();
        driver.handle_command(Command::Start);
        pulse(&mut driver, &ticker);
        pulse(&mut driver, &ticker);

        let snap = driver.snapshot();
        assert_eq!(snap.mode, IntervalKind::ShortBreak);
        assert_eq!(snap.state, RunState::Idle);
        assert!(!ticker.is_active());

        assert!(matches!(events.try_recv(), Ok(Event::TimerStarted { .. })));
        assert!(matches!(events.try_recv(), Ok(Event::IntervalCompleted { .. })));
    }

    #[test]
    fn change_mode_while_running_stops_ticks() {
        let (mut driver, ticker) = driver(TimerConfig::default());
        driver.handle_command(Command::Start);
        pulse(&mut driver, &ticker);
        driver.handle_command(Command::ChangeMode(IntervalKind::LongBreak));

        assert!(!ticker.is_active());
        let snap = driver.snapshot();
        assert_eq!(snap.mode, IntervalKind::LongBreak);
        assert_eq!(snap.time_left, 900);
        assert_eq!(snap.completed_work_count, 0);
    }

    #[test]
    fn snapshots_follow_every_command() {
        let (mut driver, _ticker) = driver(TimerConfig::default());
        let mut rx = driver.subscribe_snapshots();
        driver.handle_command(Command::ChangeMode(IntervalKind::ShortBreak));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().mode, IntervalKind::ShortBreak);
    }

    #[test]
    fn command_json_shape() {
        let json = serde_json::to_string(&Command::ChangeMode(IntervalKind::Work)).unwrap();
        assert_eq!(json, r#"{"command":"change_mode","mode":"work"}"#);
        let json = serde_json::to_string(&Command::Start).unwrap();
        assert_eq!(json, r#"{"command":"start"}"#);
    }
}

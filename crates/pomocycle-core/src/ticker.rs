//! Pulse sources.
//!
//! A [`Ticker`] delivers one [`Pulse`] per period into the channel it is
//! subscribed with. Each subscription carries a generation number; the
//! consumer rejects pulses whose generation is not the current one, so a
//! pulse that was already in flight when the ticker was cancelled cannot
//! advance the session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub generation: u64,
}

pub trait Ticker {
    /// Begin delivering pulses tagged with `generation`. Replaces any
    /// earlier subscription.
    fn subscribe(&mut self, pulses: mpsc::Sender<Pulse>, generation: u64);

    /// Stop delivering pulses until the next `subscribe`.
    fn cancel(&mut self);
}

/// Wall-clock ticker backed by a tokio task.
///
/// The first pulse arrives one full period after `subscribe`. Missed
/// periods are skipped rather than replayed, and a pulse is dropped when
/// the consumer has not taken the previous one yet.
///
/// `subscribe` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Ticker for IntervalTicker {
    fn subscribe(&mut self, pulses: mpsc::Sender<Pulse>, generation: u64) {
        self.cancel();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match pulses.try_send(Pulse { generation }) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::trace!(generation, "consumer busy, pulse dropped");
                    }
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Ticker driven by hand, for tests and simulations.
///
/// Clones share state, so a test can keep one handle while the driver owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    inner: Arc<Mutex<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    sender: Option<mpsc::Sender<Pulse>>,
    generation: u64,
    active: bool,
    subscriptions: usize,
    cancellations: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deliver one pulse for the active subscription.
    ///
    /// Returns `false` if nothing is subscribed or the consumer's queue is
    /// full.
    pub fn fire(&self) -> bool {
        let state = self.lock();
        if !state.active {
            return false;
        }
        match &state.sender {
            Some(tx) => tx
                .try_send(Pulse {
                    generation: state.generation,
                })
                .is_ok(),
            None => false,
        }
    }

    /// Push a pulse with an arbitrary generation into the last subscribed
    /// channel, even after cancellation.
    pub fn inject(&self, generation: u64) -> bool {
        match &self.lock().sender {
            Some(tx) => tx.try_send(Pulse { generation }).is_ok(),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Generation of the most recent subscription.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn subscriptions(&self) -> usize {
        self.lock().subscriptions
    }

    pub fn cancellations(&self) -> usize {
        self.lock().cancellations
    }
}

impl Ticker for ManualTicker {
    fn subscribe(&mut self, pulses: mpsc::Sender<Pulse>, generation: u64) {
        let mut state = self.lock();
        state.sender = Some(pulses);
        state.generation = generation;
        state.active = true;
        state.subscriptions += 1;
    }

    fn cancel(&mut self) {
        let mut state = self.lock();
        if state.active {
            state.active = false;
            state.cancellations += 1;
        }
    }
}

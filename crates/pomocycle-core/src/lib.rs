//! # Pomocycle Core Library
//!
//! Session logic for a work/break interval timer. The CLI binary is a thin
//! front end over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: interval kinds, durations and a pure transition function,
//!   wrapped by [`SessionStateMachine`]. The caller invokes `tick()` once
//!   per elapsed second; there is no internal clock.
//! - **Capabilities**: [`Ticker`] (pulse source) and [`NotificationSink`]
//!   (completion cue) are injected, so tests run without timers or sound.
//! - **Driver**: [`SessionDriver`] is the single owner of the session. It
//!   serializes commands and pulses and publishes snapshots.
//! - **Storage**: TOML configuration.
//!
//! ## Cycle
//!
//! Work intervals alternate with short breaks; every fourth completed work
//! interval is followed by a long break instead.

pub mod driver;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod ticker;
pub mod timer;

pub use driver::{Command, SessionDriver};
pub use error::{ConfigError, CoreError, NotifyError, ValidationError};
pub use events::Event;
pub use notify::{CommandSink, NotificationSink, SilentSink, TerminalBell};
pub use storage::Config;
pub use ticker::{IntervalTicker, ManualTicker, Pulse, Ticker};
pub use timer::{
    Completion, IntervalKind, RunState, Session, SessionStateMachine, Snapshot, TimerConfig,
};

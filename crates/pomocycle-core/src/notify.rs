//! Completion cues.
//!
//! A [`NotificationSink`] is invoked once per completed interval. Playback is
//! best effort: the state machine logs a failed cue and carries on.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::NotifyError;

pub trait NotificationSink {
    fn play(&mut self) -> Result<(), NotifyError>;
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn play(&mut self) -> Result<(), NotifyError> {
        (**self).play()
    }
}

/// Sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn play(&mut self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Rings the terminal bell.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalBell<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> NotificationSink for TerminalBell<W> {
    fn play(&mut self) -> Result<(), NotifyError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Launches an external player, e.g. `paplay complete.oga`.
///
/// The caller never blocks on the player. A waiter thread reaps it and
/// logs its exit status.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl NotificationSink for CommandSink {
    fn play(&mut self) -> Result<(), NotifyError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| NotifyError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let program = self.program.clone();
        std::thread::Builder::new()
            .name("pomocycle-cue".into())
            .spawn(move || match child.wait() {
                Ok(status) if status.success() => {}
                Ok(status) => tracing::debug!(%program, %status, "cue player exited"),
                Err(e) => tracing::warn!(%program, error = %e, "waiting on cue player failed"),
            })?;
        Ok(())
    }
}

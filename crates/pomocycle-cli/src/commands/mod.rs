pub mod completions;
pub mod config;
pub mod run;
pub mod simulate;

use clap::Args;
use pomocycle_core::{Config, IntervalKind, TimerConfig};

/// Per-invocation duration overrides, applied on top of the config file.
#[derive(Args, Debug, Default)]
pub struct DurationArgs {
    /// Work interval length in seconds
    #[arg(long, value_name = "SECS")]
    work: Option<u64>,
    /// Short break length in seconds
    #[arg(long, value_name = "SECS")]
    short_break: Option<u64>,
    /// Long break length in seconds
    #[arg(long, value_name = "SECS")]
    long_break: Option<u64>,
}

impl DurationArgs {
    pub fn resolve(&self, config: &Config) -> Result<TimerConfig, Box<dyn std::error::Error>> {
        let mut timer = config.timer_config()?;
        let overrides = [
            (IntervalKind::Work, self.work),
            (IntervalKind::ShortBreak, self.short_break),
            (IntervalKind::LongBreak, self.long_break),
        ];
        for (kind, secs) in overrides {
            if let Some(secs) = secs {
                timer = timer.with_duration(kind, secs)?;
            }
        }
        Ok(timer)
    }
}

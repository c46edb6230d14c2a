use clap::Args;
use pomocycle_core::{Config, Event, IntervalKind, SessionStateMachine, SilentSink};

use super::DurationArgs;

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of one-second ticks to deliver
    #[arg(long)]
    ticks: u64,
    /// Switch to this interval (work, short, long) before starting
    #[arg(long)]
    mode: Option<IntervalKind>,
    /// Start the next interval right after each completion
    #[arg(long)]
    continuous: bool,
    /// Print every event as a JSON line before the final snapshot
    #[arg(long)]
    events: bool,
    #[command(flatten)]
    durations: DurationArgs,
}

/// Drive a silent machine through `ticks` seconds and collect its events.
fn simulate(
    machine: &mut SessionStateMachine<SilentSink>,
    mode: Option<IntervalKind>,
    ticks: u64,
    continuous: bool,
) -> Vec<Event> {
    let mut events = Vec::new();
    if let Some(mode) = mode {
        events.extend(machine.change_mode(mode));
    }
    events.extend(machine.start());
    for _ in 0..ticks {
        if let Some(event) = machine.tick() {
            let completed = matches!(event, Event::IntervalCompleted { .. });
            events.push(event);
            if completed && continuous {
                events.extend(machine.start());
            }
        }
    }
    events
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let timer = args.durations.resolve(&config)?;
    let mut machine = SessionStateMachine::new(timer, SilentSink);

    let events = simulate(&mut machine, args.mode, args.ticks, args.continuous);
    if args.events {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    println!("{}", serde_json::to_string_pretty(&machine.snapshot_event())?);
    Ok(())
}

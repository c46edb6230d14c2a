use std::error::Error;

use clap::Args;
use pomocycle_core::storage::NotificationsConfig;
use pomocycle_core::{
    Command, CommandSink, Config, IntervalKind, IntervalTicker, NotificationSink, SessionDriver,
    SessionStateMachine, SilentSink, TerminalBell, TimerConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};

use super::DurationArgs;
use crate::render;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    durations: DurationArgs,
    /// Do not play a cue when an interval completes
    #[arg(long)]
    silent: bool,
}

/// One line of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Command(Command),
    Status,
    Help,
    Quit,
}

/// Parse a line typed on stdin. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Line>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let parsed = match head.to_ascii_lowercase().as_str() {
        "start" | "s" | "resume" => Line::Command(Command::Start),
        "pause" | "p" => Line::Command(Command::Pause),
        "reset" | "r" => Line::Command(Command::Reset),
        "mode" | "m" => {
            let kind = words
                .next()
                .ok_or_else(|| "mode needs a kind: work, short or long".to_string())?;
            let kind: IntervalKind = kind.parse().map_err(|e| format!("{e}"))?;
            Line::Command(Command::ChangeMode(kind))
        }
        "status" => Line::Status,
        "help" | "h" | "?" => Line::Help,
        "quit" | "q" | "exit" => Line::Quit,
        other => match other.parse::<IntervalKind>() {
            Ok(kind) => Line::Command(Command::ChangeMode(kind)),
            Err(_) => return Err(format!("unknown command '{head}' (try 'help')")),
        },
    };
    Ok(Some(parsed))
}

fn build_sink(config: &NotificationsConfig, silent: bool) -> Box<dyn NotificationSink + Send> {
    if silent || !config.enabled {
        return Box::new(SilentSink);
    }
    match &config.command {
        Some(program) => Box::new(CommandSink::new(program.clone(), config.args.clone())),
        None => Box::new(TerminalBell::stderr()),
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let timer = args.durations.resolve(&config)?;
    let sink = build_sink(&config.notifications, args.silent);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(interactive(timer, sink));
    // A stdin read may still be parked on its blocking thread.
    runtime.shutdown_background();
    result
}

async fn interactive(
    timer: TimerConfig,
    sink: Box<dyn NotificationSink + Send>,
) -> Result<(), Box<dyn Error>> {
    let machine = SessionStateMachine::new(timer, sink);
    let driver = SessionDriver::new(machine, IntervalTicker::every_second());
    let mut snapshots = driver.subscribe_snapshots();
    let status = snapshots.clone();
    let mut events = driver.subscribe_events();
    println!("{}", render::status_line(&snapshots.borrow_and_update()));

    let (tx, rx) = mpsc::channel(16);
    let driver_task = tokio::spawn(driver.run(rx));

    let render_task = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = *snapshots.borrow_and_update();
            println!("{}", render::status_line(&snapshot));
        }
    });

    let event_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    tracing::debug!(?event, "event");
                    if let Some(line) = render::event_line(&event) {
                        println!("{line}");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    eprintln!("{}", render::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(Line::Command(command))) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(Some(Line::Status)) => println!("{}", render::status_line(&status.borrow())),
            Ok(Some(Line::Help)) => eprintln!("{}", render::HELP),
            Ok(Some(Line::Quit)) => break,
            Ok(None) => {}
            Err(message) => eprintln!("{message}"),
        }
    }

    drop(tx);
    let last = driver_task.await?;
    render_task.await?;
    event_task.await?;
    tracing::info!(
        completed = last.completed_work_count,
        mode = %last.mode,
        "session ended"
    );
    Ok(())
}

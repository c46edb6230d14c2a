//! End-to-end cycle tests: full Pomodoro rounds through the state machine
//! and through the async driver with a real interval ticker.

use std::time::Duration;

use pomocycle_core::{
    Command, Event, IntervalKind, IntervalTicker, RunState, SessionDriver, SessionStateMachine,
    SilentSink, TimerConfig,
};
use tokio::sync::mpsc;

/// Start the current interval and tick until it completes.
fn run_interval(machine: &mut SessionStateMachine) -> Event {
    machine.start();
    loop {
        if let Some(event) = machine.tick() {
            return event;
        }
    }
}

#[test]
fn four_work_intervals_lead_to_long_break() {
    let mut machine = SessionStateMachine::default();
    for round in 1..=4u64 {
        let event = run_interval(&mut machine);
        match event {
            Event::IntervalCompleted {
                finished,
                completed_work_count,
                ..
            } => {
                assert_eq!(finished, IntervalKind::Work);
                assert_eq!(completed_work_count, round);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        if round < 4 {
            let snap = machine.snapshot();
            assert_eq!(snap.mode, IntervalKind::ShortBreak);
            assert_eq!(snap.cycle_position as u64, round + 1);
            run_interval(&mut machine);
            assert_eq!(machine.snapshot().mode, IntervalKind::Work);
        }
    }

    let snap = machine.snapshot();
    assert_eq!(snap.mode, IntervalKind::LongBreak);
    assert_eq!(snap.time_left, 900);
    assert_eq!(snap.cycle_position, 1);
    assert_eq!(snap.completed_work_count, 4);
    assert_eq!(snap.state, RunState::Idle);

    run_interval(&mut machine);
    let snap = machine.snapshot();
    assert_eq!(snap.mode, IntervalKind::Work);
    assert_eq!(snap.cycle_position, 1);
    assert_eq!(snap.completed_work_count, 4);
}

#[test]
fn manual_mode_switches_do_not_count() {
    let mut machine = SessionStateMachine::default();
    machine.start();
    for _ in 0..1499 {
        machine.tick();
    }
    assert_eq!(machine.snapshot().time_left, 1);
    machine.change_mode(IntervalKind::ShortBreak);
    machine.change_mode(IntervalKind::Work);
    let snap = machine.snapshot();
    assert_eq!(snap.completed_work_count, 0);
    assert_eq!(snap.cycle_position, 1);
    assert_eq!(snap.time_left, 1500);
}

#[tokio::test(start_paused = true)]
async fn driver_counts_down_with_interval_ticker() {
    let config = TimerConfig::new(3, 2, 5).unwrap();
    let machine = SessionStateMachine::new(config, SilentSink);
    let driver = SessionDriver::new(machine, IntervalTicker::every_second());
    let snapshots = driver.subscribe_snapshots();
    let mut events = driver.subscribe_events();

    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(driver.run(rx));

    tx.send(Command::Start).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(snapshots.borrow().time_left, 2);
    assert_eq!(snapshots.borrow().state, RunState::Running);

    tx.send(Command::Pause).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(snapshots.borrow().time_left, 2);
    assert_eq!(snapshots.borrow().state, RunState::Paused);

    tx.send(Command::Start).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    {
        let snap = snapshots.borrow();
        assert_eq!(snap.mode, IntervalKind::ShortBreak);
        assert_eq!(snap.state, RunState::Idle);
        assert_eq!(snap.time_left, 2);
        assert_eq!(snap.completed_work_count, 1);
    }

    // Idle after completion: no further countdown.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(snapshots.borrow().time_left, 2);

    drop(tx);
    let last = handle.await.unwrap();
    assert_eq!(last.mode, IntervalKind::ShortBreak);

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen
        .iter()
        .any(|e| matches!(e, Event::IntervalCompleted { .. })));
}

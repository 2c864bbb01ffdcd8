// Behavioural properties of the timer engine, driven through its public
// control surface only.

use std::time::Instant;

use pomofocus::alarm::{Alarm, AlarmPlayer, SilentPlayer, SoundResource};
use pomofocus::config::TimerConfiguration;
use pomofocus::timer::{Phase, TickOutcome, TimerEngine, TimerState};

fn engine(work_min: u32, break_min: u32) -> TimerEngine<SilentPlayer> {
    TimerEngine::new(
        TimerConfiguration::from_minutes(work_min, break_min).unwrap(),
        Alarm::new(SilentPlayer::new(), SoundResource::Builtin, 0.5),
    )
}

fn tick_n<P: AlarmPlayer>(engine: &mut TimerEngine<P>, n: u32) {
    for _ in 0..n {
        engine.tick(Instant::now());
    }
}

#[test]
fn one_minute_scenario() {
    let mut e = engine(1, 1);

    e.start();
    tick_n(&mut e, 60);
    assert_eq!(
        e.state(),
        TimerState {
            phase: Phase::Break,
            remaining_secs: 60,
            is_running: false,
            completed_work_sessions: 1,
        }
    );

    e.start();
    tick_n(&mut e, 60);
    assert_eq!(
        e.state(),
        TimerState {
            phase: Phase::Work,
            remaining_secs: 60,
            is_running: false,
            completed_work_sessions: 1,
        }
    );
}

#[test]
fn one_minute_scenario_with_skip() {
    let mut e = engine(1, 1);
    e.start();
    tick_n(&mut e, 60);

    e.skip_break();
    assert_eq!(
        e.state(),
        TimerState {
            phase: Phase::Work,
            remaining_secs: 60,
            is_running: true,
            completed_work_sessions: 1,
        }
    );
    assert_eq!(e.history().len(), 1);
}

#[test]
fn work_phase_length_matches_configuration() {
    for (work, brk) in [(1, 1), (2, 7), (25, 5), (90, 3600)] {
        let mut e = engine(work, brk);
        e.start();
        tick_n(&mut e, work * 60 - 1);
        assert_eq!(e.phase(), Phase::Work, "work={work}");
        assert_eq!(e.remaining_seconds(), 1);

        assert_eq!(
            e.tick(Instant::now()),
            TickOutcome::PhaseCompleted {
                finished: Phase::Work,
                next: Phase::Break
            }
        );
        assert_eq!(e.remaining_seconds(), brk * 60);
        assert!(!e.is_running());
        assert_eq!(e.completed_work_sessions(), 1);
    }
}

#[test]
fn reset_always_idles_at_phase_start() {
    let mut e = engine(2, 1);
    for ticks in [0, 1, 60, 119] {
        e.start();
        tick_n(&mut e, ticks);
        e.reset();
        assert!(!e.is_running());
        assert_eq!(e.remaining_seconds(), 120);
        assert_eq!(e.progress_ratio(), 0.0);
    }
}

#[test]
fn progress_ratio_endpoints() {
    let mut e = engine(3, 1);
    assert_eq!(e.progress_ratio(), 0.0);
    e.start();
    tick_n(&mut e, 179);
    assert!(e.progress_ratio() < 1.0);
    assert!(e.progress_ratio() > 0.99);

    // the last tick completes the phase and starts the next at zero progress
    e.tick(Instant::now());
    assert_eq!(e.progress_ratio(), 0.0);
}

#[test]
fn sessions_equal_history_length() {
    let mut e = TimerEngine::new(
        TimerConfiguration::from_seconds(2, 1).unwrap(),
        Alarm::new(SilentPlayer::new(), SoundResource::Builtin, 0.5),
    );
    for round in 0..4 {
        e.start();
        tick_n(&mut e, 2);
        if round % 2 == 0 {
            e.skip_break();
        } else {
            e.start();
            tick_n(&mut e, 1);
        }
        assert_eq!(e.completed_work_sessions(), e.history().len());
    }
    assert_eq!(e.completed_work_sessions(), 4);
}

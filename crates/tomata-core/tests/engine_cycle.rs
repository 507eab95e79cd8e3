//! Full-cycle tests for the timer engine.

use std::time::Duration;

use proptest::prelude::*;
use tomata_core::{Event, Phase, TimerConfig, TimerEngine, Transition, TransitionCause};

fn seconds(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

fn cycle_config(sessions_before_long_break: u32) -> TimerConfig {
    TimerConfig {
        work: seconds(3),
        short_break: seconds(2),
        long_break: seconds(4),
        sessions_before_long_break,
    }
}

/// Tick the running engine until the next phase change and return it.
fn run_to_transition(engine: &mut TimerEngine) -> (Phase, Phase) {
    if !engine.is_running() {
        engine.play();
    }
    for _ in 0..100 {
        for event in engine.tick() {
            if let Event::PhaseChanged { from, to, .. } = event {
                return (from, to);
            }
        }
    }
    panic!("engine never transitioned");
}

#[test]
fn four_session_cadence_produces_the_classic_sequence() {
    let mut engine = TimerEngine::new(cycle_config(4));
    let mut breaks = Vec::new();
    while breaks.len() < 8 {
        let (from, to) = run_to_transition(&mut engine);
        if from == Phase::Work {
            breaks.push(to);
        } else {
            assert_eq!(to, Phase::Work);
        }
    }
    assert_eq!(
        breaks,
        vec![
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::LongBreak,
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::LongBreak,
        ]
    );
    assert_eq!(engine.completed_pomodoros(), 8);
}

#[test]
fn every_second_session_earns_a_long_break() {
    let mut engine = TimerEngine::new(cycle_config(2));
    let mut breaks = Vec::new();
    while breaks.len() < 4 {
        let (from, to) = run_to_transition(&mut engine);
        if from == Phase::Work {
            breaks.push(to);
        }
    }
    assert_eq!(
        breaks,
        vec![
            Phase::ShortBreak,
            Phase::LongBreak,
            Phase::ShortBreak,
            Phase::LongBreak,
        ]
    );
}

#[test]
fn remaining_time_is_exact_on_every_phase_entry() {
    let config = cycle_config(4);
    let mut engine = TimerEngine::new(config);
    assert_eq!(engine.remaining(), config.work);
    for _ in 0..6 {
        run_to_transition(&mut engine);
        assert_eq!(engine.remaining(), engine.phase().duration(&config));
    }
}

#[test]
fn stopping_every_work_session_never_counts_a_pomodoro() {
    let mut engine = TimerEngine::new(cycle_config(4));
    for _ in 0..5 {
        assert_eq!(engine.phase(), Phase::Work);
        engine.play();
        engine.tick();
        engine.stop();
        assert!(engine.phase().is_break());
        // Walk the idle break back to work by exhaustion.
        run_to_transition(&mut engine);
    }
    assert_eq!(engine.completed_pomodoros(), 0);
}

proptest! {
    /// The Kth completed work session is followed by a long break exactly
    /// when K is a multiple of the cadence.
    #[test]
    fn long_break_lands_on_cadence_multiples(n in 1u32..10, k in 1u32..50) {
        let config = cycle_config(n);
        let transition =
            Transition::plan(Phase::Work, TransitionCause::Exhausted, k - 1, &config);
        let expected = if k % n == 0 { Phase::LongBreak } else { Phase::ShortBreak };
        prop_assert_eq!(transition.to, expected);
        prop_assert_eq!(transition.completed_delta, 1);
    }
}

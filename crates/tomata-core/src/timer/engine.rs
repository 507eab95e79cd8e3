//! Timer engine implementation.
//!
//! The engine is a deterministic state machine. It does not keep time and
//! spawns no threads -- the driver calls `tick()` once per elapsed second
//! and delivers the returned events.
//!
//! ## Cycle
//!
//! ```text
//! Work -> (ShortBreak | LongBreak) -> Work -> ...
//! ```
//!
//! A countdown that reaches zero installs the successor phase and keeps
//! running so the cycle continues unattended. An explicit stop installs the
//! successor without starting it.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::phase::{Phase, Transition, TransitionCause};
use crate::config::TimerConfig;
use crate::events::Event;

const TICK: Duration = Duration::from_secs(1);

/// Read-only view of the engine for queries and status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining: Duration,
    pub completed_pomodoros: u32,
    pub running: bool,
}

/// Core timer state machine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    config: TimerConfig,
    phase: Phase,
    /// Remaining time for the current phase, always within
    /// `[0, phase.duration(config)]`.
    remaining: Duration,
    completed: u32,
    running: bool,
}

impl TimerEngine {
    /// Create an engine in the Work phase with the full work duration left.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            phase: Phase::Work,
            remaining: Phase::Work.duration(&config),
            completed: 0,
            running: false,
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining: self.remaining,
            completed_pomodoros: self.completed,
            running: self.running,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown.
    ///
    /// A second play without an intervening pause is a no-op, so the driver
    /// never ends up with two tick sources.
    pub fn play(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        debug!(phase = %self.phase, remaining_secs = self.remaining.as_secs(), "play");
        Some(Event::Started {
            phase: self.phase,
            remaining: self.remaining,
            at: Utc::now(),
        })
    }

    /// Halt the countdown, keeping the remaining time. Pausing an idle
    /// engine is a no-op.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        debug!(phase = %self.phase, remaining_secs = self.remaining.as_secs(), "pause");
        Some(Event::Paused {
            phase: self.phase,
            remaining: self.remaining,
            at: Utc::now(),
        })
    }

    /// Halt the countdown, reset the current phase to its full duration and
    /// install its successor without starting it.
    ///
    /// Safe from any state, including a phase that never ran.
    pub fn stop(&mut self) -> Vec<Event> {
        self.running = false;
        self.remaining = self.phase.duration(&self.config);
        let reset = Event::TimeUpdated {
            phase: self.phase,
            remaining: self.remaining,
            at: Utc::now(),
        };
        let transition =
            Transition::plan(self.phase, TransitionCause::Stopped, self.completed, &self.config);
        let changed = self.apply(transition);
        vec![reset, changed]
    }

    /// Advance the countdown by one elapsed second.
    ///
    /// Returns the time update, or the phase change once the countdown is
    /// exhausted. Ticks arriving while not running are dropped.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining = self.remaining.saturating_sub(TICK);
        if !self.remaining.is_zero() {
            return vec![Event::TimeUpdated {
                phase: self.phase,
                remaining: self.remaining,
                at: Utc::now(),
            }];
        }
        let transition = Transition::plan(
            self.phase,
            TransitionCause::Exhausted,
            self.completed,
            &self.config,
        );
        let changed = self.apply(transition);
        // The successor begins counting immediately; surface its full
        // duration right after the change.
        let entered = Event::TimeUpdated {
            phase: self.phase,
            remaining: self.remaining,
            at: Utc::now(),
        };
        vec![changed, entered]
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Install the successor phase. The completed-session counter advances
    /// before the phase is replaced; exhaustion transitions keep the engine
    /// running so the cycle continues unattended.
    fn apply(&mut self, transition: Transition) -> Event {
        self.completed += transition.completed_delta;
        self.phase = transition.to;
        self.remaining = transition.to.duration(&self.config);
        self.running = transition.auto_starts();
        info!(
            from = %transition.from,
            to = %transition.to,
            completed = self.completed,
            auto_started = self.running,
            "phase change"
        );
        Event::PhaseChanged {
            from: transition.from,
            to: transition.to,
            cause: transition.cause,
            auto_started: self.running,
            at: Utc::now(),
        }
    }
}

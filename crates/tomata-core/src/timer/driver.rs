//! Background timer driver.
//!
//! Owns a [`TimerEngine`] on a dedicated tokio task. A one-second interval
//! is the tick source while the countdown is live; control commands arrive
//! over a channel and are applied between ticks. Everything happens on the
//! one task, so sinks are invoked synchronously and in order.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use super::engine::{TimerEngine, TimerSnapshot};
use super::phase::Phase;
use crate::config::TimerConfig;
use crate::events::Event;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Time-update sink: (phase, remaining time).
pub type TimeUpdateFn = Box<dyn FnMut(Phase, Duration) + Send>;
/// State-change sink: (previous phase, new phase).
pub type StateChangeFn = Box<dyn FnMut(Phase, Phase) + Send>;

/// Notification sinks invoked from the driver task.
///
/// Absent sinks are no-ops. Sinks run on the timer's own task and must not
/// block; forward to a channel for anything slow.
#[derive(Default)]
pub struct Callbacks {
    pub on_time_update: Option<TimeUpdateFn>,
    pub on_state_change: Option<StateChangeFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_update(mut self, f: impl FnMut(Phase, Duration) + Send + 'static) -> Self {
        self.on_time_update = Some(Box::new(f));
        self
    }

    pub fn state_change(mut self, f: impl FnMut(Phase, Phase) + Send + 'static) -> Self {
        self.on_state_change = Some(Box::new(f));
        self
    }
}

enum Command {
    Play,
    Pause,
    Stop,
}

/// Handle to a timer running on a background task.
///
/// Dropping the handle tears the task (and any live ticker) down.
pub struct Timer {
    config: TimerConfig,
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshot_rx: watch::Receiver<TimerSnapshot>,
    task: JoinHandle<()>,
}

impl Timer {
    /// Spawn a timer on the current tokio runtime.
    ///
    /// The initial Work phase is installed with its full duration; nothing
    /// counts down until [`play`](Self::play).
    pub fn spawn(config: TimerConfig, callbacks: Callbacks) -> Self {
        let engine = TimerEngine::new(config);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
        let task = tokio::spawn(drive(engine, cmd_rx, snapshot_tx, callbacks));
        Self {
            config,
            cmd_tx,
            snapshot_rx,
            task,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Current phase, remaining time, session count and running flag.
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.snapshot_rx.borrow()
    }

    pub fn phase(&self) -> Phase {
        self.snapshot().phase
    }

    pub fn remaining(&self) -> Duration {
        self.snapshot().remaining
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().running
    }

    /// Work sessions completed by exhaustion since the timer was created.
    pub fn completed_pomodoros(&self) -> u32 {
        self.snapshot().completed_pomodoros
    }

    // ── Control surface ──────────────────────────────────────────────

    pub fn play(&self) {
        self.send(Command::Play);
    }

    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    fn send(&self, command: Command) {
        // A closed channel means the runtime is shutting down; the control
        // surface stays infallible.
        let _ = self.cmd_tx.send(command);
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The driver loop: single owner of the engine, the ticker and the sinks.
///
/// While the engine runs, a tick and a command race; while it is idle only
/// commands are awaited, so no tick source exists while paused or stopped.
async fn drive(
    mut engine: TimerEngine,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<TimerSnapshot>,
    mut callbacks: Callbacks,
) {
    let mut ticker: Option<Interval> = None;

    loop {
        let events = match ticker.as_mut() {
            Some(interval) => tokio::select! {
                _ = interval.tick() => engine.tick(),
                command = commands.recv() => match command {
                    Some(command) => handle(&mut engine, command),
                    None => break,
                },
            },
            None => match commands.recv().await {
                Some(command) => handle(&mut engine, command),
                None => break,
            },
        };

        // An auto-started successor gets a fresh one-second cadence; a pause
        // or stop releases the ticker outright.
        let phase_restarted = events
            .iter()
            .any(|event| matches!(event, Event::PhaseChanged { auto_started: true, .. }));
        if engine.is_running() {
            if ticker.is_none() || phase_restarted {
                ticker = Some(new_ticker());
            }
        } else {
            ticker = None;
        }

        let _ = snapshots.send(engine.snapshot());
        for event in &events {
            deliver(&mut callbacks, event);
        }
    }
    debug!("timer driver finished");
}

fn handle(engine: &mut TimerEngine, command: Command) -> Vec<Event> {
    match command {
        Command::Play => engine.play().into_iter().collect(),
        Command::Pause => engine.pause().into_iter().collect(),
        Command::Stop => engine.stop(),
    }
}

fn new_ticker() -> Interval {
    // First fire one full second from now: a resumed phase waits a whole
    // second before its next decrement.
    let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

fn deliver(callbacks: &mut Callbacks, event: &Event) {
    match event {
        Event::TimeUpdated { phase, remaining, .. } => {
            if let Some(sink) = callbacks.on_time_update.as_mut() {
                sink(*phase, *remaining);
            }
        }
        Event::PhaseChanged { from, to, .. } => {
            if let Some(sink) = callbacks.on_state_change.as_mut() {
                sink(*from, *to);
            }
        }
        Event::Started { .. } | Event::Paused { .. } => {}
    }
}

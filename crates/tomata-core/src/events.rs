use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TransitionCause};

/// Every observable change in the timer produces an `Event`.
///
/// The driver delivers them to the caller's sinks in the order the engine
/// emitted them; a `PhaseChanged` always lands after the last `TimeUpdated`
/// of the outgoing phase and before the first one of its successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The countdown started or resumed.
    Started {
        phase: Phase,
        remaining: Duration,
        at: DateTime<Utc>,
    },
    /// The countdown was halted with time left on the clock.
    Paused {
        phase: Phase,
        remaining: Duration,
        at: DateTime<Utc>,
    },
    /// One second elapsed, or a phase was reset/entered with its full
    /// duration.
    TimeUpdated {
        phase: Phase,
        remaining: Duration,
        at: DateTime<Utc>,
    },
    /// The current phase was replaced. Emitted exactly once per transition.
    PhaseChanged {
        from: Phase,
        to: Phase,
        cause: TransitionCause,
        /// Whether the successor's countdown began immediately.
        auto_started: bool,
        at: DateTime<Utc>,
    },
}

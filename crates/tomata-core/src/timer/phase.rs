use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TimerConfig;

/// The activity the timer is counting down for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// The configured length of this phase.
    pub fn duration(self, config: &TimerConfig) -> Duration {
        match self {
            Phase::Work => config.work,
            Phase::ShortBreak => config.short_break,
            Phase::LongBreak => config.long_break,
        }
    }

    pub fn is_work(self) -> bool {
        matches!(self, Phase::Work)
    }

    pub fn is_break(self) -> bool {
        !self.is_work()
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a phase was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// The countdown reached zero.
    Exhausted,
    /// The caller requested an explicit stop.
    Stopped,
}

/// A planned phase replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub cause: TransitionCause,
    /// How far the completed-work-session counter advances (0 or 1).
    pub completed_delta: u32,
}

impl Transition {
    /// Plan the successor of `from` for the given cause.
    ///
    /// Leaving Work by exhaustion counts the session first; the long-break
    /// cadence is evaluated against the updated count. An explicit stop
    /// never counts the session. Breaks always return to Work.
    pub fn plan(
        from: Phase,
        cause: TransitionCause,
        completed: u32,
        config: &TimerConfig,
    ) -> Self {
        let (to, completed_delta) = match from {
            Phase::Work => {
                let delta = match cause {
                    TransitionCause::Exhausted => 1,
                    TransitionCause::Stopped => 0,
                };
                // A cadence of zero never selects a long break.
                let long_break_due = (completed + delta)
                    .checked_rem(config.sessions_before_long_break)
                    .map(|rem| rem == 0)
                    .unwrap_or(false);
                let to = if long_break_due {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                };
                (to, delta)
            }
            Phase::ShortBreak | Phase::LongBreak => (Phase::Work, 0),
        };
        Self {
            from,
            to,
            cause,
            completed_delta,
        }
    }

    /// Exhaustion transitions start their successor immediately; explicit
    /// stops leave it waiting for a play.
    pub fn auto_starts(&self) -> bool {
        self.cause == TransitionCause::Exhausted
    }
}

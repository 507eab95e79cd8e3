//! # Tomata Core Library
//!
//! This library provides the core logic for the Tomata work/break interval
//! timer: a recurring cycle of a work phase followed by a short or long
//! break, driven by a one-second tick.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a synchronous, deterministic state machine. It keeps
//!   no time of its own -- a driver calls `tick()` once per elapsed second
//!   and delivers the returned events.
//! - **Timer**: the orchestrator. Owns an engine on a background tokio task,
//!   runs the one-second tick source while the countdown is live, and
//!   forwards events to caller-supplied sinks.
//! - **Settings**: TOML-based configuration persistence.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`Timer`]: background driver with the play/pause/stop control surface
//! - [`TimerConfig`]: cycle durations and the long-break cadence
//! - [`Settings`]: configuration file management

pub mod config;
pub mod error;
pub mod events;
pub mod settings;
pub mod timer;

pub use config::TimerConfig;
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use settings::Settings;
pub use timer::{
    Callbacks, Phase, Timer, TimerEngine, TimerSnapshot, Transition, TransitionCause,
};

mod driver;
mod engine;
mod phase;

pub use driver::{Callbacks, StateChangeFn, TimeUpdateFn, Timer};
pub use engine::{TimerEngine, TimerSnapshot};
pub use phase::{Phase, Transition, TransitionCause};

mod interval;
mod machine;
mod session;
mod transition;

pub use interval::{IntervalKind, TimerConfig, CYCLE_LENGTH};
pub use machine::SessionStateMachine;
pub use session::{RunState, Session, Snapshot};
pub use transition::{transition, Completion, Input};

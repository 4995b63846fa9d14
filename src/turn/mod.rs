//! Turn flow: the state machine that owns a session, and the timer queue
//! that paces delayed steps.

pub mod machine;
pub mod schedule;

pub use machine::{RollOutcome, TurnStateMachine};
pub use schedule::{Scheduler, TimerEvent};

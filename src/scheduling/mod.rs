mod arming;
mod scheduler;

pub use arming::{ArmDecision, SkipReason, TickOutcome, apply_tick, evaluate_arm};
pub use scheduler::Scheduler;

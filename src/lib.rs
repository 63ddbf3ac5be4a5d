//! Cycle-window scheduling for recurring compliance jobs.
//!
//! A recurring job is described by its [`Frequency`](frequency::Frequency), its anchor
//! (`next_execution_date`, the end of the current cycle window) and the instant of its last
//! execution. From those values, and an explicit "now", the crate derives whether the job is
//! upcoming, open, completed or overdue, whether it may be executed, and how the anchor moves
//! after an execution or after missed cycles.
//!
//! The functions in [`scheduler::cycle`] are pure. [`scheduler::CycleScheduler`] is a thin
//! wrapper that reads "now" from an injected [`Clock`](scheduler::clock::Clock).

pub mod error;
pub mod frequency;
pub mod job_state;
pub mod scheduler;

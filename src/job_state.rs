use crate::error::{SchedulerError, SchedulerResult};
use crate::frequency::Frequency;
use crate::scheduler::cycle::{self, CycleWindow, DerivedStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Execution state of one recurring job, as stored by the caller.
///
/// `next_execution_date` is the anchor closing the current cycle window. It only moves
/// through [`JobState::record_execution`] or [`JobState::catch_up`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobState {
    pub last_execution_date: Option<DateTime<Utc>>,
    pub next_execution_date: DateTime<Utc>,
    pub frequency: Frequency,
}

/// Result of repairing an anchor that fell into the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchUp {
    pub state: JobState,
    pub missed_cycles: u32,
}

impl JobState {
    /// State of a job that has never been executed
    pub fn new(next_execution_date: DateTime<Utc>, frequency: Frequency) -> Self {
        Self {
            last_execution_date: None,
            next_execution_date,
            frequency,
        }
    }

    pub fn cycle_window(&self) -> SchedulerResult<CycleWindow> {
        cycle::get_cycle_window(self.next_execution_date, self.frequency)
    }

    pub fn has_executed_this_cycle(&self) -> SchedulerResult<bool> {
        let window = self.cycle_window()?;
        Ok(cycle::has_executed_this_cycle(
            self.last_execution_date,
            window.cycle_start,
            window.cycle_end,
        ))
    }

    pub fn can_execute(&self, now: DateTime<Utc>) -> SchedulerResult<bool> {
        cycle::can_execute_job(
            self.last_execution_date,
            self.next_execution_date,
            self.frequency,
            now,
        )
    }

    pub fn status(&self, now: DateTime<Utc>) -> SchedulerResult<DerivedStatus> {
        cycle::derive_job_status(
            self.last_execution_date,
            self.next_execution_date,
            self.frequency,
            now,
        )
    }

    /// Accept an execution happening at `executed_at` and return the state to persist.
    ///
    /// Rejected when the current window is not open yet or already has an execution.
    /// The returned state records `executed_at` and has its anchor advanced by one cycle.
    /// Serializing concurrent calls for the same job is up to the caller.
    pub fn record_execution(&self, executed_at: DateTime<Utc>) -> SchedulerResult<JobState> {
        let window = self.cycle_window()?;

        if executed_at.date_naive() < window.cycle_start.date_naive() {
            warn!(
                "Cycle Scheduler: Rejected execution at {}, cycle opens at {}",
                executed_at, window.cycle_start
            );
            return Err(SchedulerError::CycleNotOpen {
                cycle_start: window.cycle_start,
            });
        }

        if let Some(last_execution_date) = self.last_execution_date {
            if window.contains(last_execution_date) {
                warn!(
                    "Cycle Scheduler: Rejected execution at {}, cycle already executed at {}",
                    executed_at, last_execution_date
                );
                return Err(SchedulerError::AlreadyExecuted {
                    last_execution_date,
                });
            }
        }

        let next_execution_date =
            cycle::advance_next_execution_date(self.next_execution_date, self.frequency)?;
        debug!(
            "Cycle Scheduler: Recorded {} execution at {}",
            self.frequency, executed_at
        );

        Ok(JobState {
            last_execution_date: Some(executed_at),
            next_execution_date,
            frequency: self.frequency,
        })
    }

    /// Advance the anchor past `now` if cycles were missed. `last_execution_date` is kept.
    pub fn catch_up(&self, now: DateTime<Utc>) -> SchedulerResult<CatchUp> {
        let (next_execution_date, missed_cycles) =
            cycle::catch_up_missed_cycles_counted(self.next_execution_date, self.frequency, now)?;

        Ok(CatchUp {
            state: JobState {
                next_execution_date,
                ..*self
            },
            missed_cycles,
        })
    }
}

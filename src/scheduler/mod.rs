pub mod clock;
pub mod cycle;

use crate::error::SchedulerResult;
use crate::job_state::{CatchUp, JobState};
use clock::{Clock, FixedClock, SystemClock};
use cycle::DerivedStatus;
use tracing::info;

/// Reads "now" from a [`Clock`] and applies the cycle rules to caller-owned job state.
///
/// The scheduler holds no job state and can be shared across threads using `.clone()`.
/// All time-dependent decisions read the clock exactly once per call.
#[derive(Debug, Clone)]
pub struct CycleScheduler<C>
where
    C: Clock,
{
    clock: C,
}

impl CycleScheduler<SystemClock> {
    /// Create a new scheduler that reads the system clock in UTC
    pub fn new_in_utc() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl CycleScheduler<FixedClock> {
    /// Create a new scheduler frozen at `now`
    pub fn frozen_at(now: chrono::DateTime<chrono::Utc>) -> Self {
        Self::with_clock(FixedClock(now))
    }
}

impl<C> CycleScheduler<C>
where
    C: Clock,
{
    /// Create a new scheduler that uses the specified clock
    ///
    /// # Arguments
    ///
    /// * `clock` - The source of the current instant
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether the job may be executed right now
    pub fn can_execute(&self, job: &JobState) -> SchedulerResult<bool> {
        job.can_execute(self.clock.now())
    }

    /// The derived status of the job right now
    pub fn status(&self, job: &JobState) -> SchedulerResult<DerivedStatus> {
        job.status(self.clock.now())
    }

    /// Accept an execution happening right now.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cycle_scheduler::frequency::Frequency;
    /// use cycle_scheduler::job_state::JobState;
    /// use cycle_scheduler::scheduler::CycleScheduler;
    ///
    /// let scheduler = CycleScheduler::frozen_at(Utc.with_ymd_and_hms(2026, 2, 5, 9, 0, 0).unwrap());
    /// let job = JobState::new(Utc.with_ymd_and_hms(2026, 2, 20, 0, 0, 0).unwrap(), Frequency::Monthly);
    ///
    /// let executed = scheduler.record_execution(&job).unwrap();
    /// assert_eq!(executed.next_execution_date, Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap());
    ///
    /// // the next cycle opens on 2026-02-20
    /// assert!(scheduler.record_execution(&executed).is_err());
    /// ```
    ///
    /// # Returns
    ///
    /// The state to persist, or an error if the current cycle is not open or already executed
    pub fn record_execution(&self, job: &JobState) -> SchedulerResult<JobState> {
        job.record_execution(self.clock.now())
    }

    /// Repair an anchor that fell into the past because cycles were missed.
    ///
    /// Meant for periodic maintenance runs rather than the interactive request path.
    pub fn catch_up(&self, job: &JobState) -> SchedulerResult<CatchUp> {
        let caught_up = job.catch_up(self.clock.now())?;
        if caught_up.missed_cycles > 0 {
            info!(
                missed_cycles = caught_up.missed_cycles,
                "Cycle Scheduler: Anchor moved from {} to {}",
                job.next_execution_date,
                caught_up.state.next_execution_date
            );
        }
        Ok(caught_up)
    }
}

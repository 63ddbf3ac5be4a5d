//! Pure cycle-window arithmetic for recurring jobs.
//!
//! Every function here is deterministic: "now" is always an argument, never read from
//! the system clock. Instants are compared with full precision, while the
//! "is the window open" decisions are made on UTC calendar days.

use crate::error::SchedulerResult;
use crate::frequency::Frequency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::debug;

/// The half-open interval `[cycle_start, cycle_end)` in which one execution is expected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleWindow {
    pub cycle_start: DateTime<Utc>,
    pub cycle_end: DateTime<Utc>,
}

impl CycleWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.cycle_start <= instant && instant < self.cycle_end
    }
}

/// Status of a job, derived on every read and never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DerivedStatus {
    Upcoming,
    Open,
    Completed,
    Overdue,
}

impl DerivedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DerivedStatus::Upcoming => "UPCOMING",
            DerivedStatus::Open => "OPEN",
            DerivedStatus::Completed => "COMPLETED",
            DerivedStatus::Overdue => "OVERDUE",
        }
    }
}

impl Display for DerivedStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the cycle window ending at the anchor `next_execution_date`.
///
/// The window start is the anchor stepped back by one `frequency` cycle.
pub fn get_cycle_window(
    next_execution_date: DateTime<Utc>,
    frequency: Frequency,
) -> SchedulerResult<CycleWindow> {
    let cycle_end = next_execution_date;
    let cycle_start = frequency.step_backward(cycle_end)?;
    Ok(CycleWindow {
        cycle_start,
        cycle_end,
    })
}

/// Whether `last_execution_date` falls inside `[cycle_start, cycle_end)`.
///
/// A job that has never been executed has not executed in any cycle.
pub fn has_executed_this_cycle(
    last_execution_date: Option<DateTime<Utc>>,
    cycle_start: DateTime<Utc>,
    cycle_end: DateTime<Utc>,
) -> bool {
    match last_execution_date {
        Some(executed_at) => cycle_start <= executed_at && executed_at < cycle_end,
        None => false,
    }
}

/// Whether the job may be executed at `now`.
///
/// The window has to be open on the day of `now` (day granularity), and no execution may
/// have been recorded inside the exact window (instant granularity). An overdue job that
/// was never executed can still be executed.
pub fn can_execute_job(
    last_execution_date: Option<DateTime<Utc>>,
    next_execution_date: DateTime<Utc>,
    frequency: Frequency,
    now: DateTime<Utc>,
) -> SchedulerResult<bool> {
    let window = get_cycle_window(next_execution_date, frequency)?;
    if now.date_naive() < window.cycle_start.date_naive() {
        return Ok(false);
    }

    Ok(!has_executed_this_cycle(
        last_execution_date,
        window.cycle_start,
        window.cycle_end,
    ))
}

/// Derive the job status at `now`.
///
/// An execution inside the window always wins, so `Completed` is checked before any of the
/// day based classifications.
pub fn derive_job_status(
    last_execution_date: Option<DateTime<Utc>>,
    next_execution_date: DateTime<Utc>,
    frequency: Frequency,
    now: DateTime<Utc>,
) -> SchedulerResult<DerivedStatus> {
    let window = get_cycle_window(next_execution_date, frequency)?;
    let today = now.date_naive();

    let status = if has_executed_this_cycle(
        last_execution_date,
        window.cycle_start,
        window.cycle_end,
    ) {
        DerivedStatus::Completed
    } else if today >= window.cycle_end.date_naive() {
        DerivedStatus::Overdue
    } else if today >= window.cycle_start.date_naive() {
        DerivedStatus::Open
    } else {
        DerivedStatus::Upcoming
    };

    Ok(status)
}

/// Move the anchor forward by one cycle after an accepted execution.
pub fn advance_next_execution_date(
    current_next_execution_date: DateTime<Utc>,
    frequency: Frequency,
) -> SchedulerResult<DateTime<Utc>> {
    let next = frequency.step_forward(current_next_execution_date)?;
    debug!(
        "Cycle Scheduler: Advanced {} anchor from {} to {}",
        frequency, current_next_execution_date, next
    );
    Ok(next)
}

/// Advance the anchor until it lies strictly after `now`.
///
/// An anchor already in the future is returned unchanged.
pub fn catch_up_missed_cycles(
    current_next_execution_date: DateTime<Utc>,
    frequency: Frequency,
    now: DateTime<Utc>,
) -> SchedulerResult<DateTime<Utc>> {
    catch_up_missed_cycles_counted(current_next_execution_date, frequency, now)
        .map(|(anchor, _)| anchor)
}

/// Same as [`catch_up_missed_cycles`], also returning how many cycles were skipped.
pub fn catch_up_missed_cycles_counted(
    current_next_execution_date: DateTime<Utc>,
    frequency: Frequency,
    now: DateTime<Utc>,
) -> SchedulerResult<(DateTime<Utc>, u32)> {
    let mut anchor = current_next_execution_date;
    let mut missed_cycles = 0u32;

    // every step strictly increases the anchor, so this terminates
    while anchor <= now {
        anchor = frequency.step_forward(anchor)?;
        missed_cycles += 1;
    }

    if missed_cycles > 0 {
        debug!(
            missed_cycles,
            "Cycle Scheduler: Caught up {} anchor from {} to {}",
            frequency,
            current_next_execution_date,
            anchor
        );
    }

    Ok((anchor, missed_cycles))
}

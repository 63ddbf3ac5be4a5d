use crate::frequency::Frequency;
use chrono::{DateTime, Utc};

/// Error type returned by the cycle scheduler
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),
    #[error("Stepping {date} by one {frequency} cycle leaves the supported date range")]
    DateOutOfRange {
        date: DateTime<Utc>,
        frequency: Frequency,
    },
    #[error("Cycle starting at {cycle_start} is not open yet")]
    CycleNotOpen { cycle_start: DateTime<Utc> },
    #[error("Job already executed in the current cycle (last execution at {last_execution_date})")]
    AlreadyExecuted { last_execution_date: DateTime<Utc> },
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

use crate::error::{SchedulerError, SchedulerResult};
use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::warn;

const DAYS_PER_WEEK: u64 = 7;

/// How often a recurring job has to be executed.
///
/// Each member defines one calendar step, used both for sizing the cycle window
/// and for advancing the anchor after an execution. Month based steps clamp to the
/// last day of a shorter target month (Jan 31 + 1 month is Feb 28 or Feb 29).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::HalfYearly,
        Frequency::Yearly,
    ];

    /// Length of one step in calendar months, `None` for weekly
    pub fn months(self) -> Option<u32> {
        match self {
            Frequency::Weekly => None,
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::HalfYearly => Some(6),
            Frequency::Yearly => Some(12),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::HalfYearly => "half_yearly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Step `date` forward by exactly one cycle. Time of day is preserved.
    pub fn step_forward(self, date: DateTime<Utc>) -> SchedulerResult<DateTime<Utc>> {
        let stepped = match self.months() {
            None => date.checked_add_days(Days::new(DAYS_PER_WEEK)),
            Some(months) => date.checked_add_months(Months::new(months)),
        };
        stepped.ok_or_else(|| self.out_of_range(date))
    }

    /// Step `date` backward by exactly one cycle. Time of day is preserved.
    pub fn step_backward(self, date: DateTime<Utc>) -> SchedulerResult<DateTime<Utc>> {
        let stepped = match self.months() {
            None => date.checked_sub_days(Days::new(DAYS_PER_WEEK)),
            Some(months) => date.checked_sub_months(Months::new(months)),
        };
        stepped.ok_or_else(|| self.out_of_range(date))
    }

    fn out_of_range(self, date: DateTime<Utc>) -> SchedulerError {
        warn!(
            "Cycle Scheduler: Stepping {} by one {} cycle is out of the supported date range",
            date, self
        );
        SchedulerError::DateOutOfRange {
            date,
            frequency: self,
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == s)
            .ok_or_else(|| {
                warn!("Cycle Scheduler: Invalid frequency: {}", s);
                SchedulerError::InvalidFrequency(s.to_string())
            })
    }
}

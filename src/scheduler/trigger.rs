//! Daily time-of-day trigger
//!
//! The trigger is a pure function of wall-clock time: it knows when the next
//! run is due and moves that point one day forward each time it fires.
//! Local naive time is used throughout so the schedule follows the host's
//! clock the way a cron entry would.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::error::{SchedulerError, SchedulerResult};

/// Format of the configured run time
pub const RUN_AT_FORMAT: &str = "%H:%M";

/// Fires once per day at a fixed local time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrigger {
    run_at: NaiveTime,
    next_run: NaiveDateTime,
}

impl DailyTrigger {
    /// Create a trigger whose first firing is the next `run_at` after `now`
    pub fn new(run_at: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            run_at,
            next_run: next_run_after(run_at, now),
        }
    }

    /// Parse an `HH:MM` run time and create a trigger
    pub fn parse(run_at: &str, now: NaiveDateTime) -> SchedulerResult<Self> {
        let time = NaiveTime::parse_from_str(run_at.trim(), RUN_AT_FORMAT).map_err(|_| {
            SchedulerError::trigger_config(
                "run_at",
                format!("Invalid time format '{run_at}'. Expected HH:MM"),
            )
        })?;
        Ok(Self::new(time, now))
    }

    pub fn run_at(&self) -> NaiveTime {
        self.run_at
    }

    /// Next time the trigger will fire
    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// Whether a run is due at `now`; firing schedules the following day
    pub fn is_due(&mut self, now: NaiveDateTime) -> bool {
        if now < self.next_run {
            return false;
        }
        self.next_run = next_run_after(self.run_at, now);
        true
    }
}

/// First occurrence of `run_at` strictly after `now`
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use newsharvest::scheduler::trigger::next_run_after;
///
/// let run_at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
/// let late = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(23, 30, 0).unwrap();
/// let next = next_run_after(run_at, late);
/// assert_eq!(next, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_time(run_at));
/// ```
pub fn next_run_after(run_at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(run_at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

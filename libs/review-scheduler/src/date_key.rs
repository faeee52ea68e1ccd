//! Day keys for grouping and counting reviews.
//!
//! A [`DayKey`] is only ever used to bucket timestamps; stored dates stay full
//! timestamps pinned to [`REVIEW_HOUR`] so that a shift of a few hours in
//! either direction never moves a review onto a different calendar day.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Hour of day (UTC) every generated review is pinned to.
pub const REVIEW_HOUR: i64 = 12;

/// UTC calendar day of a timestamp, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Key for the UTC day containing `ts`.
    pub fn of(ts: DateTime<Utc>) -> Self {
        Self(ts.date_naive())
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Timestamp for `date` at the review hour.
pub fn at_review_hour(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc() + Duration::hours(REVIEW_HOUR)
}

/// Move `ts` to the review hour of its own UTC day.
pub fn normalize_to_review_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    at_review_hour(ts.date_naive())
}

/// Reject a scheduled date whose UTC day falls before the reference day.
pub fn ensure_not_before(reference: DateTime<Utc>, scheduled: DateTime<Utc>) -> Result<()> {
    let (date, reference) = (scheduled.date_naive(), reference.date_naive());
    if date < reference {
        return Err(ScheduleError::BeforeReference { date, reference });
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

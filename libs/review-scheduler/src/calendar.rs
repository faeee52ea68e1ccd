//! Grouping of scheduled reviews into calendar days.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::date_key::DayKey;
use crate::error::{Result, ScheduleError};

/// Days covered when the caller gives no end date.
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

/// Anything that can be placed on the review calendar.
pub trait CalendarEntry {
    fn scheduled_date(&self) -> DateTime<Utc>;
    fn is_completed(&self) -> bool;
}

/// Reviews falling on one day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay<T> {
    pub date: DayKey,
    pub pending_count: usize,
    pub total_count: usize,
    pub reviews: Vec<T>,
}

/// Group entries by UTC day, days ascending, entries kept in input order.
pub fn group_by_day<T, I>(entries: I) -> Vec<CalendarDay<T>>
where
    T: CalendarEntry,
    I: IntoIterator<Item = T>,
{
    let mut days: Vec<CalendarDay<T>> = Vec::new();
    let mut entries: Vec<T> = entries.into_iter().collect();
    entries.sort_by_key(|e| DayKey::of(e.scheduled_date()));

    for entry in entries {
        let key = DayKey::of(entry.scheduled_date());
        let pending = !entry.is_completed();
        match days.last_mut() {
            Some(day) if day.date == key => {
                day.total_count += 1;
                day.pending_count += usize::from(pending);
                day.reviews.push(entry);
            }
            _ => days.push(CalendarDay {
                date: key,
                pending_count: usize::from(pending),
                total_count: 1,
                reviews: vec![entry],
            }),
        }
    }

    days
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(ScheduleError::InvalidDateRange { from, to });
        }
        let end = to
            .succ_opt()
            .ok_or(ScheduleError::DateOutOfRange { date: to })?;
        Ok(Self { from, to, end })
    }

    /// Fill in missing bounds: `from` defaults to `today`, `to` to
    /// [`DEFAULT_WINDOW_DAYS`] after `from`.
    pub fn resolve(from: Option<NaiveDate>, to: Option<NaiveDate>, today: NaiveDate) -> Result<Self> {
        let from = from.unwrap_or(today);
        let to = match to {
            Some(to) => to,
            None => from
                .checked_add_days(Days::new(DEFAULT_WINDOW_DAYS))
                .ok_or(ScheduleError::DateOutOfRange { date: from })?,
        };
        Self::new(from, to)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// First instant of the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::default()).and_utc()
    }

    /// First instant after the window.
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::default()).and_utc()
    }
}

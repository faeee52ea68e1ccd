//! Error types for review-scheduler.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while validating scheduling input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("review days must not be empty")]
    EmptyOffsets,

    #[error("review day {value} must be a positive integer")]
    InvalidOffset { value: i64 },

    #[error("review day {value} exceeds the maximum of {max}")]
    OffsetTooLarge { value: i64, max: u32 },

    #[error("max reviews per day must be between 1 and {max}, got {value}")]
    InvalidMaxReviewsPerDay { value: i64, max: u32 },

    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("scheduled date {date} is before the reference date {reference}")]
    BeforeReference { date: NaiveDate, reference: NaiveDate },

    #[error("date {date} is out of the supported range")]
    DateOutOfRange { date: NaiveDate },
}

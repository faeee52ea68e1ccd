//! Review scheduling core shared by the backend service.
//!
//! Provides:
//! - Day keys for grouping timestamps by UTC calendar day
//! - Per-day load counting within a scope
//! - The load-balancing schedule allocator
//! - Day-offset normalization and settings validation
//! - The pending/completed review state machine
//! - Calendar grouping for the cross-kind review read

pub mod allocator;
pub mod calendar;
pub mod date_key;
pub mod error;
pub mod lifecycle;
pub mod load;
pub mod offsets;
pub mod types;

pub use allocator::{Allocation, ScheduleAllocator};
pub use calendar::{group_by_day, CalendarDay, CalendarEntry, DateWindow};
pub use date_key::{
    at_review_hour, ensure_not_before, normalize_to_review_hour, parse_day, DayKey, REVIEW_HOUR,
};
pub use error::{Result, ScheduleError};
pub use lifecycle::{Completion, ReviewStatus};
pub use load::LoadMap;
pub use offsets::{DayOffsets, DEFAULT_REVIEW_DAYS, MAX_DAY_OFFSET};
pub use types::{
    validate_max_reviews_per_day, ReviewKind, UserReviewSettings, DEFAULT_MAX_REVIEWS_PER_DAY,
    MAX_REVIEWS_PER_DAY_LIMIT,
};

//! Load-balancing schedule allocation.
//!
//! Offsets are placed greedily in ascending order. Each placement is counted
//! into the working [`LoadMap`] before the next offset is considered, so later
//! offsets in a batch see the earlier ones. A day at capacity pushes its review
//! to the emptier of the two neighbouring days; when both neighbours are full
//! as well, the review stays on its naive day and the overflow is accepted.

use chrono::{DateTime, Duration, Utc};

use crate::date_key::{normalize_to_review_hour, DayKey};
use crate::error::Result;
use crate::load::LoadMap;
use crate::offsets::DayOffsets;
use crate::types::validate_max_reviews_per_day;

/// The offset that is never moved by load balancing.
const FIXED_OFFSET: u32 = 1;

/// Placement chosen for one day offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub day_offset: u32,
    pub naive_date: DateTime<Utc>,
    pub scheduled_date: DateTime<Utc>,
}

impl Allocation {
    /// Days the review was moved from its naive date (-1, 0 or 1).
    pub fn shift_days(&self) -> i64 {
        (self.scheduled_date - self.naive_date).num_days()
    }

    pub fn is_shifted(&self) -> bool {
        self.scheduled_date != self.naive_date
    }
}

/// Greedy ±1 day allocator bounded by a daily capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleAllocator {
    max_reviews_per_day: u32,
}

impl ScheduleAllocator {
    pub fn new(max_reviews_per_day: u32) -> Result<Self> {
        let max_reviews_per_day = validate_max_reviews_per_day(i64::from(max_reviews_per_day))?;
        Ok(Self { max_reviews_per_day })
    }

    /// Place every offset relative to `reference`, updating `load` as it goes.
    ///
    /// `reference` is pinned to the review hour before any arithmetic. The
    /// result is in offset order, which is also ascending date order except
    /// where two adjacent offsets were shifted towards each other.
    pub fn allocate(
        &self,
        reference: DateTime<Utc>,
        offsets: &DayOffsets,
        load: &mut LoadMap,
    ) -> Vec<Allocation> {
        let reference = normalize_to_review_hour(reference);

        offsets
            .iter()
            .map(|day_offset| {
                let naive_date = reference + Duration::days(i64::from(day_offset));
                let scheduled_date = if day_offset == FIXED_OFFSET {
                    naive_date
                } else {
                    self.place(naive_date, load)
                };
                load.increment(DayKey::of(scheduled_date));

                Allocation {
                    day_offset,
                    naive_date,
                    scheduled_date,
                }
            })
            .collect()
    }

    fn place(&self, naive_date: DateTime<Utc>, load: &LoadMap) -> DateTime<Utc> {
        if load.count(DayKey::of(naive_date)) < self.max_reviews_per_day {
            return naive_date;
        }

        let before = naive_date - Duration::days(1);
        let after = naive_date + Duration::days(1);
        let before_count = load.count(DayKey::of(before));
        let after_count = load.count(DayKey::of(after));

        if before_count < self.max_reviews_per_day && before_count <= after_count {
            before
        } else if after_count < self.max_reviews_per_day {
            after
        } else {
            naive_date
        }
    }
}

//! Shared scheduling types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::offsets::DayOffsets;

/// Reviews allowed on a single day unless the user says otherwise.
pub const DEFAULT_MAX_REVIEWS_PER_DAY: u32 = 2;

/// Upper bound accepted for `max_reviews_per_day`.
pub const MAX_REVIEWS_PER_DAY_LIMIT: u32 = 1000;

/// The two kinds of reviewable entity.
///
/// Each kind is its own load-balancing pool: set reviews never count
/// against grammar capacity and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    Set,
    Grammar,
}

impl ReviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Grammar => "grammar",
        }
    }
}

/// Per-user scheduling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewSettings {
    pub default_review_days: DayOffsets,
    pub max_reviews_per_day: u32,
}

impl UserReviewSettings {
    /// Build validated settings from raw values.
    pub fn new<I>(default_review_days: I, max_reviews_per_day: i64) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        Ok(Self {
            default_review_days: DayOffsets::normalize(default_review_days)?,
            max_reviews_per_day: validate_max_reviews_per_day(max_reviews_per_day)?,
        })
    }
}

impl Default for UserReviewSettings {
    fn default() -> Self {
        Self {
            default_review_days: DayOffsets::default(),
            max_reviews_per_day: DEFAULT_MAX_REVIEWS_PER_DAY,
        }
    }
}

/// Check a daily capacity value.
pub fn validate_max_reviews_per_day(value: i64) -> Result<u32> {
    if value < 1 || value > i64::from(MAX_REVIEWS_PER_DAY_LIMIT) {
        return Err(ScheduleError::InvalidMaxReviewsPerDay {
            value,
            max: MAX_REVIEWS_PER_DAY_LIMIT,
        });
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_like_as_str() {
        for kind in [ReviewKind::Set, ReviewKind::Grammar] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn defaults() {
        let settings = UserReviewSettings::default();
        assert_eq!(settings.default_review_days.as_slice(), &[1, 5, 15, 35, 90]);
        assert_eq!(settings.max_reviews_per_day, 2);
    }

    #[test]
    fn new_normalizes_days() {
        let settings = UserReviewSettings::new([30, 7, 7], 3).unwrap();
        assert_eq!(settings.default_review_days.as_slice(), &[1, 7, 30]);
        assert_eq!(settings.max_reviews_per_day, 3);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            UserReviewSettings::new([1], 0),
            Err(ScheduleError::InvalidMaxReviewsPerDay { value: 0, .. })
        ));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(UserReviewSettings::default()).unwrap();
        assert_eq!(json["defaultReviewDays"], serde_json::json!([1, 5, 15, 35, 90]));
        assert_eq!(json["maxReviewsPerDay"], 2);
    }
}

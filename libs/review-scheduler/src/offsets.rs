//! Normalized day-offset lists.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Offsets used when the caller supplies none.
pub const DEFAULT_REVIEW_DAYS: [u32; 5] = [1, 5, 15, 35, 90];

/// Largest accepted offset (ten years).
pub const MAX_DAY_OFFSET: u32 = 3650;

/// Ascending, duplicate-free day offsets that always start with 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u32>")]
pub struct DayOffsets(Vec<u32>);

impl DayOffsets {
    /// Validate and normalize raw offsets.
    ///
    /// Values are sorted and deduplicated, and 1 is inserted when missing.
    /// Empty input, non-positive values and values above [`MAX_DAY_OFFSET`]
    /// are rejected.
    pub fn normalize<I>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut days = Vec::new();
        for value in raw {
            if value <= 0 {
                return Err(ScheduleError::InvalidOffset { value });
            }
            if value > i64::from(MAX_DAY_OFFSET) {
                return Err(ScheduleError::OffsetTooLarge {
                    value,
                    max: MAX_DAY_OFFSET,
                });
            }
            days.push(value as u32);
        }
        if days.is_empty() {
            return Err(ScheduleError::EmptyOffsets);
        }

        days.sort_unstable();
        days.dedup();
        if days[0] != 1 {
            days.insert(0, 1);
        }

        Ok(Self(days))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Offsets as database integers.
    pub fn to_i32_vec(&self) -> Vec<i32> {
        self.0.iter().map(|d| *d as i32).collect()
    }
}

impl Default for DayOffsets {
    fn default() -> Self {
        Self(DEFAULT_REVIEW_DAYS.to_vec())
    }
}

impl TryFrom<Vec<i64>> for DayOffsets {
    type Error = ScheduleError;

    fn try_from(raw: Vec<i64>) -> Result<Self> {
        Self::normalize(raw)
    }
}

impl From<DayOffsets> for Vec<u32> {
    fn from(offsets: DayOffsets) -> Self {
        offsets.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_one_is_collapsed() {
        let offsets = DayOffsets::normalize([1, 1, 5]).unwrap();
        assert_eq!(offsets.as_slice(), &[1, 5]);
    }

    #[test]
    fn missing_one_is_inserted_first() {
        let offsets = DayOffsets::normalize([5, 15]).unwrap();
        assert_eq!(offsets.as_slice(), &[1, 5, 15]);
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let offsets = DayOffsets::normalize([90, 5, 35, 1, 15, 5]).unwrap();
        assert_eq!(offsets.as_slice(), &[1, 5, 15, 35, 90]);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(DayOffsets::normalize(Vec::<i64>::new()), Err(ScheduleError::EmptyOffsets));
    }

    #[test]
    fn rejects_non_positive() {
        assert_eq!(
            DayOffsets::normalize([1, 0, 5]),
            Err(ScheduleError::InvalidOffset { value: 0 })
        );
        assert_eq!(
            DayOffsets::normalize([-3]),
            Err(ScheduleError::InvalidOffset { value: -3 })
        );
    }

    #[test]
    fn rejects_too_large() {
        assert!(matches!(
            DayOffsets::normalize([1, 4000]),
            Err(ScheduleError::OffsetTooLarge { value: 4000, .. })
        ));
    }

    #[test]
    fn default_matches_grammar_defaults() {
        assert_eq!(DayOffsets::default().as_slice(), &DEFAULT_REVIEW_DAYS);
    }

    #[test]
    fn deserializes_with_normalization() {
        let offsets: DayOffsets = serde_json::from_str("[15, 5]").unwrap();
        assert_eq!(offsets.as_slice(), &[1, 5, 15]);
        assert!(serde_json::from_str::<DayOffsets>("[]").is_err());
    }
}

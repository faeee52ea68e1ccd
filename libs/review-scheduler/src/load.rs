//! Per-day load counting within a scheduling scope.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::date_key::DayKey;

/// Number of pending reviews already placed on each day of a scope.
///
/// The caller is responsible for feeding only pending reviews of the same
/// user, language and review kind; the map itself just counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadMap {
    counts: HashMap<DayKey, u32>,
}

impl LoadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the given scheduled dates by UTC day.
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        dates.into_iter().collect()
    }

    pub fn count(&self, day: DayKey) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, day: DayKey) {
        *self.counts.entry(day).or_insert(0) += 1;
    }

    /// Total number of reviews counted across all days.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

impl FromIterator<DateTime<Utc>> for LoadMap {
    fn from_iter<I: IntoIterator<Item = DateTime<Utc>>>(iter: I) -> Self {
        let mut load = Self::new();
        for ts in iter {
            load.increment(DayKey::of(ts));
        }
        load
    }
}

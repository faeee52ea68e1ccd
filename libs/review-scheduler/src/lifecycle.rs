//! Pending/completed state of a scheduled review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state. New reviews start out pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Completed,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Completion flag and timestamp, kept consistent with each other.
///
/// `completed_at` is `Some` exactly when `completed` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl Completion {
    pub fn pending() -> Self {
        Self::default()
    }

    /// Rebuild from stored columns, repairing a flag/timestamp mismatch.
    pub fn from_parts(completed: bool, completed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match (completed, completed_at) {
            (true, Some(at)) => Self {
                completed: true,
                completed_at: Some(at),
            },
            (true, None) => Self {
                completed: true,
                completed_at: Some(now),
            },
            (false, _) => Self::pending(),
        }
    }

    /// Apply a completion change. Completing always stamps `now`.
    pub fn mark(self, completed: bool, now: DateTime<Utc>) -> Self {
        if completed {
            Self {
                completed: true,
                completed_at: Some(now),
            }
        } else {
            Self::pending()
        }
    }

    pub fn status(&self) -> ReviewStatus {
        if self.completed {
            ReviewStatus::Completed
        } else {
            ReviewStatus::Pending
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

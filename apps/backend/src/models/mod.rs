//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub use review_scheduler::{
    CalendarDay, CalendarEntry, Completion, DayKey, DayOffsets, ReviewKind, ReviewStatus,
    UserReviewSettings,
};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Review settings row
#[derive(Debug, Clone, FromRow)]
pub struct DbReviewSettings {
    pub user_id: Uuid,
    pub default_review_days: Vec<i32>,
    pub max_reviews_per_day: i32,
}

impl DbReviewSettings {
    /// Convert to validated settings, falling back to defaults for corrupt rows
    pub fn to_settings(&self) -> UserReviewSettings {
        UserReviewSettings::new(
            self.default_review_days.iter().map(|d| i64::from(*d)),
            i64::from(self.max_reviews_per_day),
        )
        .unwrap_or_else(|e| {
            tracing::warn!("Invalid stored review settings for {}: {}", self.user_id, e);
            UserReviewSettings::default()
        })
    }
}

/// Flashcard set
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Grammar module progress
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GrammarProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: String,
    pub language: String,
    pub level: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The entity a schedule is generated for
#[derive(Debug, Clone)]
pub struct ReviewParent {
    pub kind: ReviewKind,
    pub id: Uuid,
    pub user_id: Uuid,
    pub language: String,
    pub reference_date: DateTime<Utc>,
}

impl From<&FlashcardSet> for ReviewParent {
    fn from(set: &FlashcardSet) -> Self {
        Self {
            kind: ReviewKind::Set,
            id: set.id,
            user_id: set.user_id,
            language: set.language.clone(),
            reference_date: set.created_at,
        }
    }
}

impl From<&GrammarProgress> for ReviewParent {
    fn from(progress: &GrammarProgress) -> Self {
        Self {
            kind: ReviewKind::Grammar,
            id: progress.id,
            user_id: progress.user_id,
            language: progress.language.clone(),
            reference_date: progress.created_at,
        }
    }
}

/// Scheduled review row (either kind)
#[derive(Debug, Clone, FromRow)]
pub struct DbScheduledReview {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub user_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub day_offset: i32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DbScheduledReview {
    pub fn completion(&self) -> Completion {
        Completion::from_parts(self.completed, self.completed_at, self.created_at)
    }

    /// Convert to API review type
    pub fn to_api_review(&self, kind: ReviewKind) -> ScheduledReview {
        let completion = self.completion();
        ScheduledReview {
            id: self.id,
            kind,
            parent_id: self.parent_id,
            owner_user_id: self.user_id,
            scheduled_date: self.scheduled_date,
            day_offset: self.day_offset,
            status: completion.status(),
            completed: completion.is_completed(),
            completed_at: completion.completed_at(),
        }
    }
}

/// Calendar row joined with its parent's label
#[derive(Debug, Clone, FromRow)]
pub struct DbCalendarReview {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub parent_label: String,
    pub language: String,
    pub scheduled_date: DateTime<Utc>,
    pub day_offset: i32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DbCalendarReview {
    pub fn to_api_entry(&self, kind: ReviewKind) -> CalendarReview {
        CalendarReview {
            id: self.id,
            kind,
            parent_id: self.parent_id,
            parent_label: self.parent_label.clone(),
            language: self.language.clone(),
            scheduled_date: self.scheduled_date,
            day_offset: self.day_offset,
            completed: self.completed,
            completed_at: self.completed_at,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserRegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Review types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReview {
    pub id: Uuid,
    pub kind: ReviewKind,
    pub parent_id: Uuid,
    pub owner_user_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub day_offset: i32,
    pub status: ReviewStatus,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReviewsRequest {
    pub review_days: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub reviews: Vec<ScheduledReview>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub review_id: Option<Uuid>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub scheduled_date: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewQuery {
    pub review_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteReviewResponse {
    pub deleted: bool,
}

// Calendar types
#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarReview {
    pub id: Uuid,
    pub kind: ReviewKind,
    pub parent_id: Uuid,
    pub parent_label: String,
    pub language: String,
    pub scheduled_date: DateTime<Utc>,
    pub day_offset: i32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CalendarEntry for CalendarReview {
    fn scheduled_date(&self) -> DateTime<Utc> {
        self.scheduled_date
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub from: DayKey,
    pub to: DayKey,
    pub total_pending: usize,
    pub days: Vec<CalendarDay<CalendarReview>>,
}

// Set types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSetRequest {
    pub title: String,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetListResponse {
    pub sets: Vec<FlashcardSet>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteSetResponse {
    pub set: FlashcardSet,
    pub reviews: Vec<ScheduledReview>,
}

// Grammar types
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteGrammarRequest {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteGrammarResponse {
    pub progress: GrammarProgress,
    pub reviews: Vec<ScheduledReview>,
}

// Settings types
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub default_review_days: Option<Vec<i64>>,
    pub max_reviews_per_day: Option<i64>,
}

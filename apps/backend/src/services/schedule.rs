//! Review schedule service.
//!
//! Runs the allocator against the database for either review kind and applies
//! single-review edits. All operations are scoped to the owning user through
//! the [`ReviewParent`] they are called with.

use chrono::{DateTime, NaiveDate, Utc};
use review_scheduler::{
    at_review_hour, ensure_not_before, parse_day, DayOffsets, LoadMap, ScheduleAllocator,
    UserReviewSettings,
};
use uuid::Uuid;

use crate::db::{reviews, Database};
use crate::error::{ApiError, Result};
use crate::models::{DbScheduledReview, ReviewKind, ReviewParent};

/// Offsets used when a regenerate request carries none.
pub fn default_offsets(kind: ReviewKind, settings: &UserReviewSettings) -> DayOffsets {
    match kind {
        ReviewKind::Set => settings.default_review_days.clone(),
        ReviewKind::Grammar => DayOffsets::default(),
    }
}

/// Replace the whole schedule of `parent`.
///
/// Delete, load read and insert run in one transaction holding the scope's
/// advisory lock, so concurrent regenerations in the same scope see each
/// other's rows. Previous completion state is discarded.
pub async fn regenerate(
    db: &Database,
    parent: &ReviewParent,
    offsets: &DayOffsets,
    max_reviews_per_day: u32,
) -> Result<Vec<DbScheduledReview>> {
    let allocator = ScheduleAllocator::new(max_reviews_per_day)?;

    let mut tx = db.begin().await?;

    reviews::lock_scope(&mut *tx, parent.kind, parent.user_id, &parent.language).await?;

    let removed = reviews::delete_for_parent(&mut *tx, parent.kind, parent.id).await?;

    let dates = reviews::pending_dates_in_scope(
        &mut *tx,
        parent.kind,
        parent.user_id,
        &parent.language,
        parent.id,
    )
    .await?;
    let mut load = LoadMap::from_dates(dates);
    let scope_load = load.total();

    let allocations = allocator.allocate(parent.reference_date, offsets, &mut load);
    let shifted = allocations.iter().filter(|a| a.is_shifted()).count();
    for allocation in allocations.iter().filter(|a| a.is_shifted()) {
        tracing::debug!(
            "Offset {} moved {:+} day(s) to {}",
            allocation.day_offset,
            allocation.shift_days(),
            allocation.scheduled_date
        );
    }

    let rows = allocations
        .iter()
        .map(|a| -> Result<(DateTime<Utc>, i32)> {
            let offset = i32::try_from(a.day_offset)
                .map_err(|_| ApiError::Internal(format!("day offset {} out of range", a.day_offset)))?;
            Ok((a.scheduled_date, offset))
        })
        .collect::<Result<Vec<_>>>()?;
    let created =
        reviews::insert_batch(&mut *tx, parent.kind, parent.id, parent.user_id, &rows).await?;

    tx.commit().await?;

    tracing::info!(
        "Regenerated {} schedule for {}: {} reviews ({} shifted, {} replaced, {} already pending in scope)",
        parent.kind.as_str(),
        parent.id,
        created.len(),
        shifted,
        removed,
        scope_load
    );

    Ok(created)
}

/// List the schedule of `parent`
pub async fn list(db: &Database, parent: &ReviewParent) -> Result<Vec<DbScheduledReview>> {
    reviews::list_for_parent(db.pool(), parent.kind, parent.id, parent.user_id).await
}

/// Requested change to a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewEdit {
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

impl ReviewEdit {
    pub fn is_empty(&self) -> bool {
        self.scheduled_date.is_none() && self.completed.is_none()
    }
}

/// Apply a manual edit to one review.
///
/// A new date is written as given, bypassing the allocator, but may not fall
/// on a day before the parent's reference date. Completing stamps
/// `completed_at`; reopening clears it. Other reviews are left untouched.
pub async fn update(
    db: &Database,
    parent: &ReviewParent,
    review_id: Uuid,
    edit: ReviewEdit,
) -> Result<DbScheduledReview> {
    if edit.is_empty() {
        return Err(ApiError::BadRequest(
            "Nothing to update: provide scheduledDate or completed".to_string(),
        ));
    }

    if let Some(date) = edit.scheduled_date {
        ensure_not_before(parent.reference_date, date)?;
    }

    let current = reviews::get_owned(db.pool(), parent.kind, review_id, parent.id, parent.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    let completion = match edit.completed {
        Some(flag) => current.completion().mark(flag, Utc::now()),
        None => current.completion(),
    };
    let scheduled_date = edit.scheduled_date.unwrap_or(current.scheduled_date);

    let updated = reviews::update_owned(
        db.pool(),
        parent.kind,
        review_id,
        parent.id,
        parent.user_id,
        scheduled_date,
        completion.is_completed(),
        completion.completed_at(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    if let Some(date) = edit.scheduled_date {
        tracing::info!("Rescheduled {} review {} to {}", parent.kind.as_str(), review_id, date);
    }

    Ok(updated)
}

/// Delete one review
pub async fn delete(db: &Database, parent: &ReviewParent, review_id: Uuid) -> Result<()> {
    let deleted =
        reviews::delete_owned(db.pool(), parent.kind, review_id, parent.id, parent.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Review not found".to_string()));
    }

    tracing::info!("Deleted {} review {}", parent.kind.as_str(), review_id);
    Ok(())
}

/// Parse a manual review date: RFC 3339, or `YYYY-MM-DD` pinned to the review hour.
pub fn parse_review_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value.trim()) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_day(value)
        .map(at_review_hour)
        .ok_or_else(|| ApiError::Parse(format!("Invalid scheduledDate '{}'", value)))
}

/// Parse an optional `YYYY-MM-DD` query value.
pub fn parse_optional_day(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_day(raw)
            .map(Some)
            .ok_or_else(|| ApiError::Parse(format!("Invalid {} date '{}', expected YYYY-MM-DD", name, raw))),
    }
}

//! Review schedule endpoints shared by sets and grammar modules, plus the
//! cross-kind calendar read.

use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use review_scheduler::{group_by_day, DateWindow};

use crate::db::reviews;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::parse_optional_json;
use crate::services::schedule::{self, parse_optional_day, parse_review_date, ReviewEdit};
use crate::AppState;

fn to_api(parent: &ReviewParent, rows: Vec<DbScheduledReview>) -> Vec<ScheduledReview> {
    rows.iter().map(|r| r.to_api_review(parent.kind)).collect()
}

/// Regenerate the schedule of `parent` from an optional `{ reviewDays }` body
pub(crate) async fn generate_for(
    state: &AppState,
    parent: &ReviewParent,
    body: &Bytes,
) -> Result<Json<ReviewListResponse>> {
    let request: GenerateReviewsRequest = parse_optional_json(body)?;
    let settings = state.db.get_review_settings(parent.user_id).await?;

    let offsets = match request.review_days {
        Some(days) => DayOffsets::normalize(days)?,
        None => schedule::default_offsets(parent.kind, &settings),
    };

    let created =
        schedule::regenerate(&state.db, parent, &offsets, settings.max_reviews_per_day).await?;

    Ok(Json(ReviewListResponse {
        reviews: to_api(parent, created),
    }))
}

pub(crate) async fn list_for(
    state: &AppState,
    parent: &ReviewParent,
) -> Result<Json<ReviewListResponse>> {
    let rows = schedule::list(&state.db, parent).await?;
    Ok(Json(ReviewListResponse {
        reviews: to_api(parent, rows),
    }))
}

pub(crate) async fn update_for(
    state: &AppState,
    parent: &ReviewParent,
    request: UpdateReviewRequest,
) -> Result<Json<ScheduledReview>> {
    let review_id = request
        .review_id
        .ok_or_else(|| ApiError::BadRequest("reviewId is required".to_string()))?;

    let edit = ReviewEdit {
        scheduled_date: request
            .scheduled_date
            .as_deref()
            .map(parse_review_date)
            .transpose()?,
        completed: request.completed,
    };

    let updated = schedule::update(&state.db, parent, review_id, edit).await?;
    Ok(Json(updated.to_api_review(parent.kind)))
}

pub(crate) async fn delete_for(
    state: &AppState,
    parent: &ReviewParent,
    query: DeleteReviewQuery,
) -> Result<Json<DeleteReviewResponse>> {
    let review_id = query
        .review_id
        .ok_or_else(|| ApiError::BadRequest("reviewId is required".to_string()))?;

    schedule::delete(&state.db, parent, review_id).await?;
    Ok(Json(DeleteReviewResponse { deleted: true }))
}

/// GET /api/reviews?from&to
pub async fn calendar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>> {
    let from = parse_optional_day("from", query.from.as_deref())?;
    let to = parse_optional_day("to", query.to.as_deref())?;
    let window = DateWindow::resolve(from, to, Utc::now().date_naive())?;

    let mut entries = Vec::new();
    for kind in [ReviewKind::Set, ReviewKind::Grammar] {
        let rows = reviews::list_in_window(
            state.db.pool(),
            kind,
            auth.user_id,
            window.start(),
            window.end_exclusive(),
        )
        .await?;
        entries.extend(rows.iter().map(|r| r.to_api_entry(kind)));
    }
    entries.sort_by_key(|e| e.scheduled_date);

    let days = group_by_day(entries);
    let total_pending = days.iter().map(|d| d.pending_count).sum();

    Ok(Json(CalendarResponse {
        from: window.from().into(),
        to: window.to().into(),
        total_pending,
        days,
    }))
}

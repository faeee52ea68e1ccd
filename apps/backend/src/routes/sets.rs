//! Flashcard set endpoints and their review schedules

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::{parse_json, reviews};
use crate::services::schedule;
use crate::AppState;

async fn owned_parent(state: &AppState, user_id: Uuid, set_id: Uuid) -> Result<ReviewParent> {
    let set = state
        .db
        .get_set(user_id, set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Set not found".to_string()))?;
    Ok(ReviewParent::from(&set))
}

/// POST /api/sets
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Json<FlashcardSet>> {
    let request: CreateSetRequest = parse_json(&body)?;
    let title = request.title.trim();
    let language = request.language.trim();
    if title.is_empty() || language.is_empty() {
        return Err(ApiError::BadRequest("title and language are required".to_string()));
    }

    let set = state.db.create_set(auth.user_id, title, language).await?;
    Ok(Json(set))
}

/// GET /api/sets
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SetListResponse>> {
    let sets = state.db.get_sets(auth.user_id).await?;
    Ok(Json(SetListResponse { sets }))
}

/// POST /api/sets/:id/complete
/// Marks the set completed and schedules its reviews with the user's defaults
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(set_id): Path<Uuid>,
) -> Result<Json<CompleteSetResponse>> {
    let set = state
        .db
        .mark_set_completed(auth.user_id, set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Set not found".to_string()))?;

    let parent = ReviewParent::from(&set);
    let settings = state.db.get_review_settings(auth.user_id).await?;
    let offsets = schedule::default_offsets(parent.kind, &settings);
    let created =
        schedule::regenerate(&state.db, &parent, &offsets, settings.max_reviews_per_day).await?;

    Ok(Json(CompleteSetResponse {
        set,
        reviews: created.iter().map(|r| r.to_api_review(parent.kind)).collect(),
    }))
}

/// GET /api/sets/:id/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(set_id): Path<Uuid>,
) -> Result<Json<ReviewListResponse>> {
    let parent = owned_parent(&state, auth.user_id, set_id).await?;
    reviews::list_for(&state, &parent).await
}

/// POST /api/sets/:id/reviews
pub async fn generate_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(set_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ReviewListResponse>> {
    let parent = owned_parent(&state, auth.user_id, set_id).await?;
    reviews::generate_for(&state, &parent, &body).await
}

/// PUT /api/sets/:id/reviews
pub async fn update_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(set_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ScheduledReview>> {
    let request: UpdateReviewRequest = parse_json(&body)?;
    let parent = owned_parent(&state, auth.user_id, set_id).await?;
    reviews::update_for(&state, &parent, request).await
}

/// DELETE /api/sets/:id/reviews?reviewId=
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(set_id): Path<Uuid>,
    Query(query): Query<DeleteReviewQuery>,
) -> Result<Json<DeleteReviewResponse>> {
    let parent = owned_parent(&state, auth.user_id, set_id).await?;
    reviews::delete_for(&state, &parent, query).await
}

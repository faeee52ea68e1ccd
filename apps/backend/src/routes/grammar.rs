//! Grammar module completion and review schedule endpoints

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

async fn owned_parent(state: &AppState, user_id: Uuid, module_id: &str) -> Result<ReviewParent> {
    let progress = state
        .db
        .get_grammar_progress(user_id, module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Grammar progress not found".to_string()))?;
    Ok(ReviewParent::from(&progress))
}

/// POST /api/grammar/:module_id/complete
/// Records the module as completed and schedules its reviews
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<String>,
    body: Bytes,
) -> Result<Json<CompleteGrammarResponse>> {
    let request: CompleteGrammarRequest = parse_json(&body)?;
    let language = request.language.trim();
    let level = request.level.trim();
    if language.is_empty() || level.is_empty() {
        return Err(ApiError::BadRequest("language and level are required".to_string()));
    }

    let progress = state
        .db
        .upsert_grammar_completed(auth.user_id, &module_id, language, level)
        .await?;

    let parent = ReviewParent::from(&progress);
    let settings = state.db.get_review_settings(auth.user_id).await?;
    let offsets = schedule::default_offsets(parent.kind, &settings);
    let created =
        schedule::regenerate(&state.db, &parent, &offsets, settings.max_reviews_per_day).await?;

    Ok(Json(CompleteGrammarResponse {
        progress,
        reviews: created.iter().map(|r| r.to_api_review(parent.kind)).collect(),
    }))
}

/// GET /api/grammar/:module_id/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<String>,
) -> Result<Json<ReviewListResponse>> {
    let parent = owned_parent(&state, auth.user_id, &module_id).await?;
    reviews::list_for(&state, &parent).await
}

/// POST /api/grammar/:module_id/reviews
pub async fn generate_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<String>,
    body: Bytes,
) -> Result<Json<ReviewListResponse>> {
    let parent = owned_parent(&state, auth.user_id, &module_id).await?;
    reviews::generate_for(&state, &parent, &body).await
}

/// PUT /api/grammar/:module_id/reviews
pub async fn update_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<String>,
    body: Bytes,
) -> Result<Json<ScheduledReview>> {
    let request: UpdateReviewRequest = parse_json(&body)?;
    let parent = owned_parent(&state, auth.user_id, &module_id).await?;
    reviews::update_for(&state, &parent, request).await
}

/// DELETE /api/grammar/:module_id/reviews?reviewId=
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(module_id): Path<String>,
    Query(query): Query<DeleteReviewQuery>,
) -> Result<Json<DeleteReviewResponse>> {
    let parent = owned_parent(&state, auth.user_id, &module_id).await?;
    reviews::delete_for(&state, &parent, query).await
}

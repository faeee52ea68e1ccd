//! Settings endpoints

use axum::{body::Bytes, extract::State, Extension, Json};
use review_scheduler::{validate_max_reviews_per_day, DayOffsets};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::parse_json;
use crate::AppState;

/// GET /api/settings
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserReviewSettings>> {
    let settings = state.db.get_review_settings(auth.user_id).await?;
    Ok(Json(settings))
}

/// POST /api/settings
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<Json<UserReviewSettings>> {
    let request: UpdateSettingsRequest = parse_json(&body)?;
    let current = state.db.get_review_settings(auth.user_id).await?;
    let updated = apply_update(current, request)?;

    state
        .db
        .upsert_review_settings(auth.user_id, &updated)
        .await?;

    Ok(Json(updated))
}

/// Merge a partial update into the current settings, validating what changed
fn apply_update(
    mut current: UserReviewSettings,
    request: UpdateSettingsRequest,
) -> Result<UserReviewSettings> {
    if let Some(days) = request.default_review_days {
        current.default_review_days = DayOffsets::normalize(days)?;
    }
    if let Some(max) = request.max_reviews_per_day {
        current.max_reviews_per_day = validate_max_reviews_per_day(max)?;
    }
    Ok(current)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{AppState, AuthUser, ValidatedJson},
    error::{AppError, AppResult},
    models::{NewReview, Rating, Review, ReviewThread},
    services::reviews,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub title_id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let comment = request.comment.trim();
    if comment.is_empty() {
        return Err(AppError::Validation("Comment cannot be blank".to_string()));
    }

    let input = NewReview {
        title_id: request.title_id,
        parent_id: request.parent_id,
        comment: comment.to_string(),
        rating: request.rating.map(Rating::try_from).transpose()?,
    };

    let review = reviews::create_review(
        state.store.as_ref(),
        state.store.as_ref(),
        user.user_id,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Review threads of a title, oldest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<Vec<ReviewThread>>> {
    let threads =
        reviews::list_threads(state.store.as_ref(), state.store.as_ref(), title_id).await?;
    Ok(Json(threads))
}

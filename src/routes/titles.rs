use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::Title,
};

/// Handler for a cached title, including its aggregate rating
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Title>> {
    let title = state
        .store
        .find_title(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))?;
    Ok(Json(title))
}

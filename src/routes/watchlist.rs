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
    error::AppResult,
    models::{EntryFilter, MediaKind, NewTitle, Transition, WatchlistEntry, WatchlistItem},
    services::watchlist,
};

/// Body of `POST /watchlist`. The catalog's own field names are accepted too.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTitleRequest {
    #[serde(alias = "tmdb_id")]
    #[validate(range(min = 1))]
    pub external_id: i64,
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[serde(alias = "media_type")]
    pub kind: MediaKind,
    #[serde(default, alias = "poster_path")]
    #[validate(length(max = 500))]
    pub poster: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FavoriteRequest {
    #[serde(alias = "isFavorite")]
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RatingRequest {
    pub rating: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub review: Option<String>,
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<AddTitleRequest>,
) -> AppResult<(StatusCode, Json<WatchlistItem>)> {
    let input = NewTitle {
        external_id: request.external_id,
        name: request.title.trim().to_string(),
        media_kind: request.kind,
        poster_path: request.poster,
    };
    let item = watchlist::add_title(
        state.store.as_ref(),
        state.store.as_ref(),
        user.user_id,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list(
    state: &AppState,
    user: AuthUser,
    filter: EntryFilter,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    let items = watchlist::list(state.store.as_ref(), user.user_id, filter).await?;
    Ok(Json(items))
}

/// Active watchlist: titles neither seen nor junked
pub async fn get_watchlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    list(&state, user, EntryFilter::Active).await
}

pub async fn get_seen(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    list(&state, user, EntryFilter::Seen).await
}

pub async fn get_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    list(&state, user, EntryFilter::Favorites).await
}

pub async fn get_junk(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    list(&state, user, EntryFilter::Junk).await
}

async fn transition(
    state: &AppState,
    user: AuthUser,
    title_id: Uuid,
    transition: Transition,
) -> AppResult<Json<WatchlistEntry>> {
    let entry =
        watchlist::apply_transition(state.store.as_ref(), user.user_id, title_id, transition)
            .await?;
    Ok(Json(entry))
}

pub async fn mark_seen(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::MarkSeen).await
}

pub async fn unmark_seen(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::UnmarkSeen).await
}

pub async fn move_to_junk(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::MoveToJunk).await
}

pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::Restore).await
}

pub async fn set_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<FavoriteRequest>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::SetFavorite(request.is_favorite)).await
}

pub async fn unfavorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::Unfavorite).await
}

pub async fn rate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RatingRequest>,
) -> AppResult<Json<WatchlistEntry>> {
    let entry =
        watchlist::rate(state.store.as_ref(), user.user_id, title_id, request.rating).await?;
    Ok(Json(entry))
}

pub async fn review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(title_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ReviewRequest>,
) -> AppResult<Json<WatchlistEntry>> {
    transition(&state, user, title_id, Transition::Review(request.review)).await
}

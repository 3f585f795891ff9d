use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{AppState, AuthUser, ValidatedJson},
    error::AppResult,
    models::UserProfile,
    services::accounts,
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let user = accounts::register(
        state.store.as_ref(),
        &request.email,
        &request.password,
        request.username,
        state.config.min_password_length,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Verifies credentials and sets the session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<UserProfile>)> {
    let user = accounts::login(state.store.as_ref(), &request.email, &request.password).await?;
    let token = state.sessions.issue(user.id)?;
    Ok((jar.add(state.sessions.cookie(token)), Json(user.into())))
}

/// Drops the session cookie. Works without a valid session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(state.sessions.removal_cookie()), StatusCode::NO_CONTENT)
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserProfile>> {
    let user = accounts::current_user(state.store.as_ref(), user.user_id).await?;
    Ok(Json(user.into()))
}

pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<UserProfile>> {
    let user =
        accounts::update_username(state.store.as_ref(), user.user_id, &request.username).await?;
    Ok(Json(user.into()))
}

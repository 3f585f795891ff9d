use uuid::Uuid;

use crate::{
    auth::{hash_password, verify_password},
    db::UserRepository,
    error::{AppError, AppResult},
    models::{user::normalize_email, User},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn register<U>(
    users: &U,
    email: &str,
    password: &str,
    username: Option<String>,
    min_password_length: usize,
) -> AppResult<User>
where
    U: UserRepository + ?Sized,
{
    if password.chars().count() < min_password_length {
        return Err(AppError::Validation(format!(
            "Password must be at least {min_password_length} characters long"
        )));
    }

    let email = normalize_email(email);
    let password_hash = hash_password(password)?;
    let username = username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let user = users.insert_user(&email, &password_hash, username).await?;
    tracing::info!(user_id = %user.id, "User registered");
    Ok(user)
}

/// Checks credentials. Unknown email and wrong password fail identically.
pub async fn login<U>(users: &U, email: &str, password: &str) -> AppResult<User>
where
    U: UserRepository + ?Sized,
{
    let user = users
        .find_user_by_email(&normalize_email(email))
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(user)
}

/// Loads the session's user; a session for a vanished account is unauthorized
pub async fn current_user<U>(users: &U, user_id: Uuid) -> AppResult<User>
where
    U: UserRepository + ?Sized,
{
    users
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
}

pub async fn update_username<U>(users: &U, user_id: Uuid, username: &str) -> AppResult<User>
where
    U: UserRepository + ?Sized,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username cannot be blank".to_string()));
    }

    let user = users
        .update_username(user_id, username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    tracing::info!(user_id = %user.id, "Username updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_register_normalizes_email_and_hashes() {
        let store = MemoryStore::new();
        let user = register(&store, " Ana@Example.com", "long-enough", None, 8)
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_ne!(user.password_hash, "long-enough");
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let store = MemoryStore::new();
        let err = register(&store, "a@b.co", "short", None, 8).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_case_insensitive() {
        let store = MemoryStore::new();
        register(&store, "a@b.co", "password1", None, 8).await.unwrap();
        let err = register(&store, "A@B.CO", "password2", None, 8).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login() {
        let store = MemoryStore::new();
        let user = register(&store, "a@b.co", "password1", None, 8).await.unwrap();

        let logged_in = login(&store, "A@b.co", "password1").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let wrong = login(&store, "a@b.co", "password2").await.unwrap_err();
        let unknown = login(&store, "x@b.co", "password1").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_update_username() {
        let store = MemoryStore::new();
        let user = register(&store, "a@b.co", "password1", None, 8).await.unwrap();

        let updated = update_username(&store, user.id, "  tyler ").await.unwrap();
        assert_eq!(updated.username.as_deref(), Some("tyler"));

        let err = update_username(&store, user.id, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

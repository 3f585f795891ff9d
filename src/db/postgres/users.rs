use uuid::Uuid;

use super::PgStore;
use crate::{
    db::UserRepository,
    error::{AppError, AppResult},
    models::User,
};

const USER_COLUMNS: &str = "id, email, username, password_hash, created_at";

#[async_trait::async_trait]
impl UserRepository for PgStore {
    async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
        username: Option<String>,
    ) -> AppResult<User> {
        let query = format!(
            "INSERT INTO users (id, email, username, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(username)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::conflict_on_duplicate(e, "An account with this email already exists")
            })
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_username(&self, id: Uuid, username: &str) -> AppResult<Option<User>> {
        let query =
            format!("UPDATE users SET username = $1 WHERE id = $2 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

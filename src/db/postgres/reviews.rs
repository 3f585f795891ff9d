use uuid::Uuid;

use super::PgStore;
use crate::{
    db::ReviewRepository,
    error::AppResult,
    models::{NewReview, Review},
};

const REVIEW_COLUMNS: &str = "id, user_id, title_id, parent_id, comment, rating, created_at";

#[async_trait::async_trait]
impl ReviewRepository for PgStore {
    async fn insert_review(&self, user_id: Uuid, input: &NewReview) -> AppResult<Review> {
        let query = format!(
            "INSERT INTO reviews (id, user_id, title_id, parent_id, comment, rating) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {REVIEW_COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(input.title_id)
            .bind(input.parent_id)
            .bind(&input.comment)
            .bind(input.rating)
            .fetch_one(&self.pool)
            .await?;
        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> AppResult<Option<Review>> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(review)
    }

    async fn list_reviews(&self, title_id: Uuid) -> AppResult<Vec<Review>> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE title_id = $1 ORDER BY created_at"
        );
        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }
}

use uuid::Uuid;

use super::PgStore;
use crate::{
    db::TitleRepository,
    error::{AppError, AppResult},
    models::{NewTitle, Title},
};

const TITLE_COLUMNS: &str =
    "id, external_id, name, media_kind, poster_path, aggregate_rating, created_at";

#[async_trait::async_trait]
impl TitleRepository for PgStore {
    async fn upsert_title(&self, input: &NewTitle) -> AppResult<Title> {
        // The existing row wins; only a missing poster is filled in
        let query = format!(
            "INSERT INTO titles (id, external_id, name, media_kind, poster_path) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (external_id) DO UPDATE \
                SET poster_path = COALESCE(titles.poster_path, EXCLUDED.poster_path) \
             RETURNING {TITLE_COLUMNS}"
        );

        let title = sqlx::query_as::<_, Title>(&query)
            .bind(Uuid::new_v4())
            .bind(input.external_id)
            .bind(&input.name)
            .bind(input.media_kind)
            .bind(&input.poster_path)
            .fetch_one(&self.pool)
            .await?;

        Ok(title)
    }

    async fn find_title(&self, id: Uuid) -> AppResult<Option<Title>> {
        let query = format!("SELECT {TITLE_COLUMNS} FROM titles WHERE id = $1");
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(title)
    }

    async fn refresh_aggregate_rating(&self, title_id: Uuid) -> AppResult<Option<f64>> {
        let rating = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            UPDATE titles
            SET aggregate_rating = (
                SELECT ROUND(AVG(rating)::numeric, 1)::float8
                FROM reviews
                WHERE title_id = $1 AND parent_id IS NULL AND rating IS NOT NULL
            )
            WHERE id = $1
            RETURNING aggregate_rating
            "#,
        )
        .bind(title_id)
        .fetch_optional(&self.pool)
        .await?;

        rating.ok_or_else(|| AppError::NotFound(format!("Title {} not found", title_id)))
    }
}

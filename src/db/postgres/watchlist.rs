use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::PgStore;
use crate::{
    db::WatchlistRepository,
    error::{AppError, AppResult},
    models::{
        EntryFilter, MediaKind, Rating, Status, Title, WatchlistEntry, WatchlistItem,
    },
};

const ENTRY_COLUMNS: &str = "id, user_id, title_id, status, is_favorite, rating, review, version, \
     created_at, updated_at";

/// Joined entry + title row; title columns carry a `t_` prefix
#[derive(sqlx::FromRow)]
struct EntryWithTitleRow {
    id: Uuid,
    user_id: Uuid,
    title_id: Uuid,
    status: Status,
    is_favorite: bool,
    rating: Option<Rating>,
    review: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    t_external_id: i64,
    t_name: String,
    t_media_kind: MediaKind,
    t_poster_path: Option<String>,
    t_aggregate_rating: Option<f64>,
    t_created_at: DateTime<Utc>,
}

impl From<EntryWithTitleRow> for WatchlistItem {
    fn from(row: EntryWithTitleRow) -> Self {
        WatchlistItem {
            title: Title {
                id: row.title_id,
                external_id: row.t_external_id,
                name: row.t_name,
                media_kind: row.t_media_kind,
                poster_path: row.t_poster_path,
                aggregate_rating: row.t_aggregate_rating,
                created_at: row.t_created_at,
            },
            entry: WatchlistEntry {
                id: row.id,
                user_id: row.user_id,
                title_id: row.title_id,
                status: row.status,
                is_favorite: row.is_favorite,
                rating: row.rating,
                review: row.review,
                version: row.version,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

fn filter_clause(filter: EntryFilter) -> &'static str {
    match filter {
        EntryFilter::Active => "e.status = 'WATCHLIST'",
        EntryFilter::Seen => "e.status = 'SEEN'",
        EntryFilter::Junk => "e.status = 'JUNK'",
        EntryFilter::Favorites => "e.is_favorite",
    }
}

#[async_trait::async_trait]
impl WatchlistRepository for PgStore {
    async fn insert_entry(&self, user_id: Uuid, title_id: Uuid) -> AppResult<WatchlistEntry> {
        let query = format!(
            "INSERT INTO watchlist_entries (id, user_id, title_id) \
             VALUES ($1, $2, $3) \
             RETURNING {ENTRY_COLUMNS}"
        );

        sqlx::query_as::<_, WatchlistEntry>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(title_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::conflict_on_duplicate(e, "Title is already in your watchlist"))
    }

    async fn find_entry(&self, user_id: Uuid, title_id: Uuid) -> AppResult<Option<WatchlistEntry>> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM watchlist_entries WHERE user_id = $1 AND title_id = $2"
        );
        let entry = sqlx::query_as::<_, WatchlistEntry>(&query)
            .bind(user_id)
            .bind(title_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn update_entry(&self, entry: &WatchlistEntry) -> AppResult<Option<WatchlistEntry>> {
        let query = format!(
            "UPDATE watchlist_entries \
             SET status = $1, is_favorite = $2, rating = $3, review = $4, \
                 version = version + 1, updated_at = now() \
             WHERE id = $5 AND version = $6 \
             RETURNING {ENTRY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WatchlistEntry>(&query)
            .bind(entry.status)
            .bind(entry.is_favorite)
            .bind(entry.rating)
            .bind(&entry.review)
            .bind(entry.id)
            .bind(entry.version)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        filter: EntryFilter,
    ) -> AppResult<Vec<WatchlistItem>> {
        let query = format!(
            r#"
            SELECT e.id, e.user_id, e.title_id, e.status, e.is_favorite, e.rating, e.review,
                   e.version, e.created_at, e.updated_at,
                   t.external_id AS t_external_id, t.name AS t_name,
                   t.media_kind AS t_media_kind, t.poster_path AS t_poster_path,
                   t.aggregate_rating AS t_aggregate_rating, t.created_at AS t_created_at
            FROM watchlist_entries e
            JOIN titles t ON t.id = e.title_id
            WHERE e.user_id = $1 AND {}
            ORDER BY e.updated_at DESC
            "#,
            filter_clause(filter)
        );

        let rows = sqlx::query_as::<_, EntryWithTitleRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(WatchlistItem::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_clause_active_excludes_seen_and_junk() {
        assert_eq!(filter_clause(EntryFilter::Active), "e.status = 'WATCHLIST'");
        assert_eq!(filter_clause(EntryFilter::Favorites), "e.is_favorite");
    }
}

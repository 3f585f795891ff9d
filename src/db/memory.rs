use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{ReviewRepository, TitleRepository, UserRepository, WatchlistRepository},
    error::{AppError, AppResult},
    models::{
        review::aggregate_rating, EntryFilter, NewReview, NewTitle, Review, Title, User,
        WatchlistEntry, WatchlistItem,
    },
};

/// In-process store with the same uniqueness and versioning rules as the
/// database. Every check-and-write happens under a single write lock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: HashMap<Uuid, User>,
    titles: HashMap<Uuid, Title>,
    entries: HashMap<(Uuid, Uuid), WatchlistEntry>,
    reviews: HashMap<Uuid, Review>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TitleRepository for MemoryStore {
    async fn upsert_title(&self, input: &NewTitle) -> AppResult<Title> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .titles
            .values_mut()
            .find(|t| t.external_id == input.external_id)
        {
            if existing.poster_path.is_none() {
                existing.poster_path = input.poster_path.clone();
            }
            return Ok(existing.clone());
        }

        let title = Title::new(input);
        inner.titles.insert(title.id, title.clone());
        Ok(title)
    }

    async fn find_title(&self, id: Uuid) -> AppResult<Option<Title>> {
        let inner = self.inner.read().await;
        Ok(inner.titles.get(&id).cloned())
    }

    async fn refresh_aggregate_rating(&self, title_id: Uuid) -> AppResult<Option<f64>> {
        let mut inner = self.inner.write().await;

        let ratings: Vec<_> = inner
            .reviews
            .values()
            .filter(|r| r.title_id == title_id && r.is_root())
            .filter_map(|r| r.rating)
            .collect();
        let aggregate = aggregate_rating(&ratings);

        let title = inner
            .titles
            .get_mut(&title_id)
            .ok_or_else(|| AppError::NotFound(format!("Title {} not found", title_id)))?;
        title.aggregate_rating = aggregate;
        Ok(aggregate)
    }
}

#[async_trait::async_trait]
impl WatchlistRepository for MemoryStore {
    async fn insert_entry(&self, user_id: Uuid, title_id: Uuid) -> AppResult<WatchlistEntry> {
        let mut inner = self.inner.write().await;

        if inner.entries.contains_key(&(user_id, title_id)) {
            return Err(AppError::Conflict(
                "Title is already in your watchlist".to_string(),
            ));
        }

        let entry = WatchlistEntry::new(user_id, title_id);
        inner.entries.insert((user_id, title_id), entry.clone());
        Ok(entry)
    }

    async fn find_entry(&self, user_id: Uuid, title_id: Uuid) -> AppResult<Option<WatchlistEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.entries.get(&(user_id, title_id)).cloned())
    }

    async fn update_entry(&self, entry: &WatchlistEntry) -> AppResult<Option<WatchlistEntry>> {
        let mut inner = self.inner.write().await;

        let Some(stored) = inner.entries.get_mut(&(entry.user_id, entry.title_id)) else {
            return Ok(None);
        };
        if stored.version != entry.version {
            return Ok(None);
        }

        stored.status = entry.status;
        stored.is_favorite = entry.is_favorite;
        stored.rating = entry.rating;
        stored.review = entry.review.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        filter: EntryFilter,
    ) -> AppResult<Vec<WatchlistItem>> {
        let inner = self.inner.read().await;

        let mut items: Vec<WatchlistItem> = inner
            .entries
            .values()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .filter_map(|e| {
                inner.titles.get(&e.title_id).map(|title| WatchlistItem {
                    entry: e.clone(),
                    title: title.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| b.entry.updated_at.cmp(&a.entry.updated_at));
        Ok(items)
    }
}

#[async_trait::async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert_review(&self, user_id: Uuid, input: &NewReview) -> AppResult<Review> {
        let mut inner = self.inner.write().await;
        let review = Review::new(user_id, input);
        inner.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> AppResult<Option<Review>> {
        let inner = self.inner.read().await;
        Ok(inner.reviews.get(&id).cloned())
    }

    async fn list_reviews(&self, title_id: Uuid) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        let mut reviews: Vec<Review> = inner
            .reviews
            .values()
            .filter(|r| r.title_id == title_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| r.created_at);
        Ok(reviews)
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
        username: Option<String>,
    ) -> AppResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username,
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> AppResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.username = Some(username.to_string());
            user.clone()
        }))
    }
}

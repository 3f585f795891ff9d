//! Storage abstraction
//!
//! Handlers and services only ever see these traits. The PostgreSQL store is
//! used in production; the in-memory store backs tests and local runs
//! without a database. Both enforce the same constraints.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{EntryFilter, NewReview, NewTitle, Review, Title, User, WatchlistEntry, WatchlistItem},
};

#[async_trait::async_trait]
pub trait TitleRepository: Send + Sync {
    /// Returns the title with this external id, creating it on first reference
    async fn upsert_title(&self, input: &NewTitle) -> AppResult<Title>;

    async fn find_title(&self, id: Uuid) -> AppResult<Option<Title>>;

    /// Recomputes and stores the mean rating of the title's root reviews
    async fn refresh_aggregate_rating(&self, title_id: Uuid) -> AppResult<Option<f64>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Inserts a fresh entry. Fails with `Conflict` if the pair already has one.
    async fn insert_entry(&self, user_id: Uuid, title_id: Uuid) -> AppResult<WatchlistEntry>;

    async fn find_entry(&self, user_id: Uuid, title_id: Uuid) -> AppResult<Option<WatchlistEntry>>;

    /// Writes the mutable fields of `entry` if its stored version still equals
    /// `entry.version`. Returns `None` when another writer got there first.
    async fn update_entry(&self, entry: &WatchlistEntry) -> AppResult<Option<WatchlistEntry>>;

    /// Lists the user's entries with their titles, most recently updated first
    async fn list_entries(
        &self,
        user_id: Uuid,
        filter: EntryFilter,
    ) -> AppResult<Vec<WatchlistItem>>;
}

#[async_trait::async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert_review(&self, user_id: Uuid, input: &NewReview) -> AppResult<Review>;

    async fn find_review(&self, id: Uuid) -> AppResult<Option<Review>>;

    /// All reviews of a title, replies included
    async fn list_reviews(&self, title_id: Uuid) -> AppResult<Vec<Review>>;
}

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` if the email is taken
    async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
        username: Option<String>,
    ) -> AppResult<User>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn update_username(&self, id: Uuid, username: &str) -> AppResult<Option<User>>;
}

/// Everything the HTTP layer needs from persistence
pub trait Store: TitleRepository + WatchlistRepository + ReviewRepository + UserRepository {}

impl<T> Store for T where
    T: TitleRepository + WatchlistRepository + ReviewRepository + UserRepository
{
}

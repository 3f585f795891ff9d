use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use super::Title;

/// Lifecycle state of a watchlist entry. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "watchlist_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Watchlist,
    Seen,
    Junk,
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Watchlist => write!(f, "WATCHLIST"),
            Status::Seen => write!(f, "SEEN"),
            Status::Junk => write!(f, "JUNK"),
        }
    }
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A 1-5 star rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[serde(try_from = "i32", into = "i32")]
#[sqlx(transparent)]
pub struct Rating(i32);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct RatingOutOfRange(pub i32);

impl Rating {
    pub fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A user's relationship to one title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title_id: Uuid,
    pub status: Status,
    pub is_favorite: bool,
    pub rating: Option<Rating>,
    pub review: Option<String>,
    /// Bumped on every update; stale writers lose the compare-and-set
    #[serde(skip)]
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mutation requested by the owner of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    MarkSeen,
    UnmarkSeen,
    MoveToJunk,
    Restore,
    SetFavorite(bool),
    /// Drops the favorite flag and puts the entry back on the active list
    Unfavorite,
    Rate(Rating),
    Review(Option<String>),
}

impl Transition {
    /// Short name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Transition::MarkSeen => "mark_seen",
            Transition::UnmarkSeen => "unmark_seen",
            Transition::MoveToJunk => "move_to_junk",
            Transition::Restore => "restore",
            Transition::SetFavorite(_) => "set_favorite",
            Transition::Unfavorite => "unfavorite",
            Transition::Rate(_) => "rate",
            Transition::Review(_) => "review",
        }
    }
}

/// A transition whose precondition does not hold for the entry's current status
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Title is already marked as seen")]
    AlreadySeen,

    #[error("Only titles in the junk list can be restored (current status: {current})")]
    NotJunk { current: Status },

    #[error("Only seen titles can be rated (current status: {current})")]
    NotSeen { current: Status },
}

impl WatchlistEntry {
    /// Creates the initial entry for a (user, title) pair
    pub fn new(user_id: Uuid, title_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title_id,
            status: Status::Watchlist,
            is_favorite: false,
            rating: None,
            review: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a transition in place, leaving the entry untouched on error
    pub fn apply(&mut self, transition: Transition) -> Result<(), TransitionError> {
        match transition {
            Transition::MarkSeen => {
                if self.status == Status::Seen {
                    return Err(TransitionError::AlreadySeen);
                }
                self.status = Status::Seen;
            }
            Transition::UnmarkSeen => self.status = Status::Watchlist,
            Transition::MoveToJunk => {
                self.status = Status::Junk;
                self.is_favorite = false;
            }
            Transition::Restore => {
                if self.status != Status::Junk {
                    return Err(TransitionError::NotJunk {
                        current: self.status,
                    });
                }
                self.status = Status::Watchlist;
            }
            Transition::SetFavorite(value) => self.is_favorite = value,
            Transition::Unfavorite => {
                self.is_favorite = false;
                self.status = Status::Watchlist;
            }
            Transition::Rate(rating) => {
                if self.status != Status::Seen {
                    return Err(TransitionError::NotSeen {
                        current: self.status,
                    });
                }
                self.rating = Some(rating);
            }
            Transition::Review(text) => {
                self.review = text
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty());
            }
        }
        Ok(())
    }
}

/// Which slice of a user's entries to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    /// Status WATCHLIST only; seen and junked titles are excluded
    Active,
    Seen,
    Junk,
    /// Favorited entries in any status
    Favorites,
}

impl EntryFilter {
    pub fn matches(&self, entry: &WatchlistEntry) -> bool {
        match self {
            EntryFilter::Active => entry.status == Status::Watchlist,
            EntryFilter::Seen => entry.status == Status::Seen,
            EntryFilter::Junk => entry.status == Status::Junk,
            EntryFilter::Favorites => entry.is_favorite,
        }
    }
}

/// An entry with its title embedded, as returned by the list endpoints
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistItem {
    #[serde(flatten)]
    pub entry: WatchlistEntry,
    pub title: Title,
}

pub mod review;
pub mod title;
pub mod user;
pub mod watchlist;

pub use review::{NewReview, Review, ReviewThread};
pub use title::{MediaKind, NewTitle, Title};
pub use user::{User, UserProfile};
pub use watchlist::{
    EntryFilter, Rating, RatingOutOfRange, Status, Transition, TransitionError, WatchlistEntry,
    WatchlistItem,
};

pub mod accounts;
pub mod reviews;
pub mod watchlist;

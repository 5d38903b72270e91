//! sea-orm entities for the MovieWatch database.

pub mod movies;
pub mod reviews;
pub mod users;
pub mod watchlist_movies;
pub mod watchlists;

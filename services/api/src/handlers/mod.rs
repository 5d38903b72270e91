pub mod extract;
pub mod index;
pub mod rules;
pub mod movie;
pub mod review;
pub mod user;
pub mod watchlist;

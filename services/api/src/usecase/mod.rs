pub mod auth;
pub mod movie;
pub mod review;
pub mod user;
pub mod watchlist;

#![allow(async_fn_in_trait)]

use moviewatch_domain::pagination::PageRequest;

use crate::domain::types::{
    Movie, MovieChanges, MovieDetail, MovieFilter, MovieSummary, NewMovie, NewReview, NewUser,
    NewWatchlist, Review, ReviewChanges, ReviewDetail, ReviewFilter, User, UserChanges, Watchlist,
    WatchlistChanges, WatchlistMovie,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    /// Any user other than `exclude_id` holding `username` or `email`.
    async fn find_conflicting(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<Option<User>, ApiError>;
    async fn list(&self) -> Result<Vec<User>, ApiError>;
    /// `UserAlreadyExists` when a unique column collides.
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<User, ApiError>;
    /// Cascades to the user's reviews and watchlists.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for the movie catalog.
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, ApiError>;
    async fn find_detail(&self, id: i32) -> Result<Option<MovieDetail>, ApiError>;
    /// Newest first. Returns the page and the total match count.
    async fn list(
        &self,
        filter: &MovieFilter,
        page: PageRequest,
    ) -> Result<(Vec<Movie>, u64), ApiError>;
    async fn create(&self, movie: &NewMovie) -> Result<Movie, ApiError>;
    async fn update(&self, id: i32, changes: &MovieChanges) -> Result<Movie, ApiError>;
    /// Cascades to reviews and watchlist memberships.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    /// Set `average_rating` to the mean of the movie's current reviews
    /// (`None` when it has none). Idempotent.
    async fn recompute_average_rating(&self, movie_id: i32) -> Result<Option<f64>, ApiError>;
}

/// Repository for reviews.
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, ApiError>;
    async fn find_detail(&self, id: i32) -> Result<Option<ReviewDetail>, ApiError>;
    async fn find_by_user_and_movie(
        &self,
        user_id: i32,
        movie_id: i32,
    ) -> Result<Option<Review>, ApiError>;
    /// Newest first.
    async fn list(&self, filter: ReviewFilter) -> Result<Vec<ReviewDetail>, ApiError>;
    async fn movie_ids_reviewed_by(&self, user_id: i32) -> Result<Vec<i32>, ApiError>;
    /// `DuplicateReview` when `(user_id, movie_id)` already exists.
    async fn create(&self, review: &NewReview) -> Result<Review, ApiError>;
    async fn update(&self, id: i32, changes: &ReviewChanges) -> Result<Review, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for watchlists and their movie memberships.
pub trait WatchlistRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Watchlist>, ApiError>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Watchlist>, ApiError>;
    /// Movies in insertion order.
    async fn list_movies(&self, watchlist_id: i32) -> Result<Vec<MovieSummary>, ApiError>;
    async fn create(&self, watchlist: &NewWatchlist) -> Result<Watchlist, ApiError>;
    async fn update(&self, id: i32, changes: &WatchlistChanges) -> Result<Watchlist, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    async fn find_movie(
        &self,
        watchlist_id: i32,
        movie_id: i32,
    ) -> Result<Option<WatchlistMovie>, ApiError>;
    /// `MovieAlreadyInWatchlist` when the pair already exists.
    async fn add_movie(
        &self,
        watchlist_id: i32,
        movie_id: i32,
    ) -> Result<WatchlistMovie, ApiError>;
    async fn remove_movie(&self, watchlist_id: i32, movie_id: i32) -> Result<bool, ApiError>;
}

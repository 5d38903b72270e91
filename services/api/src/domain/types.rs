use chrono::{DateTime, Datelike, Utc};

use moviewatch_domain::pagination::PageInfo;
use moviewatch_domain::user::UserRole;

// ── Identity ─────────────────────────────────────────────────────────────────

/// Authenticated caller, attached to the request by the auth middleware.
///
/// `role` comes from the user row, not from the token, so a demoted admin
/// loses access as soon as the row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: UserRole,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

// ── Movies ───────────────────────────────────────────────────────────────────

pub const MIN_RELEASE_YEAR: i32 = 1800;

/// Latest accepted release year: five years past the current one.
pub fn max_release_year() -> i32 {
    Utc::now().year() + 5
}

pub fn release_year_in_range(year: i32) -> bool {
    (MIN_RELEASE_YEAR..=max_release_year()).contains(&year)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub release_year: i32,
    pub duration: i32,
    pub description: String,
    pub average_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub genre: String,
    pub release_year: i32,
    pub duration: i32,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub duration: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
}

/// Catalog search. String filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub page: PageInfo,
}

#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub movie: Movie,
    pub reviews: Vec<ReviewDetail>,
}

// ── Reviews ──────────────────────────────────────────────────────────────────

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub rating: f64,
    pub review_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i32,
    pub movie_id: i32,
    pub rating: f64,
    pub review_description: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<f64>,
    pub review_description: Option<String>,
}

/// Review annotated with its author and movie.
#[derive(Debug, Clone)]
pub struct ReviewDetail {
    pub review: Review,
    pub user: UserSummary,
    pub movie: MovieSummary,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewFilter {
    pub movie_id: Option<i32>,
    pub user_id: Option<i32>,
}

// ── Watchlists ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWatchlist {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WatchlistChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistMovie {
    pub watchlist_id: i32,
    pub movie_id: i32,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WatchlistDetail {
    pub watchlist: Watchlist,
    pub movies: Vec<MovieSummary>,
}

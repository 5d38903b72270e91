use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbMovieRepository, DbReviewRepository, DbUserRepository, DbWatchlistRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn movie_repo(&self) -> DbMovieRepository {
        DbMovieRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn watchlist_repo(&self) -> DbWatchlistRepository {
        DbWatchlistRepository {
            db: self.db.clone(),
        }
    }
}

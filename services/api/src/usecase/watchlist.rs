use tracing::info;

use crate::domain::policy::{require_owner, require_owner_or_admin, require_visible};
use crate::domain::repository::{MovieRepository, WatchlistRepository};
use crate::domain::types::{
    Identity, NewWatchlist, Watchlist, WatchlistChanges, WatchlistDetail, WatchlistMovie,
};
use crate::error::ApiError;

// ── ListWatchlists ───────────────────────────────────────────────────────────

/// The caller's own watchlists, public and private.
pub struct ListWatchlistsUseCase<W: WatchlistRepository> {
    pub watchlists: W,
}

impl<W: WatchlistRepository> ListWatchlistsUseCase<W> {
    pub async fn execute(&self, identity: &Identity) -> Result<Vec<Watchlist>, ApiError> {
        self.watchlists.list_by_user(identity.user_id).await
    }
}

// ── GetWatchlist ─────────────────────────────────────────────────────────────

pub struct GetWatchlistUseCase<W: WatchlistRepository> {
    pub watchlists: W,
}

impl<W: WatchlistRepository> GetWatchlistUseCase<W> {
    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        watchlist_id: i32,
    ) -> Result<WatchlistDetail, ApiError> {
        let watchlist = self
            .watchlists
            .find_by_id(watchlist_id)
            .await?
            .ok_or(ApiError::WatchlistNotFound)?;
        require_visible(identity, &watchlist)?;
        let movies = self.watchlists.list_movies(watchlist.id).await?;
        Ok(WatchlistDetail { watchlist, movies })
    }
}

// ── CreateWatchlist ──────────────────────────────────────────────────────────

pub struct CreateWatchlistInput {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

pub struct CreateWatchlistUseCase<W: WatchlistRepository> {
    pub watchlists: W,
}

impl<W: WatchlistRepository> CreateWatchlistUseCase<W> {
    pub async fn execute(
        &self,
        identity: &Identity,
        input: CreateWatchlistInput,
    ) -> Result<Watchlist, ApiError> {
        let watchlist = self
            .watchlists
            .create(&NewWatchlist {
                user_id: identity.user_id,
                name: input.name,
                description: input.description,
                is_public: input.is_public,
            })
            .await?;
        info!(watchlist_id = watchlist.id, user_id = identity.user_id, "watchlist created");
        Ok(watchlist)
    }
}

// ── UpdateWatchlist ──────────────────────────────────────────────────────────

/// Owner only. Admins cannot edit other users' lists.
pub struct UpdateWatchlistUseCase<W: WatchlistRepository> {
    pub watchlists: W,
}

impl<W: WatchlistRepository> UpdateWatchlistUseCase<W> {
    pub async fn execute(
        &self,
        identity: &Identity,
        watchlist_id: i32,
        changes: WatchlistChanges,
    ) -> Result<Watchlist, ApiError> {
        let existing = self
            .watchlists
            .find_by_id(watchlist_id)
            .await?
            .ok_or(ApiError::WatchlistNotFound)?;
        require_owner(identity, &existing)?;
        self.watchlists.update(watchlist_id, &changes).await
    }
}

// ── DeleteWatchlist ──────────────────────────────────────────────────────────

pub struct DeleteWatchlistUseCase<W: WatchlistRepository> {
    pub watchlists: W,
}

impl<W: WatchlistRepository> DeleteWatchlistUseCase<W> {
    pub async fn execute(&self, identity: &Identity, watchlist_id: i32) -> Result<(), ApiError> {
        let existing = self
            .watchlists
            .find_by_id(watchlist_id)
            .await?
            .ok_or(ApiError::WatchlistNotFound)?;
        require_owner_or_admin(identity, &existing)?;
        if !self.watchlists.delete(watchlist_id).await? {
            return Err(ApiError::WatchlistNotFound);
        }
        info!(watchlist_id, "watchlist deleted");
        Ok(())
    }
}

// ── AddMovie ─────────────────────────────────────────────────────────────────

pub struct AddWatchlistMovieUseCase<W: WatchlistRepository, M: MovieRepository> {
    pub watchlists: W,
    pub movies: M,
}

impl<W: WatchlistRepository, M: MovieRepository> AddWatchlistMovieUseCase<W, M> {
    pub async fn execute(
        &self,
        identity: &Identity,
        watchlist_id: i32,
        movie_id: i32,
    ) -> Result<WatchlistMovie, ApiError> {
        let watchlist = self
            .watchlists
            .find_by_id(watchlist_id)
            .await?
            .ok_or(ApiError::WatchlistNotFound)?;
        require_owner(identity, &watchlist)?;
        if self.movies.find_by_id(movie_id).await?.is_none() {
            return Err(ApiError::MovieNotFound);
        }
        if self
            .watchlists
            .find_movie(watchlist_id, movie_id)
            .await?
            .is_some()
        {
            return Err(ApiError::MovieAlreadyInWatchlist);
        }
        self.watchlists.add_movie(watchlist_id, movie_id).await
    }
}

// ── RemoveMovie ──────────────────────────────────────────────────────────────

pub struct RemoveWatchlistMovieUseCase<W: WatchlistRepository> {
    pub watchlists: W,
}

impl<W: WatchlistRepository> RemoveWatchlistMovieUseCase<W> {
    pub async fn execute(
        &self,
        identity: &Identity,
        watchlist_id: i32,
        movie_id: i32,
    ) -> Result<(), ApiError> {
        let watchlist = self
            .watchlists
            .find_by_id(watchlist_id)
            .await?
            .ok_or(ApiError::WatchlistNotFound)?;
        require_owner_or_admin(identity, &watchlist)?;
        if !self.watchlists.remove_movie(watchlist_id, movie_id).await? {
            return Err(ApiError::WatchlistMovieNotFound);
        }
        Ok(())
    }
}

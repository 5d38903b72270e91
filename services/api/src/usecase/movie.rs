use tracing::info;

use moviewatch_domain::pagination::{PageInfo, PageRequest};

use crate::domain::repository::MovieRepository;
use crate::domain::types::{Movie, MovieChanges, MovieDetail, MovieFilter, MoviePage, NewMovie};
use crate::error::ApiError;

// ── ListMovies ───────────────────────────────────────────────────────────────

pub struct ListMoviesUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> ListMoviesUseCase<M> {
    pub async fn execute(
        &self,
        filter: MovieFilter,
        page: PageRequest,
    ) -> Result<MoviePage, ApiError> {
        let page = page.clamped();
        let (movies, total) = self.movies.list(&filter, page).await?;
        Ok(MoviePage {
            movies,
            page: PageInfo::new(page, total),
        })
    }
}

// ── GetMovie ─────────────────────────────────────────────────────────────────

pub struct GetMovieUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> GetMovieUseCase<M> {
    pub async fn execute(&self, movie_id: i32) -> Result<MovieDetail, ApiError> {
        self.movies
            .find_detail(movie_id)
            .await?
            .ok_or(ApiError::MovieNotFound)
    }
}

// ── CreateMovie ──────────────────────────────────────────────────────────────

pub struct CreateMovieUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> CreateMovieUseCase<M> {
    pub async fn execute(&self, input: NewMovie) -> Result<Movie, ApiError> {
        let movie = self.movies.create(&input).await?;
        info!(movie_id = movie.id, "movie created");
        Ok(movie)
    }
}

// ── UpdateMovie ──────────────────────────────────────────────────────────────

pub struct UpdateMovieUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> UpdateMovieUseCase<M> {
    pub async fn execute(&self, movie_id: i32, changes: MovieChanges) -> Result<Movie, ApiError> {
        if self.movies.find_by_id(movie_id).await?.is_none() {
            return Err(ApiError::MovieNotFound);
        }
        self.movies.update(movie_id, &changes).await
    }
}

// ── DeleteMovie ──────────────────────────────────────────────────────────────

/// Removes the movie together with its reviews and watchlist memberships.
pub struct DeleteMovieUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> DeleteMovieUseCase<M> {
    pub async fn execute(&self, movie_id: i32) -> Result<(), ApiError> {
        if !self.movies.delete(movie_id).await? {
            return Err(ApiError::MovieNotFound);
        }
        info!(movie_id, "movie deleted");
        Ok(())
    }
}

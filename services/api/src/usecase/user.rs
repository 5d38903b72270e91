use tracing::info;

use crate::domain::repository::{MovieRepository, ReviewRepository, UserRepository};
use crate::domain::types::{User, UserChanges};
use crate::error::ApiError;
use crate::usecase::auth::hash_off_thread;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.users.list().await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, user_id: i32) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UpdateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateUserUseCase<U> {
    pub async fn execute(&self, user_id: i32, input: UpdateUserInput) -> Result<User, ApiError> {
        let current = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if self
            .users
            .find_conflicting(
                input.username.as_deref(),
                input.email.as_deref(),
                Some(current.id),
            )
            .await?
            .is_some()
        {
            return Err(ApiError::UserAlreadyExists);
        }

        let password_hash = match input.password {
            Some(password) => Some(hash_off_thread(password).await?),
            None => None,
        };
        let changes = UserChanges {
            username: input.username,
            email: input.email,
            password_hash,
        };
        self.users.update(current.id, &changes).await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

/// Deletes the account with its reviews and watchlists, then refreshes the
/// average rating of every movie the user had reviewed.
pub struct DeleteUserUseCase<U: UserRepository, R: ReviewRepository, M: MovieRepository> {
    pub users: U,
    pub reviews: R,
    pub movies: M,
}

impl<U: UserRepository, R: ReviewRepository, M: MovieRepository> DeleteUserUseCase<U, R, M> {
    pub async fn execute(&self, user_id: i32) -> Result<(), ApiError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }
        let reviewed = self.reviews.movie_ids_reviewed_by(user_id).await?;
        if !self.users.delete(user_id).await? {
            return Err(ApiError::UserNotFound);
        }
        for movie_id in &reviewed {
            self.movies.recompute_average_rating(*movie_id).await?;
        }
        info!(user_id, movies = reviewed.len(), "user deleted");
        Ok(())
    }
}

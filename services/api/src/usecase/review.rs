//! Review lifecycle.
//!
//! Every successful create, update, or delete is followed by a recompute of
//! the movie's average rating. The recompute reads the committed review set,
//! so it is safe to repeat and converges under concurrent writers.

use tracing::info;

use crate::domain::policy::require_owner_or_admin;
use crate::domain::repository::{MovieRepository, ReviewRepository};
use crate::domain::types::{Identity, NewReview, Review, ReviewChanges, ReviewDetail, ReviewFilter};
use crate::error::ApiError;

// ── ListReviews ──────────────────────────────────────────────────────────────

pub struct ListReviewsUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ListReviewsUseCase<R> {
    pub async fn execute(&self, filter: ReviewFilter) -> Result<Vec<ReviewDetail>, ApiError> {
        self.reviews.list(filter).await
    }
}

// ── GetReview ────────────────────────────────────────────────────────────────

pub struct GetReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> GetReviewUseCase<R> {
    pub async fn execute(&self, review_id: i32) -> Result<ReviewDetail, ApiError> {
        self.reviews
            .find_detail(review_id)
            .await?
            .ok_or(ApiError::ReviewNotFound)
    }
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub movie_id: i32,
    pub rating: f64,
    pub review_description: String,
}

pub struct CreateReviewUseCase<M: MovieRepository, R: ReviewRepository> {
    pub movies: M,
    pub reviews: R,
}

impl<M: MovieRepository, R: ReviewRepository> CreateReviewUseCase<M, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        input: CreateReviewInput,
    ) -> Result<Review, ApiError> {
        if self.movies.find_by_id(input.movie_id).await?.is_none() {
            return Err(ApiError::MovieNotFound);
        }
        if self
            .reviews
            .find_by_user_and_movie(identity.user_id, input.movie_id)
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateReview);
        }
        // The unique index still rejects a racing duplicate as DuplicateReview.
        let review = self
            .reviews
            .create(&NewReview {
                user_id: identity.user_id,
                movie_id: input.movie_id,
                rating: input.rating,
                review_description: input.review_description,
            })
            .await?;
        let average = self.movies.recompute_average_rating(review.movie_id).await?;
        info!(
            review_id = review.id,
            movie_id = review.movie_id,
            ?average,
            "review created"
        );
        Ok(review)
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

pub struct UpdateReviewUseCase<M: MovieRepository, R: ReviewRepository> {
    pub movies: M,
    pub reviews: R,
}

impl<M: MovieRepository, R: ReviewRepository> UpdateReviewUseCase<M, R> {
    pub async fn execute(
        &self,
        identity: &Identity,
        review_id: i32,
        changes: ReviewChanges,
    ) -> Result<Review, ApiError> {
        let existing = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(ApiError::ReviewNotFound)?;
        require_owner_or_admin(identity, &existing)?;

        let review = self.reviews.update(review_id, &changes).await?;
        self.movies.recompute_average_rating(review.movie_id).await?;
        Ok(review)
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<M: MovieRepository, R: ReviewRepository> {
    pub movies: M,
    pub reviews: R,
}

impl<M: MovieRepository, R: ReviewRepository> DeleteReviewUseCase<M, R> {
    pub async fn execute(&self, identity: &Identity, review_id: i32) -> Result<(), ApiError> {
        let existing = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(ApiError::ReviewNotFound)?;
        require_owner_or_admin(identity, &existing)?;

        if !self.reviews.delete(review_id).await? {
            return Err(ApiError::ReviewNotFound);
        }
        let average = self
            .movies
            .recompute_average_rating(existing.movie_id)
            .await?;
        info!(review_id, movie_id = existing.movie_id, ?average, "review deleted");
        Ok(())
    }
}

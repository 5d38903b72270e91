use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{Identity, Review, ReviewChanges, ReviewDetail, ReviewFilter};
use crate::error::ApiError;
use crate::handlers::extract::{ApiPath, ValidatedJson, ValidatedQuery, present};
use crate::handlers::movie::MovieSummaryResponse;
use crate::handlers::rules::not_blank;
use crate::handlers::user::UserSummaryResponse;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListReviewsUseCase, UpdateReviewUseCase,
};

/// Review as returned to clients. `user` and `movie` are present on reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub rating: f64,
    pub review_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummaryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieSummaryResponse>,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            movie_id: r.movie_id,
            rating: r.rating,
            review_description: r.review_description,
            user: None,
            movie: None,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<ReviewDetail> for ReviewResponse {
    fn from(detail: ReviewDetail) -> Self {
        Self {
            user: Some(detail.user.into()),
            movie: Some(detail.movie.into()),
            ..detail.review.into()
        }
    }
}

// ── GET /api/reviews ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    #[validate(range(min = 1, message = "Movie id must be a positive integer"))]
    pub movie_id: Option<i32>,
    #[validate(range(min = 1, message = "User id must be a positive integer"))]
    pub user_id: Option<i32>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ReviewListQuery>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let usecase = ListReviewsUseCase {
        reviews: state.review_repo(),
    };
    let reviews = usecase
        .execute(ReviewFilter {
            movie_id: query.movie_id,
            user_id: query.user_id,
        })
        .await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

// ── GET /api/reviews/{id} ────────────────────────────────────────────────────

pub async fn get_review(
    State(state): State<AppState>,
    ApiPath(review_id): ApiPath<i32>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let usecase = GetReviewUseCase {
        reviews: state.review_repo(),
    };
    let review = usecase.execute(review_id).await?;
    Ok(Json(review.into()))
}

// ── POST /api/reviews ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(
        required(message = "Movie id is required"),
        range(min = 1, message = "Movie id must be a positive integer")
    )]
    pub movie_id: Option<i32>,
    #[validate(
        required(message = "Rating is required"),
        range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10")
    )]
    pub rating: Option<f64>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Review description is required"))]
    pub review_description: String,
}

pub async fn create_review(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(body): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let input = CreateReviewInput {
        movie_id: present(body.movie_id, "movieId")?,
        rating: present(body.rating, "rating")?,
        review_description: body.review_description.trim().to_owned(),
    };
    let usecase = CreateReviewUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase.execute(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

// ── PUT /api/reviews/{id} ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
    pub rating: Option<f64>,
    #[validate(custom(function = "not_blank", message = "Review description cannot be empty"))]
    pub review_description: Option<String>,
}

pub async fn update_review(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(review_id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let changes = ReviewChanges {
        rating: body.rating,
        review_description: body.review_description.map(|d| d.trim().to_owned()),
    };
    let usecase = UpdateReviewUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase.execute(&identity, review_id, changes).await?;
    Ok(Json(review.into()))
}

// ── DELETE /api/reviews/{id} ─────────────────────────────────────────────────

pub async fn delete_review(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(review_id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteReviewUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    };
    usecase.execute(&identity, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

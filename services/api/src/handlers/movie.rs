use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use moviewatch_domain::pagination::{PageInfo, PageRequest};

use crate::domain::types::{Movie, MovieChanges, MovieDetail, MovieFilter, MovieSummary, NewMovie};
use crate::error::ApiError;
use crate::handlers::extract::{ApiPath, ValidatedJson, ValidatedQuery, non_blank, present};
use crate::handlers::review::ReviewResponse;
use crate::handlers::rules::{not_blank, searchable_release_year, valid_release_year};
use crate::state::AppState;
use crate::usecase::movie::{
    CreateMovieUseCase, DeleteMovieUseCase, GetMovieUseCase, ListMoviesUseCase,
    UpdateMovieUseCase,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub release_year: i32,
    pub duration: i32,
    pub description: String,
    pub average_rating: Option<f64>,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
    fn from(m: Movie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            director: m.director,
            genre: m.genre,
            release_year: m.release_year,
            duration: m.duration,
            description: m.description,
            average_rating: m.average_rating,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// `{id, title}` reference embedded in reviews and watchlists.
#[derive(Debug, Serialize)]
pub struct MovieSummaryResponse {
    pub id: i32,
    pub title: String,
}

impl From<MovieSummary> for MovieSummaryResponse {
    fn from(m: MovieSummary) -> Self {
        Self {
            id: m.id,
            title: m.title,
        }
    }
}

// ── GET /api/movies ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovieListQuery {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    #[validate(custom(
        function = "searchable_release_year",
        message = "Release year is out of range"
    ))]
    pub release_year: Option<i32>,
    #[validate(range(min = 0.0, max = 10.0, message = "Minimum rating must be between 0 and 10"))]
    pub min_rating: Option<f64>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieResponse>,
    pub pagination: PageInfo,
}

pub async fn list_movies(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MovieListQuery>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let filter = MovieFilter {
        title: non_blank(query.title),
        director: non_blank(query.director),
        genre: non_blank(query.genre),
        release_year: query.release_year,
        min_rating: query.min_rating,
    };
    let usecase = ListMoviesUseCase {
        movies: state.movie_repo(),
    };
    let page = usecase
        .execute(filter, PageRequest::new(query.page, query.limit))
        .await?;
    Ok(Json(MovieListResponse {
        movies: page.movies.into_iter().map(MovieResponse::from).collect(),
        pagination: page.page,
    }))
}

// ── GET /api/movies/{id} ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    #[serde(flatten)]
    pub movie: MovieResponse,
    pub reviews: Vec<ReviewResponse>,
}

impl From<MovieDetail> for MovieDetailResponse {
    fn from(detail: MovieDetail) -> Self {
        Self {
            movie: detail.movie.into(),
            reviews: detail.reviews.into_iter().map(ReviewResponse::from).collect(),
        }
    }
}

pub async fn get_movie(
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
) -> Result<Json<MovieDetailResponse>, ApiError> {
    let usecase = GetMovieUseCase {
        movies: state.movie_repo(),
    };
    let detail = usecase.execute(movie_id).await?;
    Ok(Json(detail.into()))
}

// ── POST /api/movies ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Director is required"))]
    pub director: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Genre is required"))]
    pub genre: String,
    #[validate(
        required(message = "Release year is required"),
        custom(function = "valid_release_year", message = "Release year is out of range")
    )]
    pub release_year: Option<i32>,
    #[validate(
        required(message = "Duration is required"),
        range(min = 1, message = "Duration must be a positive number of minutes")
    )]
    pub duration: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
}

pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), ApiError> {
    let input = NewMovie {
        title: body.title.trim().to_owned(),
        director: body.director.trim().to_owned(),
        genre: body.genre.trim().to_owned(),
        release_year: present(body.release_year, "releaseYear")?,
        duration: present(body.duration, "duration")?,
        description: body.description.trim().to_owned(),
    };
    let usecase = CreateMovieUseCase {
        movies: state.movie_repo(),
    };
    let movie = usecase.execute(input).await?;
    Ok((StatusCode::CREATED, Json(movie.into())))
}

// ── PUT /api/movies/{id} ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[validate(custom(function = "not_blank", message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank", message = "Director cannot be empty"))]
    pub director: Option<String>,
    #[validate(custom(function = "not_blank", message = "Genre cannot be empty"))]
    pub genre: Option<String>,
    #[validate(custom(function = "valid_release_year", message = "Release year is out of range"))]
    pub release_year: Option<i32>,
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub duration: Option<i32>,
    #[validate(custom(function = "not_blank", message = "Description cannot be empty"))]
    pub description: Option<String>,
}

impl From<UpdateMovieRequest> for MovieChanges {
    fn from(body: UpdateMovieRequest) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_owned());
        Self {
            title: trim(body.title),
            director: trim(body.director),
            genre: trim(body.genre),
            release_year: body.release_year,
            duration: body.duration,
            description: trim(body.description),
        }
    }
}

pub async fn update_movie(
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<UpdateMovieRequest>,
) -> Result<Json<MovieResponse>, ApiError> {
    let usecase = UpdateMovieUseCase {
        movies: state.movie_repo(),
    };
    let movie = usecase.execute(movie_id, body.into()).await?;
    Ok(Json(movie.into()))
}

// ── DELETE /api/movies/{id} ──────────────────────────────────────────────────

pub async fn delete_movie(
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteMovieUseCase {
        movies: state.movie_repo(),
    };
    usecase.execute(movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

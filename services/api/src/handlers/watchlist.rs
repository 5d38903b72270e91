use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{Identity, Watchlist, WatchlistChanges, WatchlistDetail, WatchlistMovie};
use crate::error::ApiError;
use crate::handlers::extract::{ApiPath, ValidatedJson, present};
use crate::handlers::movie::MovieSummaryResponse;
use crate::handlers::rules::not_blank;
use crate::state::AppState;
use crate::usecase::watchlist::{
    AddWatchlistMovieUseCase, CreateWatchlistInput, CreateWatchlistUseCase,
    DeleteWatchlistUseCase, GetWatchlistUseCase, ListWatchlistsUseCase,
    RemoveWatchlistMovieUseCase, UpdateWatchlistUseCase,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistResponse {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Watchlist> for WatchlistResponse {
    fn from(w: Watchlist) -> Self {
        Self {
            id: w.id,
            user_id: w.user_id,
            name: w.name,
            description: w.description,
            is_public: w.is_public,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WatchlistDetailResponse {
    #[serde(flatten)]
    pub watchlist: WatchlistResponse,
    pub movies: Vec<MovieSummaryResponse>,
}

impl From<WatchlistDetail> for WatchlistDetailResponse {
    fn from(detail: WatchlistDetail) -> Self {
        Self {
            watchlist: detail.watchlist.into(),
            movies: detail
                .movies
                .into_iter()
                .map(MovieSummaryResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMovieResponse {
    pub watchlist_id: i32,
    pub movie_id: i32,
    #[serde(serialize_with = "moviewatch_core::serde::to_rfc3339_ms")]
    pub added_at: DateTime<Utc>,
}

impl From<WatchlistMovie> for WatchlistMovieResponse {
    fn from(m: WatchlistMovie) -> Self {
        Self {
            watchlist_id: m.watchlist_id,
            movie_id: m.movie_id,
            added_at: m.added_at,
        }
    }
}

// ── GET /api/watchlists ──────────────────────────────────────────────────────

pub async fn list_watchlists(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<WatchlistResponse>>, ApiError> {
    let usecase = ListWatchlistsUseCase {
        watchlists: state.watchlist_repo(),
    };
    let lists = usecase.execute(&identity).await?;
    Ok(Json(lists.into_iter().map(WatchlistResponse::from).collect()))
}

// ── GET /api/watchlists/{id} ─────────────────────────────────────────────────

pub async fn get_watchlist(
    State(state): State<AppState>,
    identity: Option<Identity>,
    ApiPath(watchlist_id): ApiPath<i32>,
) -> Result<Json<WatchlistDetailResponse>, ApiError> {
    let usecase = GetWatchlistUseCase {
        watchlists: state.watchlist_repo(),
    };
    let detail = usecase.execute(identity.as_ref(), watchlist_id).await?;
    Ok(Json(detail.into()))
}

// ── POST /api/watchlists ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWatchlistRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

pub async fn create_watchlist(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(body): ValidatedJson<CreateWatchlistRequest>,
) -> Result<(StatusCode, Json<WatchlistResponse>), ApiError> {
    let usecase = CreateWatchlistUseCase {
        watchlists: state.watchlist_repo(),
    };
    let watchlist = usecase
        .execute(
            &identity,
            CreateWatchlistInput {
                name: body.name.trim().to_owned(),
                description: body.description,
                is_public: body.is_public,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(watchlist.into())))
}

// ── PUT /api/watchlists/{id} ─────────────────────────────────────────────────

/// Partial update: absent fields keep their current value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWatchlistRequest {
    #[validate(
        custom(function = "not_blank", message = "Name cannot be empty"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

pub async fn update_watchlist(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(watchlist_id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<UpdateWatchlistRequest>,
) -> Result<Json<WatchlistResponse>, ApiError> {
    let changes = WatchlistChanges {
        name: body.name.map(|n| n.trim().to_owned()),
        description: body.description,
        is_public: body.is_public,
    };
    let usecase = UpdateWatchlistUseCase {
        watchlists: state.watchlist_repo(),
    };
    let watchlist = usecase.execute(&identity, watchlist_id, changes).await?;
    Ok(Json(watchlist.into()))
}

// ── DELETE /api/watchlists/{id} ──────────────────────────────────────────────

pub async fn delete_watchlist(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(watchlist_id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteWatchlistUseCase {
        watchlists: state.watchlist_repo(),
    };
    usecase.execute(&identity, watchlist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/watchlists/{id}/movies ─────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    #[validate(
        required(message = "Movie id is required"),
        range(min = 1, message = "Movie id must be a positive integer")
    )]
    pub movie_id: Option<i32>,
}

pub async fn add_movie(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(watchlist_id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<AddMovieRequest>,
) -> Result<(StatusCode, Json<WatchlistMovieResponse>), ApiError> {
    let movie_id = present(body.movie_id, "movieId")?;
    let usecase = AddWatchlistMovieUseCase {
        watchlists: state.watchlist_repo(),
        movies: state.movie_repo(),
    };
    let entry = usecase.execute(&identity, watchlist_id, movie_id).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

// ── DELETE /api/watchlists/{id}/movies/{movie_id} ────────────────────────────

pub async fn remove_movie(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath((watchlist_id, movie_id)): ApiPath<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveWatchlistMovieUseCase {
        watchlists: state.watchlist_repo(),
    };
    usecase.execute(&identity, watchlist_id, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
